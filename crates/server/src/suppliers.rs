//! Suppliers API endpoints

use api_types::{
    Message,
    supplier::{SupplierCreated, SupplierNew, SupplierView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::Identity;

use crate::{ServerError, extract::JsonBody, server::ServerState};

fn map_supplier(supplier: engine::Supplier) -> SupplierView {
    SupplierView {
        id: supplier.id,
        name: supplier.name,
        created_by: supplier.created_by,
        created_at: supplier.created_at,
    }
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<SupplierNew>,
) -> Result<(StatusCode, Json<SupplierCreated>), ServerError> {
    let supplier = state
        .engine
        .add_supplier(&identity, payload.name.as_deref().unwrap_or_default())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SupplierCreated {
            message: "Supplier added successfully".to_string(),
            supplier: map_supplier(supplier),
        }),
    ))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<SupplierView>>, ServerError> {
    let suppliers = state
        .engine
        .list_suppliers(&identity)
        .await?
        .into_iter()
        .map(map_supplier)
        .collect();
    Ok(Json(suppliers))
}

pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_supplier(&identity, &id).await?;
    Ok(Json(Message::new("Supplier deleted successfully")))
}
