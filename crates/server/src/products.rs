//! Products API endpoints. Every mutation is recorded in the audit log.

use api_types::{
    Message,
    product::{ProductCreated, ProductNew, ProductView, QuantityUpdate},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Identity, ProductDraft};

use crate::{ServerError, extract::JsonBody, server::ServerState};

fn map_product(product: engine::Product) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        category: product.category,
        subcategory: product.subcategory,
        supplier: product.supplier,
        quantity: product.quantity,
        image_url: product.image_url,
        created_at: product.created_at,
    }
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<ProductNew>,
) -> Result<(StatusCode, Json<ProductCreated>), ServerError> {
    let draft = ProductDraft {
        name: payload.name.as_deref(),
        category: payload.category.as_deref(),
        subcategory: payload.subcategory.as_deref(),
        supplier: payload.supplier.as_deref(),
        image_url: payload.image_url.as_deref(),
    };
    let product = state.engine.add_product(&identity, draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreated {
            message: "Product added".to_string(),
            product: map_product(product),
        }),
    ))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ProductView>>, ServerError> {
    let products = state
        .engine
        .list_products(&identity)
        .await?
        .into_iter()
        .map(map_product)
        .collect();
    Ok(Json(products))
}

pub async fn update_quantity(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<QuantityUpdate>,
) -> Result<Json<Message>, ServerError> {
    let quantity = payload
        .quantity
        .ok_or_else(|| ServerError::Generic("Invalid quantity value".to_string()))?;
    state
        .engine
        .update_product_quantity(&identity, &id, quantity)
        .await?;
    Ok(Json(Message::new("Quantity updated successfully")))
}

pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_product(&identity, &id).await?;
    Ok(Json(Message::new("Product deleted successfully")))
}
