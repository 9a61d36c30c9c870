//! Categories API endpoints.

use api_types::{
    Message,
    category::{
        CategoryCreate, CategoryCreated, CategoryDelete, CategoryKind, CategoryTreeView,
        CategoryView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{CategoryDeletion, Identity};

use crate::{ServerError, extract::JsonBody, server::ServerState};

fn map_kind(kind: engine::CategoryKind) -> CategoryKind {
    match kind {
        engine::CategoryKind::Category => CategoryKind::Category,
        engine::CategoryKind::Subcategory => CategoryKind::Subcategory,
    }
}

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        parent_id: category.parent_id,
        created_by: category.created_by,
        created_at: category.created_at,
    }
}

fn map_node(node: engine::CategoryNode) -> CategoryTreeView {
    CategoryTreeView {
        category: map_category(node.category),
        subcategories: node.subcategories.into_iter().map(map_category).collect(),
    }
}

/// Handle requests for creating a category, optionally with inline
/// subcategories, or a subcategory when `parentId` is given.
pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let subcategories = payload.subcategory_names();
    let id = state
        .engine
        .add_category(
            &identity,
            payload.name.as_deref().unwrap_or_default(),
            &subcategories,
            payload.parent_id.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            message: "Category and subcategories added successfully".to_string(),
            id,
        }),
    ))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryTreeView>>, ServerError> {
    let categories = state
        .engine
        .list_categories(&identity)
        .await?
        .into_iter()
        .map(map_node)
        .collect();
    Ok(Json(categories))
}

/// Handle `DELETE /categories/{id}`; `?type=category` cascades to the
/// subcategories.
pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<CategoryDelete>,
) -> Result<Json<Message>, ServerError> {
    let deletion = state
        .engine
        .delete_category(&identity, &id, query.kind.as_deref())
        .await?;

    let message = match deletion {
        CategoryDeletion::Cascade { .. } => "Category and its subcategories deleted successfully",
        CategoryDeletion::Single => "Subcategory deleted successfully",
    };
    Ok(Json(Message::new(message)))
}
