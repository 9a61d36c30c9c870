use api_types::log::LogView;
use axum::{Extension, Json, extract::State};
use engine::Identity;

use crate::{ServerError, server::ServerState};

/// Handle requests for the audit log, newest entry first.
pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<LogView>>, ServerError> {
    let entries = state
        .engine
        .list_logs(&identity)
        .await?
        .into_iter()
        .map(|entry| LogView {
            id: entry.id,
            action: entry.action,
            product: entry.product,
            quantity: entry.quantity,
            user: entry.user,
            date: entry.date,
        })
        .collect();
    Ok(Json(entries))
}
