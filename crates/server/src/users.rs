//! Login and user management endpoints.

use api_types::{
    Message,
    auth::{Login, LoginResponse, LoginUser},
    user::{UserCreated, UserNew, UserView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::Identity;

use crate::{ServerError, auth::wire_role, extract::JsonBody, server::ServerState};

fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        role: wire_role(user.role),
    }
}

/// Handle credential checks. This is the only route reachable without a token.
pub async fn login(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<Login>,
) -> Result<Json<LoginResponse>, ServerError> {
    let identity = state
        .engine
        .login(&payload.username, &payload.password)
        .await?;
    let token = state.keys.issue(&identity)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: LoginUser {
            username: identity.username,
            role: wire_role(identity.role),
        },
        token,
    }))
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<UserNew>,
) -> Result<(StatusCode, Json<UserCreated>), ServerError> {
    let user = state
        .engine
        .create_user(
            &identity,
            payload.username.as_deref(),
            payload.password.as_deref(),
            payload.role.as_deref(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserCreated {
            message: "User created successfully".to_string(),
            user: map_user(user),
        }),
    ))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<UserView>>, ServerError> {
    let users = state
        .engine
        .list_users(&identity)
        .await?
        .into_iter()
        .map(map_user)
        .collect();
    Ok(Json(users))
}

pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_user(&identity, &id).await?;
    Ok(Json(Message::new("User deleted successfully")))
}
