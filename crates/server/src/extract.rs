//! Request extractors with error bodies shaped like every other response.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::ServerError;

/// `Json<T>` whose rejections (missing content type, syntax errors, wrong
/// field types) all become a 400 with a `{"message"}` body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("rejected request body: {}", rejection.body_text());
                Err(ServerError::Generic("Invalid JSON".to_string()))
            }
        }
    }
}
