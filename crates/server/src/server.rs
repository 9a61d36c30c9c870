use std::{any::Any, sync::Arc};

use api_types::Message;
use axum::{
    Json, Router,
    extract::{Request, State},
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
};

use crate::{ServerError, auth::TokenKeys, categories, logs, products, suppliers, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub keys: Arc<TokenKeys>,
}

/// Verifies the bearer token and makes the caller's `Identity` available to
/// handlers as an extension.
async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let identity = state.keys.verify(request.headers()).map_err(|err| {
        tracing::debug!("rejected {} {}: {err}", request.method(), request.uri());
        err
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Message::new("Internal Server Error")),
    )
        .into_response()
}

/// Builds the HTTP router. Every route except `/login` requires a bearer token.
pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/categories/{id}", delete(categories::remove))
        .route("/products", get(products::list).post(products::create))
        .route("/products/{id}", delete(products::remove))
        .route("/products/{id}/quantity", put(products::update_quantity))
        .route("/suppliers", get(suppliers::list).post(suppliers::create))
        .route("/suppliers/{id}", delete(suppliers::remove))
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", delete(users::remove))
        .route("/logs", get(logs::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/login", post(users::login))
        .merge(protected)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    keys: TokenKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        keys: Arc::new(keys),
    };

    axum::serve(listener, router(state)).await
}
