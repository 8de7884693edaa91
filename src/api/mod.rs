use std::any::Any;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::{
    assistant::StudyAssistant,
    error::{error_response, INTERNAL_ERROR},
    registry::ComponentRegistry,
};

pub mod handlers;
pub mod types;

use handlers::{ask, components};

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<StudyAssistant>,
    pub registry: ComponentRegistry,
}

pub fn router() -> Router<AppState> {
    Router::new()
        // POST /api/ask  { "message": "..." }
        .route("/api/ask", post(ask))
        .route("/api/components", get(components))
}

/// Full service: routes, CORS for the browser client, request tracing and
/// a panic guard that still answers with the JSON error body.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(router())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_headers(cors::Any)
                .allow_methods(cors::Any),
        )
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
}
