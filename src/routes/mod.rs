//! Router assembly: contact and common routes plus the request middleware stack.

mod common;
mod contacts;

pub use common::common_routes;
pub use contacts::contact_routes;

use crate::error::{ErrorBody, ErrorDetail, INTERNAL_MESSAGE};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Converts a handler panic into the generic 500 body; the payload is only logged.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: ErrorDetail::Message(INTERNAL_MESSAGE.into()),
        }),
    )
        .into_response()
}

/// Full application router. Oversized bodies surface as extractor rejections, so handlers answer them in JSON.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(contact_routes(state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}
