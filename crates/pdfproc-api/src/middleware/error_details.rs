//! Error detail redaction
//!
//! JSON error responses are built with full details. In production the
//! detail-free body attached by `HttpAppError` replaces them.

use crate::error::RedactedError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let redacted = response.extensions_mut().remove::<RedactedError>();

    match redacted {
        Some(RedactedError(body)) if state.config.is_production() => {
            (response.status(), Json(body)).into_response()
        }
        _ => response,
    }
}
