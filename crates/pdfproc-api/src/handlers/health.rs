//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub credentials: String,
    pub function_name: String,
    /// Results currently held for display and export
    pub stored_results: usize,
    pub result_capacity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Liveness check - process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check - credentials loaded and remote function client built.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to process PDFs", body = ReadinessResponse),
        (status = 503, description = "Credentials unavailable", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let reason = state.extraction.unavailable_reason().map(String::from);
    let ready = reason.is_none();

    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        credentials: if ready { "loaded" } else { "unavailable" }.to_string(),
        function_name: state.config.function_name().to_string(),
        stored_results: state.results.len().await,
        result_capacity: state.results.capacity(),
        reason,
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
