use crate::constants::API_PREFIX;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use pdfproc_core::ExtractionResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Object key or `s3://bucket/key` URI; the configured default when omitted
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractionResponse {
    pub result_id: Uuid,
    pub source: String,
    pub columns: Vec<String>,
    /// One array per row, aligned with `columns`; `null` where a row has no value
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
    pub received_at: DateTime<Utc>,
    pub export_url: String,
}

impl ExtractionResponse {
    pub fn new(result_id: Uuid, result: &ExtractionResult) -> Self {
        Self {
            result_id,
            source: result.source.to_string(),
            columns: result.columns.clone(),
            rows: result.rows.clone(),
            row_count: result.row_count(),
            received_at: result.received_at,
            export_url: format!("{}/results/{}/export", API_PREFIX, result_id),
        }
    }
}

/// Reference from the request, falling back to the configured default.
pub(crate) fn requested_reference<'a>(requested: Option<&'a str>, default: &'a str) -> &'a str {
    requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}

#[utoipa::path(
    post,
    path = "/api/v0/process",
    tag = "extraction",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "PDF processed", body = ExtractionResponse),
        (status = 400, description = "Invalid object reference", body = ErrorResponse),
        (status = 404, description = "PDF object not found", body = ErrorResponse),
        (status = 500, description = "Credentials missing or rejected", body = ErrorResponse),
        (status = 502, description = "Remote function failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "process_pdf_api"))]
pub async fn process_pdf(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ProcessRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let reference = requested_reference(
        request.file_name.as_deref(),
        state.config.default_file_name(),
    );

    let result = state.extraction.process(reference).await?;
    let (result_id, result) = state.results.insert(result).await;

    Ok(Json(ExtractionResponse::new(result_id, &result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_reference_defaults() {
        assert_eq!(requested_reference(None, "a.pdf"), "a.pdf");
        assert_eq!(requested_reference(Some("  "), "a.pdf"), "a.pdf");
        assert_eq!(requested_reference(Some(" b.pdf "), "a.pdf"), "b.pdf");
    }
}
