use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::process::ExtractionResponse;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use pdfproc_core::constants::XLSX_CONTENT_TYPE;
use pdfproc_core::AppError;
use pdfproc_export::{write_xlsx, Table};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v0/results/{id}",
    tag = "extraction",
    params(
        ("id" = Uuid, Path, description = "Result ID")
    ),
    responses(
        (status = 200, description = "Stored extraction result", body = ExtractionResponse),
        (status = 404, description = "Result not found or expired", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(result_id = %id, operation = "get_result"))]
pub async fn get_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let result = state.results.require(&id).await?;
    Ok(Json(ExtractionResponse::new(id, &result)))
}

#[utoipa::path(
    get,
    path = "/api/v0/results/{id}/export",
    tag = "extraction",
    params(
        ("id" = Uuid, Path, description = "Result ID")
    ),
    responses(
        (status = 200, description = "Spreadsheet with the displayed rows", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 404, description = "Result not found or expired", body = ErrorResponse),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(result_id = %id, operation = "export_result"))]
pub async fn export_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let result = state.results.require(&id).await?;
    let sheet_name = state.config.export_sheet_name().to_string();

    let bytes = tokio::task::spawn_blocking(move || {
        let table = Table::from_result(&result);
        write_xlsx(&table, &sheet_name)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))??;

    tracing::info!(
        result_id = %id,
        size_bytes = bytes.len(),
        "Spreadsheet export generated"
    );

    let content_disposition = format!(
        "attachment; filename=\"{}\"",
        state.config.export_file_name()
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
