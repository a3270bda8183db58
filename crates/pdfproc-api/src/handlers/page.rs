//! HTML page handlers
//!
//! Failures are rendered in-page with the error's status code rather than as
//! JSON error bodies.

use crate::error::{log_error, status_of};
use crate::handlers::process::requested_reference;
use crate::page::{render_page, Outcome, PageView};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Form,
};
use pdfproc_export::Table;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ProcessForm {
    #[serde(default)]
    pub file_name: Option<String>,
}

pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(render_page(&PageView {
        file_name: state.config.default_file_name(),
        outcome: None,
    }))
}

#[tracing::instrument(skip(state, form), fields(operation = "process_pdf_page"))]
pub async fn process_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ProcessForm>,
) -> impl IntoResponse {
    let reference = requested_reference(form.file_name.as_deref(), state.config.default_file_name());

    match state.extraction.process(reference).await {
        Ok(result) => {
            let (result_id, result) = state.results.insert(result).await;
            let table = Table::from_result(&result);
            let html = render_page(&PageView {
                file_name: reference,
                outcome: Some(Outcome::Success {
                    result_id,
                    table: &table,
                }),
            });
            (StatusCode::OK, Html(html))
        }
        Err(error) => {
            log_error(&error);
            let html = render_page(&PageView {
                file_name: reference,
                outcome: Some(Outcome::Failure { error: &error }),
            });
            (status_of(&error), Html(html))
        }
    }
}
