//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PDF Processor",
        version = "0.1.0",
        description = "Runs the remote PDF extraction function on a stored PDF, returns the extracted fields as rows and columns, and exports them as an xlsx spreadsheet. JSON endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::process::process_pdf,
        handlers::results::get_result,
        handlers::results::export_result,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        handlers::process::ProcessRequest,
        handlers::process::ExtractionResponse,
        handlers::health::ReadinessResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "extraction", description = "PDF extraction and export"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
