//! HTTP error response conversion
//!
//! JSON handlers return `Result<impl IntoResponse, HttpAppError>` and use `?` on
//! anything that converts into `AppError`. Page handlers render errors in-page
//! instead (see `handlers::page`).

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfproc_core::{AppError, ErrorMetadata, LogLevel};
use pdfproc_export::ExportError;
use pdfproc_invoker::InvokeError;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Retry after a short delay")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    /// Build the response body for `error`, hiding details when asked to.
    pub fn from_app_error(error: &AppError, hide_details: bool) -> Self {
        let hide_details = hide_details || error.is_sensitive();
        Self {
            error: error.client_message(),
            details: (!hide_details).then(|| error.detailed_message()),
            error_type: (!hide_details).then(|| error.error_type().to_string()),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// Detail-free body attached to every error response; swapped in by
/// `middleware::error_details` when running in production.
#[derive(Debug, Clone)]
pub struct RedactedError(pub ErrorResponse);

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from pdfproc-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<InvokeError> for HttpAppError {
    fn from(err: InvokeError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<ExportError> for HttpAppError {
    fn from(err: ExportError) -> Self {
        HttpAppError(err.into())
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

pub fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// HTTP status for an application error.
pub fn status_of(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        log_error(app_error);

        let body = ErrorResponse::from_app_error(app_error, false);
        let mut response = (status_of(app_error), Json(body)).into_response();
        response
            .extensions_mut()
            .insert(RedactedError(ErrorResponse::from_app_error(app_error, true)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_invoke_error_remote() {
        let HttpAppError(app_err) = InvokeError::Remote {
            status_code: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(
            app_err,
            AppError::RemoteFunction {
                status_code: 500,
                ..
            }
        ));
    }

    #[test]
    fn test_from_invoke_error_credentials() {
        let HttpAppError(app_err) =
            InvokeError::Credentials("InvalidSignatureException".to_string()).into();
        assert!(matches!(app_err, AppError::Configuration(_)));
    }

    #[test]
    fn test_from_export_error() {
        let HttpAppError(app_err) = ExportError::TooManyRows(2_000_000).into();
        match app_err {
            AppError::Export(msg) => assert!(msg.contains("2000000")),
            other => panic!("Expected Export variant, got {other}"),
        }
    }

    #[test]
    fn test_details_hidden_for_sensitive_errors() {
        let err = AppError::Internal("lock poisoned".to_string());
        let body = ErrorResponse::from_app_error(&err, false);
        assert_eq!(body.error, "Internal server error");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
        assert_eq!(body.code, "INTERNAL_ERROR");
    }

    #[test]
    fn test_response_carries_redacted_body() {
        let response = HttpAppError(AppError::InvalidInput("bad key".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let RedactedError(body) = response.extensions().get::<RedactedError>().unwrap().clone();
        assert!(body.details.is_none());
        assert_eq!(body.code, "INVALID_INPUT");
    }

    #[test]
    fn test_details_hidden_in_production() {
        let err = AppError::InvalidInput("Object key must reference a PDF file".to_string());
        let body = ErrorResponse::from_app_error(&err, true);
        assert!(body.details.is_none());

        let body = ErrorResponse::from_app_error(&err, false);
        assert_eq!(body.error_type.as_deref(), Some("InvalidInput"));
        assert!(body.details.is_some());
    }

    #[test]
    fn test_error_response_shape() {
        let err = AppError::Invocation("timeout".to_string());
        let json = serde_json::to_value(ErrorResponse::from_app_error(&err, false)).unwrap();
        assert_eq!(json["code"], "INVOCATION_FAILED");
        assert_eq!(json["recoverable"], true);
        assert_eq!(json["suggested_action"], "Retry after a short delay");
        assert!(json["error"].as_str().is_some());
    }
}
