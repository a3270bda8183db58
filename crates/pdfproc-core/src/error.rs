//! Error types module
//!
//! All request-level failures are unified under [`AppError`]. The variants map
//! onto three families:
//!
//! - configuration errors (missing or rejected credentials), fatal to the request
//! - invocation errors (remote function unreachable, failing, or returning an
//!   unusable payload), surfaced to the user
//! - input errors (bad object reference, object absent), user-correctable
//!
//! None of them is fatal to the hosting process.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a failing remote call
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "CONFIGURATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote function invocation failed: {0}")]
    Invocation(String),

    #[error("Remote function failed with status code {status_code}: {message}")]
    RemoteFunction { status_code: i32, message: String },

    #[error("Malformed remote function response: {0}")]
    MalformedResponse(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Static metadata: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Configuration(_) => (
            500,
            "CONFIGURATION_ERROR",
            false,
            Some("Check the configured AWS credentials and region"),
            false,
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check the object reference and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::ObjectNotFound(_) => (
            404,
            "OBJECT_NOT_FOUND",
            false,
            Some("Verify the PDF exists in the configured bucket"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Process the PDF again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Invocation(_) => (
            502,
            "INVOCATION_FAILED",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::RemoteFunction { .. } => (
            502,
            "REMOTE_FUNCTION_ERROR",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::MalformedResponse(_) => (
            502,
            "MALFORMED_RESPONSE",
            false,
            Some("Check the remote function's response format"),
            false,
            LogLevel::Error,
        ),
        AppError::Export(_) => (500, "EXPORT_FAILED", false, None, false, LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            false,
            None,
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Configuration(_) => "Configuration",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::ObjectNotFound(_) => "ObjectNotFound",
            AppError::NotFound(_) => "NotFound",
            AppError::Invocation(_) => "Invocation",
            AppError::RemoteFunction { .. } => "RemoteFunction",
            AppError::MalformedResponse(_) => "MalformedResponse",
            AppError::Export(_) => "Export",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Configuration(ref msg) => format!("Configuration error: {}", msg),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::ObjectNotFound(ref msg) => format!("Object not found: {}", msg),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Invocation(ref msg) => {
                format!("Error executing remote function: {}", msg)
            }
            AppError::RemoteFunction {
                status_code,
                message,
            } => format!(
                "Remote function execution failed with status code: {}. Error message: {}",
                status_code, message
            ),
            AppError::MalformedResponse(_) => {
                "Remote function returned a response that could not be read".to_string()
            }
            AppError::Export(_) => "Failed to build the spreadsheet export".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
