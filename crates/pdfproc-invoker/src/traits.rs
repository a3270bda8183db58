//! Remote invocation abstraction traits
//!
//! This module defines the traits every remote function backend and object
//! locator must implement, plus the error type they share.

use async_trait::async_trait;
use bytes::Bytes;
use pdfproc_core::{AppError, ObjectReference};
use thiserror::Error;

/// Invocation errors
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    #[error("Credentials rejected: {0}")]
    Credentials(String),

    #[error("Remote function not found: {0}")]
    FunctionNotFound(String),

    #[error("Remote function unreachable: {0}")]
    Transport(String),

    #[error("Remote function failed with status code {status_code}: {message}")]
    Remote { status_code: i32, message: String },

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for invocation operations
pub type InvokeResult<T> = Result<T, InvokeError>;

impl From<InvokeError> for AppError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::Credentials(msg) => AppError::Configuration(msg),
            InvokeError::ConfigError(msg) => AppError::Configuration(msg),
            InvokeError::FunctionNotFound(msg) => {
                AppError::Invocation(format!("function not found: {}", msg))
            }
            InvokeError::Transport(msg) => AppError::Invocation(msg),
            InvokeError::Remote {
                status_code,
                message,
            } => AppError::RemoteFunction {
                status_code,
                message,
            },
            InvokeError::ObjectNotFound(msg) => AppError::ObjectNotFound(msg),
            InvokeError::MalformedResponse(msg) => AppError::MalformedResponse(msg),
        }
    }
}

/// Raw outcome of a synchronous invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResponse {
    /// HTTP-level status reported by the invoke API (200 on success).
    pub status_code: i32,
    /// Set when the function itself raised (e.g. `Unhandled`).
    pub function_error: Option<String>,
    pub payload: Bytes,
    pub executed_version: Option<String>,
}

impl InvocationResponse {
    pub fn ok(payload: impl Into<Bytes>) -> Self {
        Self {
            status_code: 200,
            function_error: None,
            payload: payload.into(),
            executed_version: None,
        }
    }
}

/// Remote function abstraction trait
///
/// Implementations perform exactly one synchronous call per `invoke` and never
/// retry.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invoke the function with an already encoded JSON payload.
    async fn invoke(&self, payload: Bytes) -> InvokeResult<InvocationResponse>;

    /// Name of the target function
    fn function_name(&self) -> &str;
}

/// Object storage existence check used before invoking the remote function.
#[async_trait]
pub trait ObjectLocator: Send + Sync {
    /// Check whether the referenced object exists.
    async fn exists(&self, reference: &ObjectReference) -> InvokeResult<bool>;

    /// Bucket checked when a reference does not name one.
    fn bucket(&self) -> &str;
}
