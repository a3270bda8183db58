//! PDF Processor Core Library
//!
//! This crate provides the domain models, error types, secrets loading and
//! configuration shared by the invoker, export and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod secrets;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ExtractionResult, ObjectReference};
pub use secrets::{AwsCredentials, CredentialState, SecretsError};
