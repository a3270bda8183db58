//! PDF Processor API Library
//!
//! This crate provides the HTML page, the JSON API, the result store and
//! application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
mod page;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod results;
pub mod services;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use results::ResultStore;
pub use services::ExtractionService;
pub use state::AppState;
