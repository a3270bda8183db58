//! API constants

/// Versioned prefix for the JSON API
pub const API_PREFIX: &str = "/api/v0";

/// Page title, also used as the OpenAPI title
pub const PAGE_TITLE: &str = "PDF Processor";

/// Largest accepted request body (form or JSON)
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
