//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pdfproc-api`. No AWS access is
//! needed; the remote function is replaced by `MockInvoker`.

#![allow(dead_code)]

use axum_test::TestServer;
use pdfproc_api::constants;
use pdfproc_api::setup::routes;
use pdfproc_api::{AppState, ExtractionService};
use pdfproc_core::{AwsCredentials, Config, CredentialState};
use pdfproc_invoker::{MockInvoker, MockLocator, ObjectLocator};
use std::sync::Arc;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the mocks behind it.
pub struct TestApp {
    pub server: TestServer,
    pub invoker: MockInvoker,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config::with_credentials(CredentialState::Loaded(AwsCredentials::new(
        "AKIATESTKEY0000",
        "test-secret",
        "us-east-1",
    )))
}

fn build(config: Config, extraction: ExtractionService, invoker: MockInvoker) -> TestApp {
    let state = Arc::new(AppState::new(config.clone(), extraction));
    let router = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to create test server");
    TestApp {
        server,
        invoker,
        state,
    }
}

/// App whose remote function is `invoker`.
pub fn setup_test_app(invoker: MockInvoker) -> TestApp {
    let extraction = ExtractionService::new(Arc::new(invoker.clone()), None);
    build(test_config(), extraction, invoker)
}

/// App configured for production, where error details are hidden.
pub fn setup_production_app(invoker: MockInvoker) -> TestApp {
    let mut config = test_config();
    config.environment = "production".to_string();
    let extraction = ExtractionService::new(Arc::new(invoker.clone()), None);
    build(config, extraction, invoker)
}

/// App with a pre-flight existence check against `locator`.
pub fn setup_test_app_with_locator(invoker: MockInvoker, locator: MockLocator) -> TestApp {
    let mut config = test_config();
    config.pdf_bucket = Some(locator.bucket().to_string());
    let extraction = ExtractionService::new(Arc::new(invoker.clone()), Some(Arc::new(locator)));
    build(config, extraction, invoker)
}

/// App started without credentials, built through the same path as `main`.
pub async fn setup_app_without_credentials() -> TestApp {
    let config = Config::with_credentials(CredentialState::Unavailable(
        "Missing required secret(s): AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY".to_string(),
    ));
    let extraction = ExtractionService::from_config(&config)
        .await
        .expect("Service should start without credentials");
    build(config, extraction, MockInvoker::with_body(serde_json::json!({})))
}
