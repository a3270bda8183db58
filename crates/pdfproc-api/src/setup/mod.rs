//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::services::ExtractionService;
use crate::state::AppState;
use anyhow::{Context, Result};
use pdfproc_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        function_name = %config.function_name(),
        credentials_loaded = config.credentials_loaded(),
        "Configuration loaded and validated successfully"
    );

    let extraction = ExtractionService::from_config(&config)
        .await
        .context("Failed to initialize extraction service")?;

    let state = Arc::new(AppState::new(config.clone(), extraction));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
