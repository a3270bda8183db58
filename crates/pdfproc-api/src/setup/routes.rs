//! Route configuration and setup

use crate::constants::{API_PREFIX, MAX_REQUEST_BODY_BYTES};
use crate::handlers;
use crate::middleware::error_details_middleware;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use pdfproc_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = Router::new()
        .merge(page_routes())
        .merge(api_routes())
        .merge(health_routes())
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            error_details_middleware,
        ))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// HTML page and its download link
fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/process", post(handlers::page::process_form))
        .route(
            "/results/{id}/export",
            get(handlers::results::export_result),
        )
}

/// JSON API
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/process", API_PREFIX),
            post(handlers::process::process_pdf),
        )
        .route(
            &format!("{}/results/{{id}}", API_PREFIX),
            get(handlers::results::get_result),
        )
        .route(
            &format!("{}/results/{{id}}/export", API_PREFIX),
            get(handlers::results::export_result),
        )
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
}
