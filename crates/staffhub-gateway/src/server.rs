//! HTTP server implementation using Axum.

use axum::{Router, routing::{get, post}};
use staffhub_core::config::GatewayConfig;
use staffhub_platform::TenantService;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TenantService>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(service: Arc<TenantService>) -> Self {
        Self { service, start_time: std::time::Instant::now() }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(super::routes::health_check))
        .route("/api/v1/connectivity", get(super::routes::connectivity_status))
        .route("/api/v1/connectivity/online", post(super::routes::report_online))
        .route("/api/v1/connectivity/offline", post(super::routes::report_offline))
        .route("/api/v1/tenants/{tenant}/{resource}", get(super::routes::list_documents))
        .route("/api/v1/tenants/{tenant}/{resource}/{id}", get(super::routes::get_document))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server.
pub async fn start(config: &GatewayConfig, service: Arc<TenantService>) -> anyhow::Result<()> {
    let app = build_router(AppState::new(service));
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Gateway server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
