//! API server: builds the REST router and serves it over HTTP.

use crate::rest::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use leadflow_attribution::{AttributionCapture, LeadScorer, ValueCalculator};
use leadflow_cache::MemoryStore;
use leadflow_core::config::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    store: MemoryStore,
}

impl ApiServer {
    pub fn new(config: AppConfig, store: MemoryStore) -> Self {
        Self { config, store }
    }

    fn state(&self) -> AppState {
        AppState {
            store: self.store.clone(),
            capture: AttributionCapture::new(&self.config.attribution),
            scorer: Arc::new(LeadScorer::new(self.config.scoring.clone())),
            values: Arc::new(ValueCalculator::new(self.config.value.clone())),
            conversion: Arc::new(self.config.conversion.clone()),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        }
    }

    /// Router with every REST route and middleware attached.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/v1/attribution", post(rest::handle_capture))
            .route("/v1/leads/score", post(rest::handle_score))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state())
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
