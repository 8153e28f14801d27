//! Leadflow: marketing attribution capture and lead scoring service.
//!
//! Main entry point that loads configuration and starts the HTTP server.

use clap::Parser;
use leadflow_api::ApiServer;
use leadflow_cache::MemoryStore;
use leadflow_core::config::AppConfig;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "leadflow")]
#[command(about = "Marketing attribution capture and lead scoring service")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "LEADFLOW__NODE_ID")]
    node_id: Option<String>,

    /// Bind address (overrides config)
    #[arg(long, env = "LEADFLOW__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "LEADFLOW__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Prometheus exporter port (overrides config)
    #[arg(long, env = "LEADFLOW__METRICS__PORT")]
    metrics_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadflow=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Leadflow starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        click_id_ttl_days = config.attribution.click_id_ttl_days,
        "Configuration loaded"
    );

    let store = MemoryStore::from_config(&config.store);
    let api_server = ApiServer::new(config.clone(), store.clone());

    if let Err(e) = api_server.start_metrics() {
        error!(error = %e, "Failed to start metrics exporter");
    }

    // Spawn store maintenance task
    let interval_secs = config.store.maintenance_interval_secs.max(1);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            store.evict_expired();
        }
    });

    info!("Leadflow is ready to serve traffic");

    api_server.start_http().await?;

    Ok(())
}
