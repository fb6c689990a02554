//! `fleet-relay` — ingestion relay entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP spans).
//! 3. Resolve broker settings; the producer itself is created on first use.
//! 4. Build the Axum router and serve until Ctrl-C / SIGTERM.

mod broker;
mod config;
mod scoring;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use broker::{BrokerSettings, KafkaProducerFactory, ProducerManager};
use config::Config;
use scoring::TelemetryScorer;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        http_port = cfg.http_port,
        topic = %cfg.broker_topic,
        local = cfg.is_local,
        "fleet-relay starting"
    );

    // -----------------------------------------------------------------------
    // 3. Broker producer (lazy)
    // -----------------------------------------------------------------------
    let settings =
        BrokerSettings::from_config(&cfg).context("failed to resolve broker settings")?;
    let producers = ProducerManager::new(settings, Arc::new(KafkaProducerFactory));
    info!(
        bootstrap_servers = %producers.settings().bootstrap_servers,
        ca_location = %producers.settings().ca_location.display(),
        "broker settings resolved"
    );

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(Arc::new(TelemetryScorer), producers);
    let router = server::router::build(
        state,
        server::middleware::request_timeout(cfg.request_timeout_secs),
    );

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.http_port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    telemetry::shutdown_telemetry();
    info!("fleet-relay stopped");
    Ok(())
}
