//! IngestWatch - Ingestion Activity Monitor for the Knowledge Pipeline
//!
//! Headless entry point. It wires the monitor core to the live pipeline:
//! - Configuration from `IngestWatch Data/IngestWatch Config.yaml`
//! - Logging to `logs/` with daily rotation plus console output
//! - [`HttpStatusSource`] polling the pipeline's status endpoint
//! - [`DomainTally`] collecting per-domain completion counts
//!
//! Lifecycle transitions, link health, and batched notifications are
//! written to the log as they happen; ctrl-c tears the monitor down and
//! dumps the session's counters.

use anyhow::{Context, Result};
use ingestwatch::models::{Domain, MonitorSettings};
use ingestwatch::services::HttpStatusSource;
use ingestwatch::{APP_NAME, ConfigManager, DomainTally, IngestionMonitor, VERSION};
use std::sync::Arc;

fn main() -> Result<()> {
    // Config first: the debug flag decides the log level.
    let config_manager = ConfigManager::new("IngestWatch Data")?;
    let config = config_manager.load_config()?;
    let settings = config.monitor_settings;

    let _guard =
        ingestwatch::logging::setup_logging("logs", "ingestwatch", settings.debug_mode, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("ingestwatch-worker")
        .build()?;

    let result = runtime.block_on(run(settings));

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    tracing::info!("Application shutdown complete");

    result
}

async fn run(settings: MonitorSettings) -> Result<()> {
    let source = HttpStatusSource::new(&settings.status_url);
    tracing::info!("Polling {}", source.url());

    let tally = Arc::new(DomainTally::new());
    let monitor = IngestionMonitor::new(settings);
    let metrics = monitor.metrics();
    let handle = monitor.start(source, tally.clone());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;
    tracing::info!("Ctrl-C received, shutting down");

    handle.shutdown().await;

    for domain in Domain::ALL {
        tracing::info!("{}: {} files ingested", domain, tally.get(domain));
    }
    metrics.log_summary();

    Ok(())
}
