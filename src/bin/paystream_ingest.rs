//! paystream-ingest: Generator/Ingestor
//!
//! Replays transaction templates into the store at a fixed pace. Every tick
//! appends one entry to the user's log and bumps that category's counter.
//!
//! ## Architecture
//! ```text
//! [templates.csv] -> [paystream-ingest] --append----> [transactions_by_user]
//!                                       \--increment-> [spending_analytics]
//! ```
//!
//! ## Configuration
//! - `--config <path>` or PAYSTREAM_CONFIG: YAML config file
//! - PAYSTREAM__INGEST__TEMPLATES_PATH: template CSV (default: data/transactions.csv)
//! - PAYSTREAM__INGEST__ON_WRITE_ERROR: `log_and_continue` (default) or `fail_fast`
//! - PAYSTREAM_LOG: tracing filter (default: info)

use tracing::{error, info};

use paystream::config::Config;
use paystream::ingest::{prepare_schema, Ingestor};
use paystream::storage::connect_storage_with_retry;
use paystream::templates::TemplatePool;
use paystream::utils::bootstrap::{init_tracing, parse_config_path, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("[1/4] Connecting to store...");
    let store = connect_storage_with_retry(&config.storage).await?;

    info!("[2/4] Setting up schema...");
    if let Err(e) = prepare_schema(store.as_ref(), config.ingest.reset_schema).await {
        error!(error = %e, "Schema setup failed");
        store.close().await;
        return Err(e.into());
    }

    info!("[3/4] Loading '{}'...", config.ingest.templates_path);
    let templates = match TemplatePool::load(&config.ingest.templates_path) {
        Ok(templates) => templates,
        Err(e) => {
            error!(error = %e, "Cannot load transaction templates");
            store.close().await;
            return Err(e.into());
        }
    };
    info!(
        "Loaded {} templates. Starting infinite stream...",
        templates.len()
    );

    info!("[4/4] Streaming live (press Ctrl+C to stop)");
    let mut ingestor = Ingestor::from_config(store.clone(), templates, &config.ingest);
    let result = ingestor.run(shutdown_signal()).await;

    store.close().await;

    let summary = result?;
    info!(
        written = summary.written,
        failed = summary.failed,
        "paystream-ingest stopped"
    );
    Ok(())
}
