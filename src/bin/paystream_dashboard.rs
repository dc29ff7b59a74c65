//! paystream-dashboard: Dashboard/Reader
//!
//! Polls the store once per refresh interval and redraws a text dashboard:
//! the live transaction feed, spend per category, payment mix and top
//! merchants. Query failures are shown inline and never stop the loop.
//!
//! ## Configuration
//! - `--config <path>` or PAYSTREAM_CONFIG: YAML config file
//! - PAYSTREAM__DASHBOARD__FEED_LIMIT: recent entries per tick (default: 10)
//! - PAYSTREAM__DASHBOARD__REFRESH_MS: tick interval (default: 1000)
//! - PAYSTREAM_LOG: tracing filter (default: info)

use tracing::{error, info};

use paystream::config::{Config, StorageType};
use paystream::dashboard::Dashboard;
use paystream::storage::connect_storage_with_retry;
use paystream::utils::bootstrap::{init_tracing, parse_config_path, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let store = connect_storage_with_retry(&config.storage).await?;

    let backend = match config.storage.storage_type {
        StorageType::Sqlite => "SQLite",
        StorageType::Postgres => "PostgreSQL",
    };
    let mut dashboard =
        Dashboard::new(store.clone(), config.dashboard.clone()).with_backend_label(backend);

    info!(user_id = %config.dashboard.user_id, "paystream-dashboard started");

    let mut stdout = std::io::stdout();
    let result = dashboard.run(shutdown_signal(), &mut stdout).await;

    store.close().await;

    let summary = result?;
    info!(
        ticks = summary.ticks,
        failed_ticks = summary.failed_ticks,
        "paystream-dashboard stopped"
    );
    Ok(())
}
