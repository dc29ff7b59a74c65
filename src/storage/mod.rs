//! Storage implementations.
//!
//! The ledger store is modelled as a schema-constrained column store with two
//! tables: an append-only per-user log clustered by time, and an
//! increment-only per-category counter table.

use std::sync::Arc;
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use tracing::{info, warn};

use crate::config::{StorageConfig, StorageType};

pub mod helpers;
mod ledger_store;
pub mod mock;
pub mod schema;
pub mod sql;

pub use ledger_store::LedgerStore;
pub use mock::MockLedgerStore;

#[cfg(feature = "sqlite")]
pub use sql::sqlite::SqliteLedgerStore;

#[cfg(feature = "postgres")]
pub use sql::postgres::PostgresLedgerStore;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Storage backend '{0}' requested but its feature is not enabled")]
    BackendDisabled(&'static str),
}

/// Open a store based on configuration and create its tables.
///
/// Single attempt; see [`connect_storage_with_retry`] for startup use.
pub async fn init_storage(config: &StorageConfig) -> Result<Arc<dyn LedgerStore>> {
    let store: Arc<dyn LedgerStore> = match config.storage_type {
        StorageType::Sqlite => connect_sqlite(config).await?,
        StorageType::Postgres => connect_postgres(config).await?,
    };
    store.init().await?;
    Ok(store)
}

/// Open the configured store, retrying indefinitely with a fixed delay.
///
/// The store is expected to be unreachable for a while during environment
/// bring-up, so connection failures are retried. A backend that was compiled
/// out is a configuration error and is returned immediately.
pub async fn connect_storage_with_retry(config: &StorageConfig) -> Result<Arc<dyn LedgerStore>> {
    let delay = Duration::from_secs(config.connect_retry_secs);
    let backoff = ConstantBuilder::default()
        .with_delay(delay)
        .without_max_times();

    let connect = || init_storage(config);
    let store = connect
        .retry(backoff)
        .when(|e| !matches!(e, StorageError::BackendDisabled(_)))
        .notify(|err: &StorageError, dur: Duration| {
            warn!(error = %err, delay = ?dur, "Waiting for store");
        })
        .await?;

    info!(storage = ?config.storage_type, "Connected to store");
    Ok(store)
}

#[cfg(feature = "sqlite")]
async fn connect_sqlite(config: &StorageConfig) -> Result<Arc<dyn LedgerStore>> {
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    let path = &config.sqlite.path;
    info!("Storage: sqlite at {}", path);

    let pool = if path == ":memory:" {
        // Every connection to :memory: is a separate database; pin to one.
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?
    } else {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        SqlitePoolOptions::new().connect_with(options).await?
    };

    Ok(Arc::new(SqliteLedgerStore::new(pool)))
}

#[cfg(not(feature = "sqlite"))]
async fn connect_sqlite(_config: &StorageConfig) -> Result<Arc<dyn LedgerStore>> {
    Err(StorageError::BackendDisabled("sqlite"))
}

#[cfg(feature = "postgres")]
async fn connect_postgres(config: &StorageConfig) -> Result<Arc<dyn LedgerStore>> {
    info!("Storage: postgres at {}", config.postgres.uri);
    let pool = sqlx::postgres::PgPool::connect(&config.postgres.uri).await?;
    Ok(Arc::new(PostgresLedgerStore::new(pool)))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_config: &StorageConfig) -> Result<Arc<dyn LedgerStore>> {
    Err(StorageError::BackendDisabled("postgres"))
}
