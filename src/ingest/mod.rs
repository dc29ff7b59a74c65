//! Generator/ingestor: the dual-write ingestion loop.
//!
//! Each iteration synthesizes one transaction and issues two independent
//! writes: an append to the per-user log, then an increment of the category
//! counter. The writes share no transaction, so a reader polling between them
//! can see the log entry before its counter contribution.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde::Deserialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::ledger::LogEntry;
use crate::storage::{LedgerStore, StorageError};
use crate::templates::TemplatePool;

mod generator;

pub use generator::TransactionGenerator;

/// What the loop does when a steady-state write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteErrorPolicy {
    /// Log the failure and move on to the next tick.
    #[default]
    LogAndContinue,
    /// Stop the loop and surface the error.
    FailFast,
}

/// Ingestor configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// CSV file holding the template pool.
    pub templates_path: String,
    /// Partition key every generated transaction is written under.
    pub user_id: String,
    /// Pause between iterations, in milliseconds.
    pub interval_ms: u64,
    /// Steady-state write failure handling.
    pub on_write_error: WriteErrorPolicy,
    /// Drop and recreate both tables before streaming.
    pub reset_schema: bool,
    /// Stop after this many iterations. Unbounded when absent.
    pub max_transactions: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            templates_path: "data/transactions.csv".to_string(),
            user_id: "User_1".to_string(),
            interval_ms: 1000,
            on_write_error: WriteErrorPolicy::default(),
            reset_schema: false,
            max_transactions: None,
        }
    }
}

/// Errors from one ingestion iteration.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to append transaction {transaction_id}: {source}")]
    Append {
        transaction_id: Uuid,
        #[source]
        source: StorageError,
    },

    #[error("Failed to increment category '{category}': {source}")]
    Increment {
        category: String,
        #[source]
        source: StorageError,
    },
}

/// Outcome counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Iterations where both writes succeeded.
    pub written: u64,
    /// Iterations where a write failed and the loop continued.
    pub failed: u64,
}

impl IngestSummary {
    pub fn attempted(&self) -> u64 {
        self.written + self.failed
    }
}

/// Drives the generator against a store at a fixed pace.
pub struct Ingestor {
    store: Arc<dyn LedgerStore>,
    generator: TransactionGenerator,
    user_id: String,
    interval: Duration,
    policy: WriteErrorPolicy,
    max_transactions: Option<u64>,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        generator: TransactionGenerator,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            generator,
            user_id: user_id.into(),
            interval: Duration::from_secs(1),
            policy: WriteErrorPolicy::default(),
            max_transactions: None,
        }
    }

    /// Build an ingestor from configuration and a loaded template pool.
    pub fn from_config(
        store: Arc<dyn LedgerStore>,
        templates: TemplatePool,
        config: &IngestConfig,
    ) -> Self {
        Self::new(store, TransactionGenerator::new(templates), config.user_id.clone())
            .with_interval(Duration::from_millis(config.interval_ms))
            .with_policy(config.on_write_error)
            .with_max_transactions(config.max_transactions)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_policy(mut self, policy: WriteErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_transactions(mut self, max: Option<u64>) -> Self {
        self.max_transactions = max;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Run one iteration: synthesize, append, increment, report.
    ///
    /// A failed append skips the increment. A failed increment leaves the
    /// appended entry in place.
    pub async fn ingest_once(&mut self) -> Result<LogEntry, IngestError> {
        let entry = self.generator.next_entry(&self.user_id);

        self.store
            .append(&entry)
            .await
            .map_err(|source| IngestError::Append {
                transaction_id: entry.transaction_id,
                source,
            })?;

        self.store
            .increment(&entry.category, entry.truncated_amount())
            .await
            .map_err(|source| IngestError::Increment {
                category: entry.category.clone(),
                source,
            })?;

        info!(
            transaction_id = %entry.transaction_id,
            category = %entry.category,
            "{}",
            progress_line(&entry)
        );

        Ok(entry)
    }

    /// Ingest until `shutdown` resolves or `max_transactions` is reached.
    ///
    /// A shutdown that arrives mid-iteration takes effect after that
    /// iteration's increment.
    ///
    /// Write failures follow the configured [`WriteErrorPolicy`].
    pub async fn run<F>(&mut self, shutdown: F) -> Result<IngestSummary, IngestError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut summary = IngestSummary::default();

        info!(
            user_id = %self.user_id,
            templates = self.generator.pool().len(),
            interval = ?self.interval,
            "Streaming live"
        );

        loop {
            if self
                .max_transactions
                .is_some_and(|max| summary.attempted() >= max)
            {
                info!(written = summary.written, "Transaction limit reached");
                break;
            }

            // Shutdown is only honoured between iterations. Once started, an
            // iteration issues both writes so no log entry loses its increment.
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = std::future::ready(()) => {}
            }
            let outcome = self.ingest_once().await;

            match outcome {
                Ok(_) => summary.written += 1,
                Err(e) => match self.policy {
                    WriteErrorPolicy::FailFast => {
                        error!(error = %e, "Ingestion failed, stopping");
                        return Err(e);
                    }
                    WriteErrorPolicy::LogAndContinue => {
                        error!(error = %e, "Ingestion failed, continuing");
                        summary.failed += 1;
                    }
                },
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(
            written = summary.written,
            failed = summary.failed,
            "Stream stopped"
        );
        Ok(summary)
    }
}

/// Bring a freshly connected store's schema into shape for streaming.
///
/// Connecting already creates missing tables, so this only acts when
/// `reset_schema` asks for history to be discarded.
pub async fn prepare_schema(
    store: &dyn LedgerStore,
    reset_schema: bool,
) -> Result<(), StorageError> {
    if reset_schema {
        info!("Dropping and recreating ledger tables");
        store.reset().await
    } else {
        debug!("Keeping existing ledger tables");
        Ok(())
    }
}

/// Operator-facing progress line for one ingested transaction.
pub fn progress_line(entry: &LogEntry) -> String {
    format!(
        "[{}] New {} txn: ${:6.2} at {} ({})",
        entry
            .transaction_time
            .with_timezone(&Local)
            .format("%H:%M:%S"),
        entry.payment_method,
        entry.amount,
        entry.merchant,
        entry.category
    )
}
