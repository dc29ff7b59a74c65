//! LedgerStore trait definition.

use async_trait::async_trait;

use super::Result;
use crate::ledger::{CategoryTotal, LogEntry};

/// Interface for the transaction log and category counters.
///
/// The log and the counters are independent tables. Nothing here groups an
/// `append` with its matching `increment`; a reader may observe one without
/// the other.
///
/// Implementations:
/// - `SqliteLedgerStore`: SQLite storage
/// - `PostgresLedgerStore`: PostgreSQL storage
/// - `MockLedgerStore`: In-memory mock for testing
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create both tables if they do not exist.
    async fn init(&self) -> Result<()>;

    /// Drop and recreate both tables, discarding all rows.
    async fn reset(&self) -> Result<()>;

    /// Append one entry to the log partition `entry.user_id`.
    async fn append(&self, entry: &LogEntry) -> Result<()>;

    /// Add `amount` to the accumulator for `category`, creating the row at
    /// zero first if absent.
    async fn increment(&self, category: &str, amount: i64) -> Result<()>;

    /// The `limit` most recent log entries for `user_id`, newest first.
    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<LogEntry>>;

    /// All category accumulator rows, in no particular order.
    async fn totals(&self) -> Result<Vec<CategoryTotal>>;

    /// Release held connections. Further calls may fail.
    async fn close(&self);
}
