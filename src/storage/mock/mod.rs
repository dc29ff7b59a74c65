//! Mock storage implementation for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{LedgerStore, Result, StorageError};
use crate::ledger::{CategoryTotal, LogEntry};

/// Mock ledger store that keeps both tables in memory.
///
/// Failure switches let tests simulate an unavailable store per operation.
#[derive(Default)]
pub struct MockLedgerStore {
    log: RwLock<HashMap<String, Vec<LogEntry>>>,
    totals: RwLock<HashMap<String, i64>>,
    fail_on_append: RwLock<bool>,
    fail_on_increment: RwLock<bool>,
    fail_on_read: RwLock<bool>,
    closed: RwLock<bool>,
}

impl MockLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_append(&self, fail: bool) {
        *self.fail_on_append.write().await = fail;
    }

    pub async fn set_fail_on_increment(&self, fail: bool) {
        *self.fail_on_increment.write().await = fail;
    }

    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    /// Whether `close` has been called.
    pub async fn is_closed(&self) -> bool {
        *self.closed.read().await
    }

    /// Every log entry written for `user_id`, in write order.
    pub async fn entries(&self, user_id: &str) -> Vec<LogEntry> {
        self.log
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn check(&self, flag: &RwLock<bool>, operation: &str) -> Result<()> {
        if *self.closed.read().await {
            return Err(StorageError::Unavailable("store closed".to_string()));
        }
        if *flag.read().await {
            return Err(StorageError::Unavailable(format!("{} failed", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MockLedgerStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        self.log.write().await.clear();
        self.totals.write().await.clear();
        Ok(())
    }

    async fn append(&self, entry: &LogEntry) -> Result<()> {
        self.check(&self.fail_on_append, "append").await?;
        self.log
            .write()
            .await
            .entry(entry.user_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn increment(&self, category: &str, amount: i64) -> Result<()> {
        self.check(&self.fail_on_increment, "increment").await?;
        *self
            .totals
            .write()
            .await
            .entry(category.to_string())
            .or_insert(0) += amount;
        Ok(())
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<LogEntry>> {
        self.check(&self.fail_on_read, "recent").await?;
        let mut entries = self.entries(user_id).await;
        // Stable sort keeps write order among equal times; reverse for newest first.
        entries.sort_by_key(|e| e.transaction_time);
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    async fn totals(&self) -> Result<Vec<CategoryTotal>> {
        self.check(&self.fail_on_read, "totals").await?;
        Ok(self
            .totals
            .read()
            .await
            .iter()
            .map(|(category, total_spent)| CategoryTotal {
                category: category.clone(),
                total_spent: *total_spent,
            })
            .collect())
    }

    async fn close(&self) {
        *self.closed.write().await = true;
    }
}
