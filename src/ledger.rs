//! Ledger records: the per-user transaction log and per-category totals.
//!
//! Log entries are append-only and ordered by `transaction_time` descending
//! within a user partition. Category totals are increment-only accumulators.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::templates::TransactionTemplate;

/// One row of the append-only transaction log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Partition key.
    pub user_id: String,
    /// Clustering key, descending.
    pub transaction_time: DateTime<Utc>,
    /// Unique across every entry ever written.
    pub transaction_id: Uuid,
    pub amount: f64,
    pub category: String,
    pub merchant: String,
    pub payment_method: String,
}

impl LogEntry {
    /// Stamp a template with a time and a fresh identifier.
    pub fn from_template(
        user_id: impl Into<String>,
        template: &TransactionTemplate,
        transaction_time: DateTime<Utc>,
        transaction_id: Uuid,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_time,
            transaction_id,
            amount: template.amount,
            category: template.category.clone(),
            merchant: template.merchant.clone(),
            payment_method: template.payment_method.clone(),
        }
    }

    /// The template fields this entry was copied from.
    pub fn template(&self) -> TransactionTemplate {
        TransactionTemplate {
            amount: self.amount,
            category: self.category.clone(),
            merchant: self.merchant.clone(),
            payment_method: self.payment_method.clone(),
        }
    }

    /// Amount as applied to the integer category accumulator.
    ///
    /// Truncates toward zero; the aggregate is a coarse running total. Template
    /// amounts are never negative, so this is also the floor.
    pub fn truncated_amount(&self) -> i64 {
        truncate_amount(self.amount)
    }
}

/// Truncate a decimal amount to the accumulator's integer domain.
pub fn truncate_amount(amount: f64) -> i64 {
    amount.trunc() as i64
}

/// One row of the category aggregate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total_spent: i64,
}
