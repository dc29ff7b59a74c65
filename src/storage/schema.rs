//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Append-only log table, partitioned by user and clustered by time.
#[derive(Iden)]
pub enum TransactionsByUser {
    Table,
    #[iden = "user_id"]
    UserId,
    #[iden = "transaction_time"]
    TransactionTime,
    #[iden = "transaction_id"]
    TransactionId,
    #[iden = "amount"]
    Amount,
    #[iden = "category"]
    Category,
    #[iden = "merchant"]
    Merchant,
    #[iden = "payment_method"]
    PaymentMethod,
}

/// Increment-only counter table, one row per category.
#[derive(Iden)]
pub enum SpendingAnalytics {
    Table,
    #[iden = "category"]
    Category,
    #[iden = "total_spent"]
    TotalSpent,
}

/// SQL for dropping both tables.
pub const DROP_TABLES: [&str; 2] = [
    "DROP TABLE IF EXISTS transactions_by_user",
    "DROP TABLE IF EXISTS spending_analytics",
];

/// SQL for creating the log table's descending time index (both backends).
pub const CREATE_LOG_TIME_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_transactions_by_user_time
    ON transactions_by_user (user_id, transaction_time DESC)
"#;

/// SQLite DDL.
pub mod sqlite {
    /// SQL for creating the log table.
    pub const CREATE_LOG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions_by_user (
    user_id TEXT NOT NULL,
    transaction_time TEXT NOT NULL,
    transaction_id TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT NOT NULL,
    merchant TEXT NOT NULL,
    payment_method TEXT NOT NULL,
    PRIMARY KEY (user_id, transaction_time, transaction_id)
)
"#;

    /// SQL for creating the counter table.
    pub const CREATE_ANALYTICS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS spending_analytics (
    category TEXT NOT NULL PRIMARY KEY,
    total_spent INTEGER NOT NULL DEFAULT 0
)
"#;
}

/// PostgreSQL DDL.
pub mod postgres {
    /// SQL for creating the log table.
    pub const CREATE_LOG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions_by_user (
    user_id TEXT NOT NULL,
    transaction_time TEXT NOT NULL,
    transaction_id TEXT NOT NULL,
    amount DOUBLE PRECISION NOT NULL,
    category TEXT NOT NULL,
    merchant TEXT NOT NULL,
    payment_method TEXT NOT NULL,
    PRIMARY KEY (user_id, transaction_time, transaction_id)
)
"#;

    /// SQL for creating the counter table.
    pub const CREATE_ANALYTICS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS spending_analytics (
    category TEXT NOT NULL PRIMARY KEY,
    total_spent BIGINT NOT NULL DEFAULT 0
)
"#;
}
