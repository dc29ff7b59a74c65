//! Unified SQL LedgerStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend,
//! eliminating code duplication while maintaining type safety.

use std::marker::PhantomData;

use sea_query::{Expr, OnConflict, Order, Query};

use super::SqlDatabase;
use crate::ledger::{CategoryTotal, LogEntry};
use crate::storage::helpers::format_timestamp;
use crate::storage::schema::{SpendingAnalytics, TransactionsByUser};

/// SQL-based implementation of LedgerStore.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite).
pub struct SqlLedgerStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlLedgerStore<DB> {
    /// Create a new SQL ledger store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }

    fn insert_entry_sql(entry: &LogEntry) -> String {
        let stmt = Query::insert()
            .into_table(TransactionsByUser::Table)
            .columns([
                TransactionsByUser::UserId,
                TransactionsByUser::TransactionTime,
                TransactionsByUser::TransactionId,
                TransactionsByUser::Amount,
                TransactionsByUser::Category,
                TransactionsByUser::Merchant,
                TransactionsByUser::PaymentMethod,
            ])
            .values_panic([
                entry.user_id.as_str().into(),
                format_timestamp(&entry.transaction_time).into(),
                entry.transaction_id.to_string().into(),
                entry.amount.into(),
                entry.category.as_str().into(),
                entry.merchant.as_str().into(),
                entry.payment_method.as_str().into(),
            ])
            .to_owned();
        DB::build_insert(stmt)
    }

    fn increment_sql(category: &str, amount: i64) -> String {
        let stmt = Query::insert()
            .into_table(SpendingAnalytics::Table)
            .columns([SpendingAnalytics::Category, SpendingAnalytics::TotalSpent])
            .values_panic([category.into(), amount.into()])
            .on_conflict(
                OnConflict::column(SpendingAnalytics::Category)
                    .value(
                        SpendingAnalytics::TotalSpent,
                        Expr::col((SpendingAnalytics::Table, SpendingAnalytics::TotalSpent))
                            .add(amount),
                    )
                    .to_owned(),
            )
            .to_owned();
        DB::build_insert(stmt)
    }

    fn recent_sql(user_id: &str, limit: usize) -> String {
        let stmt = Query::select()
            .columns([
                TransactionsByUser::UserId,
                TransactionsByUser::TransactionTime,
                TransactionsByUser::TransactionId,
                TransactionsByUser::Amount,
                TransactionsByUser::Category,
                TransactionsByUser::Merchant,
                TransactionsByUser::PaymentMethod,
            ])
            .from(TransactionsByUser::Table)
            .and_where(Expr::col(TransactionsByUser::UserId).eq(user_id))
            .order_by(TransactionsByUser::TransactionTime, Order::Desc)
            .limit(limit as u64)
            .to_owned();
        DB::build_select(stmt)
    }

    fn totals_sql() -> String {
        let stmt = Query::select()
            .columns([SpendingAnalytics::Category, SpendingAnalytics::TotalSpent])
            .from(SpendingAnalytics::Table)
            .to_owned();
        DB::build_select(stmt)
    }
}

/// Macro to implement LedgerStore for a specific SQL backend.
///
/// This eliminates duplication between PostgreSQL and SQLite implementations
/// while maintaining full type safety.
macro_rules! impl_ledger_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::LedgerStore for SqlLedgerStore<$db_type> {
            async fn init(&self) -> crate::storage::Result<()> {
                for statement in <$db_type as SqlDatabase>::CREATE_STATEMENTS {
                    sqlx::query(statement).execute(&self.pool).await?;
                }
                Ok(())
            }

            async fn reset(&self) -> crate::storage::Result<()> {
                for statement in crate::storage::schema::DROP_TABLES {
                    sqlx::query(statement).execute(&self.pool).await?;
                }
                tracing::info!("Ledger tables dropped");
                crate::storage::LedgerStore::init(self).await
            }

            async fn append(&self, entry: &LogEntry) -> crate::storage::Result<()> {
                let sql = Self::insert_entry_sql(entry);
                sqlx::query(&sql).execute(&self.pool).await?;
                Ok(())
            }

            async fn increment(&self, category: &str, amount: i64) -> crate::storage::Result<()> {
                let sql = Self::increment_sql(category, amount);
                sqlx::query(&sql).execute(&self.pool).await?;
                Ok(())
            }

            async fn recent(
                &self,
                user_id: &str,
                limit: usize,
            ) -> crate::storage::Result<Vec<LogEntry>> {
                use sqlx::Row;

                if limit == 0 {
                    return Ok(Vec::new());
                }

                let sql = Self::recent_sql(user_id, limit);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut entries = Vec::with_capacity(rows.len());
                for row in rows {
                    let time: String = row.try_get("transaction_time")?;
                    let id: String = row.try_get("transaction_id")?;
                    entries.push(LogEntry {
                        user_id: row.try_get("user_id")?,
                        transaction_time: crate::storage::helpers::parse_timestamp(&time)?,
                        transaction_id: uuid::Uuid::parse_str(&id)?,
                        amount: row.try_get("amount")?,
                        category: row.try_get("category")?,
                        merchant: row.try_get("merchant")?,
                        payment_method: row.try_get("payment_method")?,
                    });
                }

                Ok(entries)
            }

            async fn totals(&self) -> crate::storage::Result<Vec<CategoryTotal>> {
                use sqlx::Row;

                let sql = Self::totals_sql();
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut totals = Vec::with_capacity(rows.len());
                for row in rows {
                    totals.push(CategoryTotal {
                        category: row.try_get("category")?,
                        total_spent: row.try_get("total_spent")?,
                    });
                }

                Ok(totals)
            }

            async fn close(&self) {
                self.pool.close().await;
            }
        }
    };
}

#[cfg(feature = "postgres")]
impl_ledger_store!(super::postgres::Postgres, "postgres");

#[cfg(feature = "sqlite")]
impl_ledger_store!(super::sqlite::Sqlite, "sqlite");
