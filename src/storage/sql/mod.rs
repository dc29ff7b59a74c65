//! Unified SQL storage implementations.
//!
//! This module provides a shared `LedgerStore` implementation for SQL-based
//! storage backends (PostgreSQL, SQLite). The implementation is parameterized
//! by database type using the `SqlDatabase` trait.

mod ledger_store;
mod query;

pub use ledger_store::SqlLedgerStore;
pub use query::SqlDatabase;

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use sea_query::PostgresQueryBuilder;
    use sqlx::PgPool;

    use crate::storage::schema;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        const CREATE_STATEMENTS: &'static [&'static str] = &[
            schema::postgres::CREATE_LOG_TABLE,
            schema::CREATE_LOG_TIME_INDEX,
            schema::postgres::CREATE_ANALYTICS_TABLE,
        ];

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }
    }

    /// PostgreSQL ledger store.
    pub type PostgresLedgerStore = super::SqlLedgerStore<Postgres>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    use crate::storage::schema;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        const CREATE_STATEMENTS: &'static [&'static str] = &[
            schema::sqlite::CREATE_LOG_TABLE,
            schema::CREATE_LOG_TIME_INDEX,
            schema::sqlite::CREATE_ANALYTICS_TABLE,
        ];

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }
    }

    /// SQLite ledger store.
    pub type SqliteLedgerStore = super::SqlLedgerStore<Sqlite>;
}
