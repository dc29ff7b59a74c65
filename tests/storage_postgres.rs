//! PostgreSQL storage integration tests using testcontainers.
//!
//! Run with: cargo test --test storage_postgres --features postgres -- --nocapture
//!
//! Needs a container runtime. The ledger contract runs against a throwaway
//! PostgreSQL 16 server.

mod storage;

use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use paystream::storage::{LedgerStore, PostgresLedgerStore};
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

const PG_PORT: u16 = 5432;
const PG_CREDENTIAL: &str = "paystream";

/// A running server and a ledger store with its tables created.
///
/// The container stops when the returned handle is dropped.
async fn ledger_on_fresh_server() -> (ContainerAsync<GenericImage>, PostgresLedgerStore) {
    let container = GenericImage::new("postgres", "16")
        .with_exposed_port(PG_PORT.tcp())
        .with_wait_for(WaitFor::message_on_stdout(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_USER", PG_CREDENTIAL)
        .with_env_var("POSTGRES_PASSWORD", PG_CREDENTIAL)
        .with_env_var("POSTGRES_DB", PG_CREDENTIAL)
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .expect("postgres container should start");

    let uri = format!(
        "postgres://{user}:{user}@{host}:{port}/{user}",
        user = PG_CREDENTIAL,
        host = container.get_host().await.expect("container host"),
        port = container
            .get_host_port_ipv4(PG_PORT)
            .await
            .expect("mapped port"),
    );

    // The ready line is printed once by the bootstrap server too, so the
    // first few connects can still be refused.
    let pool = (|| sqlx::PgPool::connect(&uri))
        .retry(
            ConstantBuilder::default()
                .with_delay(Duration::from_millis(250))
                .with_max_times(40),
        )
        .await
        .expect("postgres should accept connections");

    let store = PostgresLedgerStore::new(pool);
    store.init().await.expect("ledger tables should be created");
    (container, store)
}

#[tokio::test]
async fn test_postgres_ledger_store() {
    println!("=== PostgreSQL LedgerStore Tests ===");

    let (_container, store) = ledger_on_fresh_server().await;
    run_ledger_store_tests!(&store);
    store.close().await;

    println!("=== All PostgreSQL LedgerStore tests PASSED ===");
}
