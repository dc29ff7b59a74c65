//! LedgerStore interface tests.
//!
//! These tests verify the contract of the LedgerStore trait.
//! Each storage implementation should run these tests.
//!
//! Tests share one store, so each uses its own user id and category names.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use paystream::ledger::LogEntry;
use paystream::storage::LedgerStore;
use uuid::Uuid;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn test_entry(user_id: &str, offset_micros: i64, category: &str, amount: f64) -> LogEntry {
    LogEntry {
        user_id: user_id.to_string(),
        transaction_time: base_time() + Duration::microseconds(offset_micros),
        transaction_id: Uuid::new_v4(),
        amount,
        category: category.to_string(),
        merchant: "Test Merchant".to_string(),
        payment_method: "UPI".to_string(),
    }
}

async fn totals_with_prefix<S: LedgerStore>(store: &S, prefix: &str) -> HashMap<String, i64> {
    store
        .totals()
        .await
        .expect("totals should succeed")
        .into_iter()
        .filter(|t| t.category.starts_with(prefix))
        .map(|t| (t.category, t.total_spent))
        .collect()
}

// =============================================================================
// LedgerStore::recent tests
// =============================================================================

pub async fn test_recent_empty_partition<S: LedgerStore>(store: &S) {
    let recent = store
        .recent("test_nobody", 10)
        .await
        .expect("recent should succeed");
    assert!(recent.is_empty(), "unknown user should have no entries");
}

pub async fn test_append_roundtrip<S: LedgerStore>(store: &S) {
    let mut entry = test_entry("test_roundtrip", 123_456, "test_rt_Food", 12.5);
    entry.merchant = "Kid's Corner".to_string();
    entry.payment_method = "Card".to_string();

    store.append(&entry).await.expect("append should succeed");

    let recent = store.recent("test_roundtrip", 10).await.unwrap();
    assert_eq!(recent, vec![entry], "stored entry should read back unchanged");
}

pub async fn test_recent_newest_first<S: LedgerStore>(store: &S) {
    let user = "test_order";
    let written: Vec<LogEntry> = (0..5)
        .map(|i| test_entry(user, i * 1_000_000, "test_order_Food", 1.0))
        .collect();
    // Write out of time order; clustering must still sort on read.
    for i in [2, 0, 4, 1, 3] {
        store.append(&written[i]).await.unwrap();
    }

    let recent = store.recent(user, 10).await.unwrap();
    let ids: Vec<Uuid> = recent.iter().map(|e| e.transaction_id).collect();
    let expected: Vec<Uuid> = written.iter().rev().map(|e| e.transaction_id).collect();
    assert_eq!(ids, expected, "entries should be newest first");
}

pub async fn test_recent_sub_second_order<S: LedgerStore>(store: &S) {
    let user = "test_micros";
    let older = test_entry(user, 1, "test_micros_Food", 1.0);
    let newer = test_entry(user, 2, "test_micros_Food", 1.0);
    store.append(&older).await.unwrap();
    store.append(&newer).await.unwrap();

    let recent = store.recent(user, 2).await.unwrap();
    assert_eq!(recent[0].transaction_id, newer.transaction_id);
    assert_eq!(recent[1].transaction_id, older.transaction_id);
}

pub async fn test_recent_limit<S: LedgerStore>(store: &S) {
    let user = "test_limit";
    for i in 0..15 {
        store
            .append(&test_entry(user, i, "test_limit_Food", 1.0))
            .await
            .unwrap();
    }

    let recent = store.recent(user, 10).await.unwrap();
    assert_eq!(recent.len(), 10, "limit should bound the result");
    assert_eq!(recent[0].transaction_time, base_time() + Duration::microseconds(14));

    let none = store.recent(user, 0).await.unwrap();
    assert!(none.is_empty(), "zero limit should return nothing");
}

pub async fn test_recent_partition_isolation<S: LedgerStore>(store: &S) {
    store
        .append(&test_entry("test_iso_a", 1, "test_iso_Food", 1.0))
        .await
        .unwrap();
    store
        .append(&test_entry("test_iso_b", 2, "test_iso_Food", 1.0))
        .await
        .unwrap();

    let a = store.recent("test_iso_a", 10).await.unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].user_id, "test_iso_a");
}

// =============================================================================
// LedgerStore::increment / totals tests
// =============================================================================

pub async fn test_increment_creates_row<S: LedgerStore>(store: &S) {
    store
        .increment("test_inc_new", 7)
        .await
        .expect("increment should succeed");

    let totals = totals_with_prefix(store, "test_inc_new").await;
    assert_eq!(totals.get("test_inc_new"), Some(&7));
}

pub async fn test_increment_accumulates<S: LedgerStore>(store: &S) {
    let category = "test_acc_Food";
    let mut expected = 0;
    for amount in [12, 9, 0, 40] {
        store.increment(category, amount).await.unwrap();
        expected += amount;
        let totals = totals_with_prefix(store, category).await;
        assert_eq!(totals[category], expected, "counter should never lose increments");
    }
}

pub async fn test_totals_one_row_per_category<S: LedgerStore>(store: &S) {
    store.increment("test_rows_Food", 12).await.unwrap();
    store.increment("test_rows_Travel", 40).await.unwrap();
    store.increment("test_rows_Food", 9).await.unwrap();

    let totals = totals_with_prefix(store, "test_rows_").await;
    assert_eq!(totals.len(), 2);
    assert_eq!(totals["test_rows_Food"], 21);
    assert_eq!(totals["test_rows_Travel"], 40);
}

// =============================================================================
// Schema lifecycle tests (destructive, run last)
// =============================================================================

pub async fn test_init_is_idempotent<S: LedgerStore>(store: &S) {
    store
        .append(&test_entry("test_init", 1, "test_init_Food", 1.0))
        .await
        .unwrap();
    store.init().await.expect("second init should succeed");
    assert_eq!(store.recent("test_init", 10).await.unwrap().len(), 1);
}

pub async fn test_reset_clears_both_tables<S: LedgerStore>(store: &S) {
    store
        .append(&test_entry("test_reset", 1, "test_reset_Food", 1.0))
        .await
        .unwrap();
    store.increment("test_reset_Food", 1).await.unwrap();

    store.reset().await.expect("reset should succeed");

    assert!(store.recent("test_reset", 10).await.unwrap().is_empty());
    assert!(store.totals().await.unwrap().is_empty());

    store.increment("test_reset_Food", 3).await.unwrap();
    assert_eq!(totals_with_prefix(store, "test_reset_").await["test_reset_Food"], 3);
}

/// Run all LedgerStore contract tests against a store.
#[macro_export]
macro_rules! run_ledger_store_tests {
    ($store:expr) => {
        use $crate::storage::ledger_store_tests::*;

        // recent tests
        test_recent_empty_partition($store).await;
        println!("  test_recent_empty_partition: PASSED");

        test_append_roundtrip($store).await;
        println!("  test_append_roundtrip: PASSED");

        test_recent_newest_first($store).await;
        println!("  test_recent_newest_first: PASSED");

        test_recent_sub_second_order($store).await;
        println!("  test_recent_sub_second_order: PASSED");

        test_recent_limit($store).await;
        println!("  test_recent_limit: PASSED");

        test_recent_partition_isolation($store).await;
        println!("  test_recent_partition_isolation: PASSED");

        // counter tests
        test_increment_creates_row($store).await;
        println!("  test_increment_creates_row: PASSED");

        test_increment_accumulates($store).await;
        println!("  test_increment_accumulates: PASSED");

        test_totals_one_row_per_category($store).await;
        println!("  test_totals_one_row_per_category: PASSED");

        // schema lifecycle
        test_init_is_idempotent($store).await;
        println!("  test_init_is_idempotent: PASSED");

        test_reset_clears_both_tables($store).await;
        println!("  test_reset_clears_both_tables: PASSED");
    };
}
