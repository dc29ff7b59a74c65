//! Mock storage contract tests.
//!
//! Keeps the in-memory mock honest against the same contract as real backends.

mod storage;

use paystream::storage::MockLedgerStore;

#[tokio::test]
async fn test_mock_ledger_store() {
    println!("=== Mock LedgerStore Tests ===");

    let store = MockLedgerStore::new();
    run_ledger_store_tests!(&store);

    println!("=== All Mock LedgerStore tests PASSED ===");
}
