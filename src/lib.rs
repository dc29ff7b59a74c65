//! Paystream - synthetic payment stream demo
//!
//! Replays a fixed pool of transaction templates into a log/counter store at a
//! steady cadence, and polls that store to render a live spend dashboard.
//!
//! ## Data flow
//! ```text
//! [templates.csv] -> [ingest] --append--> [transactions_by_user]
//!                            \--increment--> [spending_analytics]
//!                                                  |
//!                                   [dashboard] <--+ (poll every tick)
//! ```

pub mod config;
pub mod dashboard;
pub mod ingest;
pub mod ledger;
pub mod storage;
pub mod templates;
pub mod utils;
