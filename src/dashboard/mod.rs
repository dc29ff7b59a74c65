//! Dashboard/reader: polls the store on a fixed timer and renders a snapshot.
//!
//! Each tick issues two sequential queries, "recent log entries for the demo
//! user" and "all category totals", and derives every displayed metric from
//! those rows alone. The only state kept between ticks is the session's
//! new-transaction counter and the last successful view.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ledger::LogEntry;
use crate::storage::{LedgerStore, Result};

pub mod metrics;
pub mod render;
mod tracker;

pub use metrics::{CategoryShare, MerchantSpend, PaymentMethodCount, WindowStats};
pub use tracker::NewTransactionTracker;

/// Dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Partition key whose log is displayed.
    pub user_id: String,
    /// Pause between ticks, in milliseconds.
    pub refresh_ms: u64,
    /// How many recent log entries each tick fetches.
    pub feed_limit: usize,
    /// How many merchants the ranking shows.
    pub top_merchants: usize,
    /// Clear the terminal before drawing each frame.
    pub clear_screen: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            user_id: "User_1".to_string(),
            refresh_ms: 1000,
            feed_limit: 10,
            top_merchants: 10,
            clear_screen: true,
        }
    }
}

/// Everything one successful tick displays.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub observed_at: DateTime<Utc>,
    /// Newest first.
    pub recent: Vec<LogEntry>,
    pub window: WindowStats,
    pub payment_mix: Vec<PaymentMethodCount>,
    pub top_merchants: Vec<MerchantSpend>,
    /// Largest first.
    pub categories: Vec<CategoryShare>,
    pub new_transactions: u64,
}

impl DashboardView {
    /// True when the log window is empty.
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}

/// Counters for a finished polling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub ticks: u64,
    pub failed_ticks: u64,
}

/// One dashboard session against a store.
pub struct Dashboard {
    store: Arc<dyn LedgerStore>,
    config: DashboardConfig,
    backend: String,
    tracker: NewTransactionTracker,
    last_view: Option<DashboardView>,
    last_error: Option<String>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn LedgerStore>, config: DashboardConfig) -> Self {
        Self {
            store,
            config,
            backend: "store".to_string(),
            tracker: NewTransactionTracker::new(),
            last_view: None,
            last_error: None,
        }
    }

    /// Name of the storage backend shown in the header.
    pub fn with_backend_label(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn last_view(&self) -> Option<&DashboardView> {
        self.last_view.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn new_transactions(&self) -> u64 {
        self.tracker.count()
    }

    /// Query the store once and rebuild the view.
    ///
    /// On failure the previous view is kept and the error is recorded for
    /// display.
    pub async fn tick(&mut self) -> Result<&DashboardView> {
        match self.fetch().await {
            Ok(view) => {
                self.last_error = None;
                let view: &DashboardView = self.last_view.insert(view);
                Ok(view)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn refresh(&mut self) -> Result<()> {
        self.tick().await.map(|_| ())
    }

    async fn fetch(&mut self) -> Result<DashboardView> {
        let recent = self
            .store
            .recent(&self.config.user_id, self.config.feed_limit)
            .await?;
        let totals = self.store.totals().await?;

        self.tracker
            .observe(recent.first().map(|e| e.transaction_id));

        debug!(
            entries = recent.len(),
            categories = totals.len(),
            "Dashboard snapshot"
        );

        Ok(DashboardView {
            observed_at: Utc::now(),
            window: metrics::window_stats(&recent),
            payment_mix: metrics::payment_mix(&recent),
            top_merchants: metrics::top_merchants(&recent, self.config.top_merchants),
            categories: metrics::rank_categories(&totals),
            new_transactions: self.tracker.count(),
            recent,
        })
    }

    /// The frame for the current state: last good view plus any pending error.
    pub fn frame(&self) -> String {
        render::render_frame(
            &self.backend,
            &self.config.user_id,
            self.last_view.as_ref(),
            self.last_error.as_deref(),
        )
    }

    /// Tick, draw, sleep; until `shutdown` resolves.
    ///
    /// Query failures never end the loop. Only a failure to write the frame
    /// to `out` does.
    pub async fn run<F, W>(&mut self, shutdown: F, out: &mut W) -> std::io::Result<PollSummary>
    where
        F: Future<Output = ()>,
        W: Write,
    {
        tokio::pin!(shutdown);
        let refresh = Duration::from_millis(self.config.refresh_ms);
        let mut summary = PollSummary::default();

        loop {
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                outcome = self.refresh() => outcome,
            };

            summary.ticks += 1;
            if let Err(e) = outcome {
                summary.failed_ticks += 1;
                warn!(error = %e, "Dashboard refresh failed");
            }

            if self.config.clear_screen {
                write!(out, "\x1b[2J\x1b[H")?;
            }
            out.write_all(self.frame().as_bytes())?;
            out.flush()?;

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(refresh) => {}
            }
        }

        Ok(summary)
    }
}
