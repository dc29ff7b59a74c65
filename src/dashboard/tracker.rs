//! Session-local "new transactions since the dashboard started" counter.

use uuid::Uuid;

/// Counts ticks whose most recent transaction differs from the previous tick's.
///
/// The first observation of a session only establishes a baseline. After
/// that, each changed observation adds exactly one, however many writes
/// happened between the two ticks. An empty log never counts.
///
/// Each [`Dashboard`](super::Dashboard) owns one tracker for the lifetime of
/// its store connection; connecting again means a new `Dashboard` and so a
/// new baseline.
#[derive(Debug, Default, Clone)]
pub struct NewTransactionTracker {
    last_seen: Option<Uuid>,
    primed: bool,
    count: u64,
}

impl NewTransactionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the most recent transaction id seen on a tick.
    ///
    /// Returns true when the counter advanced.
    pub fn observe(&mut self, latest: Option<Uuid>) -> bool {
        if !self.primed {
            self.primed = true;
            self.last_seen = latest;
            return false;
        }

        match latest {
            Some(id) if self.last_seen != Some(id) => {
                self.last_seen = Some(id);
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

}
