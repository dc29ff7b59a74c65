//! Synthetic transaction generator.
//!
//! Picks templates uniformly at random (with replacement) and stamps each
//! pick with the current time and a fresh v4 UUID.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::ledger::LogEntry;
use crate::templates::{TemplatePool, TransactionTemplate};

/// Produces log entries from a fixed template pool.
pub struct TransactionGenerator {
    pool: TemplatePool,
    rng: StdRng,
    last_time: Option<DateTime<Utc>>,
}

impl TransactionGenerator {
    /// Create a generator seeded from the operating system.
    pub fn new(pool: TemplatePool) -> Self {
        Self::with_rng(pool, StdRng::from_os_rng())
    }

    /// Create a generator with a fixed seed, for reproducible picks.
    pub fn with_seed(pool: TemplatePool, seed: u64) -> Self {
        Self::with_rng(pool, StdRng::seed_from_u64(seed))
    }

    fn with_rng(pool: TemplatePool, rng: StdRng) -> Self {
        Self {
            pool,
            rng,
            last_time: None,
        }
    }

    pub fn pool(&self) -> &TemplatePool {
        &self.pool
    }

    /// Pick one template uniformly at random.
    pub fn pick(&mut self) -> &TransactionTemplate {
        let index = self.rng.random_range(0..self.pool.len());
        &self.pool.as_slice()[index]
    }

    /// Synthesize the next log entry for `user_id`, stamped with the current time.
    pub fn next_entry(&mut self, user_id: &str) -> LogEntry {
        self.next_entry_at(user_id, Utc::now())
    }

    /// Synthesize the next log entry using `now` as the wall-clock reading.
    ///
    /// Stamped times are strictly increasing per generator: a reading at or
    /// before the previous stamp is bumped to one microsecond after it.
    pub fn next_entry_at(&mut self, user_id: &str, now: DateTime<Utc>) -> LogEntry {
        let transaction_time = self.stamp(now);
        let template = self.pick();
        LogEntry::from_template(user_id, template, transaction_time, Uuid::new_v4())
    }

    fn stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        // Storage keeps microseconds; drop anything finer so stamps survive a round trip.
        let now = now
            - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos() % 1_000));
        let stamped = match self.last_time {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_time = Some(stamped);
        stamped
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use chrono::TimeZone;

    use super::*;

    fn pool() -> TemplatePool {
        let csv = "amount,category,merchant,payment_method\n\
                   12.50,Food,Cafe,UPI\n\
                   9.00,Food,Deli,Card\n\
                   40.00,Travel,Rail,Wallet\n";
        TemplatePool::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_entries_copy_a_template_and_get_fresh_ids() {
        let mut generator = TransactionGenerator::with_seed(pool(), 7);
        let templates = pool();

        let mut ids = HashSet::new();
        for _ in 0..200 {
            let entry = generator.next_entry("User_1");
            assert_eq!(entry.user_id, "User_1");
            assert!(templates.contains(&entry.template()));
            assert!(ids.insert(entry.transaction_id));
        }
    }

    #[test]
    fn test_pick_is_with_replacement_and_covers_pool() {
        let mut generator = TransactionGenerator::with_seed(pool(), 42);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..300 {
            *counts.entry(generator.pick().merchant.clone()).or_default() += 1;
        }
        assert_eq!(counts.len(), 3);
        // Uniform over 3 templates: each should land well inside (50, 150).
        for (merchant, count) in counts {
            assert!(count > 50 && count < 150, "{merchant} picked {count} times");
        }
    }

    #[test]
    fn test_same_seed_same_picks() {
        let mut a = TransactionGenerator::with_seed(pool(), 9);
        let mut b = TransactionGenerator::with_seed(pool(), 9);
        for _ in 0..20 {
            assert_eq!(a.pick(), b.pick());
        }
    }

    #[test]
    fn test_stamps_strictly_increase_when_clock_stalls_or_steps_back() {
        let mut generator = TransactionGenerator::with_seed(pool(), 1);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        let first = generator.next_entry_at("User_1", t0);
        let same = generator.next_entry_at("User_1", t0);
        let back = generator.next_entry_at("User_1", t0 - Duration::seconds(5));
        let later = generator.next_entry_at("User_1", t0 + Duration::seconds(1));

        assert_eq!(first.transaction_time, t0);
        assert_eq!(same.transaction_time, t0 + Duration::microseconds(1));
        assert_eq!(back.transaction_time, t0 + Duration::microseconds(2));
        assert_eq!(later.transaction_time, t0 + Duration::seconds(1));
    }

    #[test]
    fn test_stamps_drop_sub_microsecond_precision() {
        let mut generator = TransactionGenerator::with_seed(pool(), 1);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::nanoseconds(1_500);
        let entry = generator.next_entry_at("User_1", t0);
        assert_eq!(entry.transaction_time.timestamp_subsec_nanos(), 1_000);
    }
}
