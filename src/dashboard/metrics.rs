//! Presentation metrics derived from one dashboard snapshot.
//!
//! Everything here is a pure function of the rows returned by a single tick.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::ledger::{CategoryTotal, LogEntry};

/// Count, sum and mean of `amount` over the returned log window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub count: usize,
    pub total: f64,
    /// `None` when the window is empty.
    pub average: Option<f64>,
}

/// Number of window entries paid with one payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodCount {
    pub payment_method: String,
    pub count: usize,
}

/// Spend at one merchant within the window.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantSpend {
    pub merchant: String,
    pub total: f64,
    pub count: usize,
}

/// A category total with its fraction of the grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total_spent: i64,
    /// In `[0, 1]`; zero when the grand total is zero.
    pub share: f64,
}

pub fn window_stats(entries: &[LogEntry]) -> WindowStats {
    let count = entries.len();
    let total: f64 = entries.iter().map(|e| e.amount).sum();
    let average = (count > 0).then(|| total / count as f64);
    WindowStats {
        count,
        total,
        average,
    }
}

/// Group the window by payment method; most used first, ties by name.
pub fn payment_mix(entries: &[LogEntry]) -> Vec<PaymentMethodCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.payment_method.as_str()).or_default() += 1;
    }

    let mut mix: Vec<PaymentMethodCount> = counts
        .into_iter()
        .map(|(payment_method, count)| PaymentMethodCount {
            payment_method: payment_method.to_string(),
            count,
        })
        .collect();
    mix.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.payment_method.cmp(&b.payment_method))
    });
    mix
}

/// Group the window by merchant and keep the `limit` biggest spenders.
///
/// Ordered by summed amount, then transaction count, then name.
pub fn top_merchants(entries: &[LogEntry], limit: usize) -> Vec<MerchantSpend> {
    let mut by_merchant: HashMap<&str, (f64, usize)> = HashMap::new();
    for entry in entries {
        let slot = by_merchant.entry(entry.merchant.as_str()).or_default();
        slot.0 += entry.amount;
        slot.1 += 1;
    }

    let mut ranked: Vec<MerchantSpend> = by_merchant
        .into_iter()
        .map(|(merchant, (total, count))| MerchantSpend {
            merchant: merchant.to_string(),
            total,
            count,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    ranked.truncate(limit);
    ranked
}

/// Order category totals locally (largest first, ties by name) and compute shares.
pub fn rank_categories(totals: &[CategoryTotal]) -> Vec<CategoryShare> {
    let grand_total: i64 = totals.iter().map(|t| t.total_spent).sum();

    let mut ranked: Vec<CategoryShare> = totals
        .iter()
        .map(|t| CategoryShare {
            category: t.category.clone(),
            total_spent: t.total_spent,
            share: if grand_total > 0 {
                t.total_spent as f64 / grand_total as f64
            } else {
                0.0
            },
        })
        .collect();
    ranked.sort_by(|a, b| match b.total_spent.cmp(&a.total_spent) {
        Ordering::Equal => a.category.cmp(&b.category),
        other => other,
    });
    ranked
}
