//! Plain-text rendering of a dashboard frame.

use std::fmt::Write;

use chrono::Local;

use super::DashboardView;

const BAR_WIDTH: usize = 30;

/// Render the full frame. `view` is the last successful snapshot, if any;
/// `error` is the most recent tick failure, shown above it.
pub fn render_frame(
    backend: &str,
    user_id: &str,
    view: Option<&DashboardView>,
    error: Option<&str>,
) -> String {
    let mut out = String::new();
    let status = if error.is_some() { "DEGRADED" } else { "ONLINE" };

    let _ = writeln!(out, "=== Live Payment Monitor ===");
    let _ = writeln!(
        out,
        "Status: {}   Database: {}   User: {}",
        status, backend, user_id
    );
    if let Some(error) = error {
        let _ = writeln!(out, "! Refresh failed: {}", error);
    }
    let _ = writeln!(out);

    match view {
        Some(view) if !view.is_empty() => render_view(&mut out, view),
        Some(view) => {
            let _ = writeln!(out, "No transactions yet. Waiting for data...");
            if !view.categories.is_empty() {
                let _ = writeln!(out);
                render_categories(&mut out, view);
            }
        }
        None => {
            let _ = writeln!(out, "No data.");
        }
    }

    out
}

fn render_view(out: &mut String, view: &DashboardView) {
    let _ = writeln!(
        out,
        "Window: {} txns   Total: ${:.2}   Avg: ${:.2}   New since start: {}",
        view.window.count,
        view.window.total,
        view.window.average.unwrap_or(0.0),
        view.new_transactions
    );
    let _ = writeln!(out);

    render_categories(out, view);
    let _ = writeln!(out);

    let _ = writeln!(out, "-- Live Transaction Feed --");
    let _ = writeln!(
        out,
        "{:<8}  {:<20}  {:<14}  {:>9}  {:<10}",
        "Time", "Merchant", "Category", "Amount", "Payment"
    );
    for entry in &view.recent {
        let _ = writeln!(
            out,
            "{:<8}  {:<20}  {:<14}  {:>9.2}  {:<10}",
            entry
                .transaction_time
                .with_timezone(&Local)
                .format("%H:%M:%S"),
            truncate(&entry.merchant, 20),
            truncate(&entry.category, 14),
            entry.amount,
            entry.payment_method
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "-- Payment Mix --");
    for method in &view.payment_mix {
        let _ = writeln!(out, "{:<12} {:>4}", method.payment_method, method.count);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "-- Top Merchants --");
    for (rank, merchant) in view.top_merchants.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<20} ${:>9.2}  ({} txns)",
            rank + 1,
            truncate(&merchant.merchant, 20),
            merchant.total,
            merchant.count
        );
    }
}

fn render_categories(out: &mut String, view: &DashboardView) {
    let _ = writeln!(out, "-- Spending by Category --");
    let max = view
        .categories
        .iter()
        .map(|c| c.total_spent)
        .max()
        .unwrap_or(0);
    for category in &view.categories {
        let _ = writeln!(
            out,
            "{:<14} {:<width$} {:>8} ({:>5.1}%)",
            truncate(&category.category, 14),
            bar(category.total_spent, max),
            category.total_spent,
            category.share * 100.0,
            width = BAR_WIDTH
        );
    }
}

/// Horizontal bar scaled so `max` fills `BAR_WIDTH`.
pub fn bar(value: i64, max: i64) -> String {
    if max <= 0 || value <= 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.clamp(1, BAR_WIDTH))
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
