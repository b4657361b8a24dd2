//! Lock-free operation counters and periodic reporting
//!
//! NOTE: All atomics use Relaxed ordering intentionally. These are statistical
//! counters only. Do NOT use them for coordination or logic decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Lock-free metrics collector for entry/exit operations
pub struct Metrics {
    /// Vehicles parked (monotonic)
    entries_total: AtomicU64,
    /// Entries refused because the vehicle already had an open ticket
    rejected_entries_total: AtomicU64,
    /// Vehicles that left with a closed ticket (monotonic)
    exits_total: AtomicU64,
    /// Exits billed with the recurring discount
    recurring_exits_total: AtomicU64,
    /// Operations that ended in an error
    failures_total: AtomicU64,
    /// Sum of fares charged, in cents
    revenue_cents: AtomicU64,
    started_at: Instant,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSummary {
    pub entries_total: u64,
    pub rejected_entries_total: u64,
    pub exits_total: u64,
    pub recurring_exits_total: u64,
    pub failures_total: u64,
    pub revenue: f64,
    pub uptime_secs: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            entries = %self.entries_total,
            rejected_entries = %self.rejected_entries_total,
            exits = %self.exits_total,
            recurring_exits = %self.recurring_exits_total,
            failures = %self.failures_total,
            revenue = %format!("{:.2}", self.revenue),
            uptime_secs = %self.uptime_secs,
            "metrics_summary"
        );
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            entries_total: AtomicU64::new(0),
            rejected_entries_total: AtomicU64::new(0),
            exits_total: AtomicU64::new(0),
            recurring_exits_total: AtomicU64::new(0),
            failures_total: AtomicU64::new(0),
            revenue_cents: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    #[inline]
    pub fn record_entry(&self) {
        self.entries_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected_entry(&self) {
        self.rejected_entries_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed ticket and the fare charged for it
    pub fn record_exit(&self, price: f64, recurring: bool) {
        self.exits_total.fetch_add(1, Ordering::Relaxed);
        if recurring {
            self.recurring_exits_total.fetch_add(1, Ordering::Relaxed);
        }
        let cents = (price.max(0.0) * 100.0).round() as u64;
        self.revenue_cents.fetch_add(cents, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self) {
        self.failures_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters (monotonic, nothing is reset)
    pub fn report(&self) -> MetricsSummary {
        MetricsSummary {
            entries_total: self.entries_total.load(Ordering::Relaxed),
            rejected_entries_total: self.rejected_entries_total.load(Ordering::Relaxed),
            exits_total: self.exits_total.load(Ordering::Relaxed),
            recurring_exits_total: self.recurring_exits_total.load(Ordering::Relaxed),
            failures_total: self.failures_total.load(Ordering::Relaxed),
            revenue: self.revenue_cents.load(Ordering::Relaxed) as f64 / 100.0,
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
