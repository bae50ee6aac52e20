//! Route metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for routing decisions and dispatch outcomes
#[derive(Debug, Default)]
pub struct RouteMetrics {
    /// Records routed to the stable target
    stable_routed: AtomicU64,
    /// Records routed to the canary target
    canary_routed: AtomicU64,
    /// Dispatch requests accepted downstream
    accepted: AtomicU64,
    /// Acceptance calls that failed
    failed: AtomicU64,
    /// Records given up before dispatch
    cancelled: AtomicU64,
}

impl RouteMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get stable-routed count
    pub fn stable_routed(&self) -> u64 {
        self.stable_routed.load(Ordering::Relaxed)
    }

    /// Increment stable-routed count
    pub fn inc_stable_routed(&self) {
        self.stable_routed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get canary-routed count
    pub fn canary_routed(&self) -> u64 {
        self.canary_routed.load(Ordering::Relaxed)
    }

    /// Increment canary-routed count
    pub fn inc_canary_routed(&self) {
        self.canary_routed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get accepted count
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Increment accepted count
    pub fn inc_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failed count
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Increment failed count
    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get cancelled count
    pub fn cancelled(&self) -> u64 {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Increment cancelled count
    pub fn inc_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            stable_routed: self.stable_routed(),
            canary_routed: self.canary_routed(),
            accepted: self.accepted(),
            failed: self.failed(),
            cancelled: self.cancelled(),
        }
    }
}

/// Snapshot of route metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub stable_routed: u64,
    pub canary_routed: u64,
    pub accepted: u64,
    pub failed: u64,
    pub cancelled: u64,
}

impl MetricsSnapshot {
    /// Fraction of routed records that went to the canary, in `[0, 1]`
    pub fn canary_fraction(&self) -> f64 {
        let total = self.stable_routed + self.canary_routed;
        if total > 0 {
            self.canary_routed as f64 / total as f64
        } else {
            0.0
        }
    }
}
