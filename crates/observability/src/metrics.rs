//! Routing and dispatch metrics
//!
//! Records per-record decisions and outcomes to the `metrics` registry and
//! aggregates them for end-of-run summaries.

use contracts::{DispatchOutcome, OutcomeStatus, Route};
use metrics::{counter, gauge, histogram};

/// Record one routing decision
pub fn record_route_decision(route: Route) {
    counter!(
        "canary_splitter_records_routed_total",
        "route" => route.to_string()
    )
    .increment(1);
}

/// Record one dispatch outcome
///
/// Call for every outcome returned by `route`.
pub fn record_dispatch_outcome(outcome: &DispatchOutcome) {
    let status = match outcome.status {
        OutcomeStatus::Accepted(_) => "accepted",
        OutcomeStatus::Failed { .. } => "failed",
        OutcomeStatus::Cancelled => "cancelled",
    };

    counter!(
        "canary_splitter_dispatch_total",
        "route" => outcome.route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a completed batch
pub fn record_batch_routed(batch_size: usize, duration_ms: f64) {
    counter!("canary_splitter_batches_total").increment(1);
    gauge!("canary_splitter_last_batch_size").set(batch_size as f64);
    histogram!("canary_splitter_batch_duration_ms").record(duration_ms);
}

/// In-process aggregation of dispatch outcomes (for run summaries)
#[derive(Debug, Clone, Default)]
pub struct RouteStatsAggregator {
    stable: u64,
    canary: u64,
    accepted: u64,
    failed: u64,
    cancelled: u64,
}

impl RouteStatsAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome into the aggregate
    pub fn observe(&mut self, outcome: &DispatchOutcome) {
        match outcome.route {
            Route::Stable => self.stable += 1,
            Route::Canary => self.canary += 1,
        }
        match outcome.status {
            OutcomeStatus::Accepted(_) => self.accepted += 1,
            OutcomeStatus::Failed { .. } => self.failed += 1,
            OutcomeStatus::Cancelled => self.cancelled += 1,
        }
    }

    /// Produce the current summary
    pub fn summary(&self) -> RouteStatsSummary {
        let total = self.stable + self.canary;
        RouteStatsSummary {
            total,
            stable: self.stable,
            canary: self.canary,
            accepted: self.accepted,
            failed: self.failed,
            cancelled: self.cancelled,
            canary_fraction: if total > 0 {
                self.canary as f64 / total as f64
            } else {
                0.0
            },
            failure_rate: if total > 0 {
                self.failed as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

/// Aggregated outcome statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteStatsSummary {
    pub total: u64,
    pub stable: u64,
    pub canary: u64,
    pub accepted: u64,
    pub failed: u64,
    pub cancelled: u64,
    /// Observed canary share of routed records, in [0, 1]
    pub canary_fraction: f64,
    /// Failed share of routed records, in [0, 1]
    pub failure_rate: f64,
}
