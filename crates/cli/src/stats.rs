//! Run statistics reporting.

use std::time::Duration;

use observability::RouteStatsSummary;

/// Statistics from one routed batch
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Number of records in the batch
    pub batch_size: usize,

    /// Wall-clock duration of the route call
    pub duration: Duration,

    /// Aggregated outcome statistics
    pub summary: RouteStatsSummary,
}

impl RunStats {
    /// Records per second throughput
    pub fn records_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.batch_size as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        let s = &self.summary;

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Routing Statistics                      ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Records: {}", self.batch_size);
        println!("   ├─ Duration: {:.3}s", self.duration.as_secs_f64());
        println!("   └─ Throughput: {:.1} records/s", self.records_per_sec());

        println!("\n🔀 Split");
        println!("   ├─ Stable: {}", s.stable);
        println!("   ├─ Canary: {}", s.canary);
        println!(
            "   └─ Observed canary share: {:.2}%",
            s.canary_fraction * 100.0
        );

        println!("\n📤 Dispatch");
        println!("   ├─ Accepted: {}", s.accepted);
        println!("   ├─ Failed: {}", s.failed);
        println!("   └─ Cancelled: {}", s.cancelled);

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_per_sec() {
        let stats = RunStats {
            batch_size: 100,
            duration: Duration::from_secs(2),
            summary: RouteStatsSummary::default(),
        };
        assert_eq!(stats.records_per_sec(), 50.0);
    }

    #[test]
    fn test_zero_duration_has_no_nan() {
        let stats = RunStats::default();
        assert_eq!(stats.records_per_sec(), 0.0);
    }
}
