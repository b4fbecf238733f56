//! Summary of a finished sweep.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error_handling::{OutcomeType, ProbeStats};

/// Results of one sentry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Run start, shared by every health log entry the run wrote
    pub started_at: DateTime<Utc>,
    pub mirrors_checked: usize,
    /// Mirrors whose root probe failed; their locations were skipped
    pub mirrors_unhealthy: usize,
    pub locations_checked: usize,
    pub locations_healthy: usize,
    /// Mappings deactivated by a 403 or 404
    pub locations_pruned: usize,
    /// Store writes that failed and were skipped
    pub write_failures: usize,
    /// Mirror or location tasks that panicked
    pub task_failures: usize,
    pub elapsed: Duration,
}

impl SweepReport {
    /// Builds the report from a run's outcome counters.
    pub fn from_stats(started_at: DateTime<Utc>, elapsed: Duration, stats: &ProbeStats) -> Self {
        let count = |outcome| stats.get_outcome_count(outcome);
        let mirrors_unhealthy = count(OutcomeType::MirrorDown);
        let locations_healthy = count(OutcomeType::LocationHealthy);
        let locations_pruned = count(OutcomeType::LocationPruned);
        Self {
            started_at,
            mirrors_checked: count(OutcomeType::MirrorUp) + mirrors_unhealthy,
            mirrors_unhealthy,
            locations_checked: locations_healthy
                + locations_pruned
                + count(OutcomeType::LocationDegraded),
            locations_healthy,
            locations_pruned,
            write_failures: count(OutcomeType::WriteFailure),
            task_failures: count(OutcomeType::TaskPanicked),
            elapsed,
        }
    }

    /// Mappings kept in rotation but marked unhealthy.
    pub fn locations_degraded(&self) -> usize {
        self.locations_checked - self.locations_healthy - self.locations_pruned
    }

    pub fn log_summary(&self) {
        log::info!(
            "Sentry run finished in {:.2?}: {} mirror(s) checked ({} down), {} location(s) checked ({} healthy, {} degraded, {} pruned)",
            self.elapsed,
            self.mirrors_checked,
            self.mirrors_unhealthy,
            self.locations_checked,
            self.locations_healthy,
            self.locations_degraded(),
            self.locations_pruned
        );
        if self.write_failures > 0 || self.task_failures > 0 {
            log::warn!(
                "Sentry run skipped {} failed store write(s) and {} failed task(s)",
                self.write_failures,
                self.task_failures
            );
        }
    }
}
