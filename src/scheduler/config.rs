//! Scheduler configuration

use std::time::Duration;

/// Configuration for the call scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between sweep runs
    pub sweep_interval: Duration,
    /// How long terminal entries are retained before the cleanup pass
    /// deletes them
    pub retention: Duration,
    /// Upper bound on a single placement attempt inside a sweep; a timeout
    /// counts as a placement failure
    pub placement_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
            retention: Duration::from_secs(24 * 60 * 60),
            placement_timeout: Duration::from_secs(30),
        }
    }
}

impl SchedulerConfig {
    /// Create a new scheduler configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep interval
    #[must_use]
    pub fn sweep_interval(mut self, duration: Duration) -> Self {
        self.sweep_interval = duration;
        self
    }

    /// Set the retention window for terminal entries
    #[must_use]
    pub fn retention(mut self, duration: Duration) -> Self {
        self.retention = duration;
        self
    }

    /// Set the per-placement timeout applied inside sweeps
    #[must_use]
    pub fn placement_timeout(mut self, duration: Duration) -> Self {
        self.placement_timeout = duration;
        self
    }
}
