use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a run is polled until it reaches a terminal status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Upper bound on status checks for one run
    pub max_attempts: u32,
    /// Delay between consecutive status checks
    pub interval: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 180,
            interval: Duration::from_secs(1),
        }
    }
}

impl PollingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Failed status checks tolerated before giving up: half the attempt ceiling
    pub fn transient_retry_limit(&self) -> u32 {
        self.max_attempts / 2
    }
}
