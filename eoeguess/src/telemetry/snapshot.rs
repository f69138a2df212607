//! Point-in-time copy of loader counters.

use std::fmt;

/// Loader counters at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub attempts: u64,
    pub retries: u64,
    pub timeouts: u64,
    pub successes: u64,
    pub failures: u64,
    pub connectivity_failures: u64,
}

impl MetricsSnapshot {
    /// Fraction of requests served from cache.
    pub fn cache_hit_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.requests as f64
        }
    }

    /// Fetches per successful load, or 0.0 with no successes.
    pub fn attempts_per_success(&self) -> f64 {
        if self.successes == 0 {
            0.0
        } else {
            self.attempts as f64 / self.successes as f64
        }
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requests ({} cached), {} fetches, {} retries, {} timeouts, \
             {} loaded, {} failed, {} offline",
            self.requests,
            self.cache_hits,
            self.attempts,
            self.retries,
            self.timeouts,
            self.successes,
            self.failures,
            self.connectivity_failures
        )
    }
}
