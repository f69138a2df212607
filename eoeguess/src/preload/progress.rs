//! Progress reporting and summaries for preload batches.

use std::fmt;

/// Progress of a preload batch.
///
/// `loaded` counts settled items, successful or not, so a batch always
/// ends at `loaded == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadProgress {
    /// Items settled so far.
    pub loaded: usize,
    /// Items in the batch.
    pub total: usize,
}

impl PreloadProgress {
    pub fn new(loaded: usize, total: usize) -> Self {
        Self { loaded, total }
    }

    /// Completion percentage (0-100). An empty batch is complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.loaded as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

/// Progress callback for preload batches.
///
/// Called once after every item settles, with the running count.
pub type ProgressFn = dyn Fn(PreloadProgress) + Send + Sync;

/// Owned progress callback.
pub type ProgressCallback = Box<ProgressFn>;

/// Outcome counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl PreloadSummary {
    pub(crate) fn empty(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, success: bool) -> PreloadProgress {
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        PreloadProgress::new(self.settled(), self.total)
    }

    /// Items settled so far.
    pub fn settled(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.succeeded == self.total
    }
}

impl fmt::Display for PreloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} loaded, {} failed",
            self.succeeded, self.total, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(PreloadProgress::new(0, 4).percent(), 0.0);
        assert_eq!(PreloadProgress::new(1, 4).percent(), 25.0);
        assert_eq!(PreloadProgress::new(4, 4).percent(), 100.0);
        assert_eq!(PreloadProgress::new(0, 0).percent(), 100.0);
    }

    #[test]
    fn test_is_complete() {
        assert!(!PreloadProgress::new(2, 3).is_complete());
        assert!(PreloadProgress::new(3, 3).is_complete());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = PreloadSummary::empty(3);
        assert_eq!(summary.record(true), PreloadProgress::new(1, 3));
        assert_eq!(summary.record(false), PreloadProgress::new(2, 3));
        assert_eq!(summary.record(true), PreloadProgress::new(3, 3));

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.to_string(), "2/3 loaded, 1 failed");
    }
}
