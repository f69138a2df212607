//! Batch preload orchestrator.
//!
//! Coordinates preloading of question images using a configurable strategy
//! (sequential or parallel), plus look-ahead of the next few questions
//! during play.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::progress::{PreloadSummary, ProgressFn};
use super::strategy::{ParallelStrategy, PreloadMode, PreloadStrategy, SequentialStrategy};
use crate::loader::ImageLoader;

/// Number of upcoming questions preloaded by [`PreloadOrchestrator::look_ahead`].
pub const DEFAULT_LOOK_AHEAD: usize = 2;

/// Preload orchestrator.
///
/// Holds no per-batch state; every call owns its own progress counters.
pub struct PreloadOrchestrator {
    loader: Arc<ImageLoader>,
    look_ahead: usize,
}

impl PreloadOrchestrator {
    /// Create an orchestrator with the default look-ahead window.
    pub fn new(loader: Arc<ImageLoader>) -> Self {
        Self {
            loader,
            look_ahead: DEFAULT_LOOK_AHEAD,
        }
    }

    /// Set how many upcoming keys `look_ahead` preloads.
    pub fn with_look_ahead(mut self, count: usize) -> Self {
        self.look_ahead = count;
        self
    }

    pub fn loader(&self) -> &Arc<ImageLoader> {
        &self.loader
    }

    pub fn look_ahead_window(&self) -> usize {
        self.look_ahead
    }

    /// Preload keys one at a time, in order.
    ///
    /// Failures are logged and counted toward progress; the batch itself
    /// never fails.
    pub async fn preload_sequential(
        &self,
        keys: &[String],
        on_progress: Option<&ProgressFn>,
    ) -> PreloadSummary {
        self.run(&SequentialStrategy::new(), keys, on_progress).await
    }

    /// Preload all keys concurrently. Progress follows settlement order.
    pub async fn preload_parallel(
        &self,
        keys: &[String],
        on_progress: Option<&ProgressFn>,
    ) -> PreloadSummary {
        self.run(&ParallelStrategy::new(), keys, on_progress).await
    }

    /// Preload using the given mode.
    pub async fn preload(
        &self,
        mode: PreloadMode,
        keys: &[String],
        on_progress: Option<&ProgressFn>,
    ) -> PreloadSummary {
        match mode {
            PreloadMode::Sequential => self.preload_sequential(keys, on_progress).await,
            PreloadMode::Parallel => self.preload_parallel(keys, on_progress).await,
        }
    }

    /// Preload the keys following `current_index`, in parallel.
    ///
    /// Loads at most the look-ahead window; indices past the end are
    /// ignored. Failures are tolerated silently.
    pub async fn look_ahead(&self, keys: &[String], current_index: usize) -> PreloadSummary {
        let start = current_index.saturating_add(1).min(keys.len());
        let end = start.saturating_add(self.look_ahead).min(keys.len());
        let window = &keys[start..end];

        debug!(current_index, count = window.len(), "Looking ahead");

        let strategy = ParallelStrategy::quiet();
        strategy.execute(&self.loader, window, None).await
    }

    async fn run(
        &self,
        strategy: &dyn PreloadStrategy,
        keys: &[String],
        on_progress: Option<&ProgressFn>,
    ) -> PreloadSummary {
        if keys.is_empty() {
            return PreloadSummary::default();
        }

        let started = Instant::now();
        let summary = strategy.execute(&self.loader, keys, on_progress).await;

        info!(
            strategy = strategy.name(),
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Preload finished"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ImageCache;
    use crate::loader::{MockFetcher, MockOutcome};
    use crate::network::NetworkQualityMonitor;
    use crate::preload::{PreloadProgress, ProgressCallback};
    use parking_lot::Mutex;
    use std::time::Duration;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn orchestrator_with(fetcher: Arc<MockFetcher>) -> PreloadOrchestrator {
        let loader = ImageLoader::new(
            fetcher,
            Arc::new(NetworkQualityMonitor::new(true)),
            Arc::new(ImageCache::new(50)),
        );
        PreloadOrchestrator::new(Arc::new(loader))
    }

    fn recorder() -> (Arc<Mutex<Vec<PreloadProgress>>>, ProgressCallback) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let cb: ProgressCallback = Box::new(move |p| sink.lock().push(p));
        (events, cb)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_absorbs_failures() {
        let fetcher = Arc::new(MockFetcher::succeeding().script(
            "k2",
            [MockOutcome::Fail; 4],
        ));
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));
        let (events, cb) = recorder();

        let summary = orchestrator
            .preload_sequential(&keys(&["k1", "k2", "k3"]), Some(cb.as_ref()))
            .await;

        assert_eq!(
            summary,
            PreloadSummary {
                total: 3,
                succeeded: 2,
                failed: 1
            }
        );
        let loaded: Vec<usize> = events.lock().iter().map(|p| p.loaded).collect();
        assert_eq!(loaded, vec![1, 2, 3]);
        assert!(events.lock().iter().all(|p| p.total == 3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_order_includes_retries() {
        let fetcher = Arc::new(MockFetcher::succeeding().script(
            "k2",
            [MockOutcome::Fail; 4],
        ));
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));

        orchestrator
            .preload_sequential(&keys(&["k1", "k2", "k3"]), None)
            .await;

        // Good tier: 1 attempt + 3 retries for k2 before k3 starts
        assert_eq!(
            fetcher.call_log(),
            vec!["k1", "k2", "k2", "k2", "k2", "k3"]
        );
        assert!(orchestrator.loader().is_loaded("k1"));
        assert!(!orchestrator.loader().is_loaded("k2"));
        assert!(orchestrator.loader().is_loaded("k3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_waits_for_each_item() {
        let fetcher = Arc::new(
            MockFetcher::succeeding()
                .script("k1", [MockOutcome::SucceedAfter(Duration::from_millis(300))])
                .script("k2", [MockOutcome::SucceedAfter(Duration::from_millis(100))]),
        );
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));
        let start = tokio::time::Instant::now();

        orchestrator
            .preload_sequential(&keys(&["k1", "k2"]), None)
            .await;

        assert_eq!(fetcher.settle_log(), vec!["k1", "k2"]);
        assert_eq!(start.elapsed().as_millis(), 400);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_progress_in_settlement_order() {
        let fetcher = Arc::new(
            MockFetcher::succeeding()
                .script("k1", [MockOutcome::SucceedAfter(Duration::from_millis(300))])
                .script("k2", [MockOutcome::SucceedAfter(Duration::from_millis(100))])
                .script("k3", [MockOutcome::SucceedAfter(Duration::from_millis(200))]),
        );
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));
        let (events, cb) = recorder();
        let start = tokio::time::Instant::now();

        let summary = orchestrator
            .preload_parallel(&keys(&["k1", "k2", "k3"]), Some(cb.as_ref()))
            .await;

        assert_eq!(summary.succeeded, 3);
        assert_eq!(fetcher.settle_log(), vec!["k2", "k3", "k1"]);
        assert_eq!(start.elapsed().as_millis(), 300);

        let loaded: Vec<usize> = events.lock().iter().map(|p| p.loaded).collect();
        assert_eq!(loaded, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_never_fails() {
        let fetcher = Arc::new(MockFetcher::failing());
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));

        let summary = orchestrator
            .preload_parallel(&keys(&["a", "b"]), None)
            .await;

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.succeeded, 0);
        // 4 attempts each on the good tier
        assert_eq!(fetcher.calls(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_emits_nothing() {
        let fetcher = Arc::new(MockFetcher::succeeding());
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));
        let (events, cb) = recorder();

        for mode in [PreloadMode::Sequential, PreloadMode::Parallel] {
            let summary = orchestrator.preload(mode, &[], Some(cb.as_ref())).await;
            assert_eq!(summary, PreloadSummary::default());
        }

        assert!(events.lock().is_empty());
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_look_ahead_window() {
        let fetcher = Arc::new(MockFetcher::succeeding());
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));
        let bank = keys(&["q0", "q1", "q2", "q3", "q4"]);

        let summary = orchestrator.look_ahead(&bank, 1).await;

        assert_eq!(summary.total, 2);
        let mut called = fetcher.call_log();
        called.sort();
        assert_eq!(called, vec!["q2", "q3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_look_ahead_clamps_at_end() {
        let fetcher = Arc::new(MockFetcher::succeeding());
        let orchestrator = orchestrator_with(Arc::clone(&fetcher)).with_look_ahead(3);
        let bank = keys(&["q0", "q1", "q2"]);

        assert_eq!(orchestrator.look_ahead(&bank, 1).await.total, 1);
        assert_eq!(orchestrator.look_ahead(&bank, 2).await.total, 0);
        assert_eq!(orchestrator.look_ahead(&bank, 10).await.total, 0);
        assert_eq!(fetcher.call_log(), vec!["q2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_look_ahead_tolerates_failures() {
        let fetcher = Arc::new(MockFetcher::succeeding().script("q1", [MockOutcome::Fail; 4]));
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));
        let bank = keys(&["q0", "q1", "q2"]);

        let summary = orchestrator.look_ahead(&bank, 0).await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_items_skip_fetch() {
        let fetcher = Arc::new(MockFetcher::succeeding());
        let orchestrator = orchestrator_with(Arc::clone(&fetcher));
        let bank = keys(&["a", "b"]);

        orchestrator.preload_parallel(&bank, None).await;
        let second = orchestrator.preload_sequential(&bank, None).await;

        assert_eq!(second.succeeded, 2);
        assert_eq!(fetcher.calls(), 2);
    }
}
