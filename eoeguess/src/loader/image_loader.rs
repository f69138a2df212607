//! Retrying image loader.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use tracing::{debug, error, warn};

use super::error::{AttemptFailure, LoaderError};
use super::fetch::ImageFetcher;
use super::handle::ImageHandle;
use crate::cache::ImageCache;
use crate::network::NetworkQualityMonitor;
use crate::telemetry::LoaderMetrics;

/// Fixed delay between a failed attempt and the next one.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Loads images with timeout, bounded retries and cache short-circuit.
///
/// Concurrent loads of the same uncached key are not merged: each call
/// performs its own attempts.
pub struct ImageLoader {
    fetcher: Arc<dyn ImageFetcher>,
    network: Arc<NetworkQualityMonitor>,
    cache: Arc<ImageCache>,
    metrics: Arc<LoaderMetrics>,
    /// Keys that loaded successfully at least once. Survives cache eviction.
    loaded: DashSet<String>,
    retry_delay: Duration,
    max_retries: Option<u32>,
}

impl ImageLoader {
    /// Create a loader sharing the given monitor and cache.
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        network: Arc<NetworkQualityMonitor>,
        cache: Arc<ImageCache>,
    ) -> Self {
        Self {
            fetcher,
            network,
            cache,
            metrics: Arc::new(LoaderMetrics::new()),
            loaded: DashSet::new(),
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retries: None,
        }
    }

    /// Set the default delay between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Override the tier's retry count for every call that does not pass
    /// its own. `None` restores the tier default.
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Record into shared metrics instead of private ones.
    pub fn with_metrics(mut self, metrics: Arc<LoaderMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    pub fn network(&self) -> &Arc<NetworkQualityMonitor> {
        &self.network
    }

    pub fn metrics(&self) -> &Arc<LoaderMetrics> {
        &self.metrics
    }

    /// Load with the current tier's retry count and the default delay.
    pub async fn load(&self, key: &str) -> Result<ImageHandle, LoaderError> {
        self.load_with_retry(key, None, None).await
    }

    /// Load one image, retrying failed attempts.
    ///
    /// # Arguments
    ///
    /// * `key` - Resolved source key
    /// * `max_retries` - Retries after the first attempt; defaults to the
    ///   loader override, then to the current tier's configuration
    /// * `retry_delay` - Fixed wait between attempts; defaults to 1s
    ///
    /// # Behaviour
    ///
    /// Every attempt first checks the cache (a hit resolves with no fetch)
    /// and then connectivity (offline fails with
    /// [`LoaderError::Connectivity`], never retried). The tier configuration
    /// is read once, when the call starts.
    pub async fn load_with_retry(
        &self,
        key: &str,
        max_retries: Option<u32>,
        retry_delay: Option<Duration>,
    ) -> Result<ImageHandle, LoaderError> {
        let config = self.network.load_config();
        let max_retries = max_retries
            .or(self.max_retries)
            .unwrap_or(config.max_retries);
        let retry_delay = retry_delay.unwrap_or(self.retry_delay);

        self.metrics.request();
        let mut retries = 0u32;

        loop {
            if let Some(handle) = self.cache.get(key) {
                self.metrics.cache_hit();
                debug!(key, "Image served from cache");
                return Ok(handle);
            }

            if !self.network.is_online() {
                self.metrics.connectivity_failure();
                warn!(key, "Network offline, image not loaded");
                return Err(LoaderError::Connectivity {
                    key: key.to_string(),
                });
            }

            let failure = match self.attempt(key, config.timeout).await {
                Ok(handle) => {
                    self.store(key, &handle);
                    return Ok(handle);
                }
                Err(failure) => failure,
            };

            if retries >= max_retries {
                self.metrics.failure();
                error!(key, attempts = retries + 1, error = %failure, "Image load failed");
                return Err(LoaderError::Load {
                    key: key.to_string(),
                    attempts: retries + 1,
                    last_failure: failure,
                });
            }

            retries += 1;
            self.metrics.retry();
            warn!(
                key,
                retry = retries,
                max_retries,
                error = %failure,
                "Image load failed, retrying"
            );
            tokio::time::sleep(retry_delay).await;
        }
    }

    /// Whether `key` has ever loaded successfully through this loader.
    pub fn is_loaded(&self, key: &str) -> bool {
        self.loaded.contains(key)
    }

    /// Number of distinct keys ever loaded.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    async fn attempt(&self, key: &str, timeout: Duration) -> Result<ImageHandle, AttemptFailure> {
        self.metrics.attempt();
        // Dropping the timeout future drops the timer with it
        match tokio::time::timeout(timeout, self.fetcher.fetch(key)).await {
            Ok(Ok(handle)) => Ok(handle),
            Ok(Err(e)) => Err(AttemptFailure::Fetch(e)),
            Err(_) => {
                self.metrics.timeout();
                Err(AttemptFailure::TimedOut(timeout))
            }
        }
    }

    fn store(&self, key: &str, handle: &ImageHandle) {
        self.metrics.success();
        self.loaded.insert(key.to_string());
        self.cache.put(key, handle.clone());
        debug!(key, cached = self.cache.len(), "Image loaded");
    }
}
