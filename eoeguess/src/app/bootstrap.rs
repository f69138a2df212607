//! Application bootstrap implementation.
//!
//! This module contains `ImageLayer`, which wires the monitor, cache,
//! loader and preloader in dependency order and owns the connectivity
//! listener task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::config::LayerConfig;
use super::error::AppError;
use crate::cache::ImageCache;
use crate::compress::ImageCompressor;
use crate::loader::{HttpFetcher, ImageFetcher, ImageLoader, DEFAULT_USER_AGENT};
use crate::network::{ConnectivityEvent, NetworkQualityMonitor};
use crate::preload::PreloadOrchestrator;
use crate::telemetry::LoaderMetrics;

/// Capacity of the connectivity notification channel.
const CONNECTIVITY_CHANNEL_CAPACITY: usize = 16;

/// The assembled image layer.
///
/// Construct once per process (or per test) and share the accessors'
/// `Arc`s with whoever needs them.
pub struct ImageLayer {
    config: LayerConfig,
    network: Arc<NetworkQualityMonitor>,
    cache: Arc<ImageCache>,
    loader: Arc<ImageLoader>,
    preloader: PreloadOrchestrator,
    metrics: Arc<LoaderMetrics>,
    connectivity_tx: mpsc::Sender<ConnectivityEvent>,
    listener: JoinHandle<()>,
}

impl ImageLayer {
    /// Start the layer with a custom fetcher.
    ///
    /// Must be called from within a Tokio runtime (the connectivity
    /// listener is spawned here).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when the cache capacity is zero.
    pub async fn start(
        config: LayerConfig,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Result<Self, AppError> {
        if config.cache_capacity == 0 {
            return Err(AppError::Config(
                "cache capacity must be at least 1".to_string(),
            ));
        }

        info!("Starting image layer");

        // 1. Network monitor, subscribed to the connectivity channel
        let (connectivity_tx, connectivity_rx) = mpsc::channel(CONNECTIVITY_CHANNEL_CAPACITY);
        let (network, listener) = NetworkQualityMonitor::subscribed(
            config.initially_online,
            config.signals.clone(),
            connectivity_rx,
        );

        info!(
            online = network.is_online(),
            tier = %network.current_tier(),
            "Network monitor started"
        );

        // 2. Cache
        let cache = Arc::new(ImageCache::new(config.cache_capacity));
        debug!(capacity = cache.capacity(), "Image cache created");

        // 3. Loader sharing monitor, cache and metrics
        let metrics = Arc::new(LoaderMetrics::new());
        let loader = Arc::new(
            ImageLoader::new(fetcher, Arc::clone(&network), Arc::clone(&cache))
                .with_retry_delay(config.retry_delay)
                .with_max_retries(config.max_retries)
                .with_metrics(Arc::clone(&metrics)),
        );

        // 4. Preloader
        let preloader =
            PreloadOrchestrator::new(Arc::clone(&loader)).with_look_ahead(config.look_ahead);

        info!(
            cache_capacity = config.cache_capacity,
            retry_delay_ms = config.retry_delay.as_millis() as u64,
            max_retries = ?config.max_retries,
            look_ahead = config.look_ahead,
            "Image layer ready"
        );

        Ok(Self {
            config,
            network,
            cache,
            loader,
            preloader,
            metrics,
            connectivity_tx,
            listener,
        })
    }

    /// Start the layer with the HTTP/file fetcher.
    pub async fn start_http(config: LayerConfig) -> Result<Self, AppError> {
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let fetcher = HttpFetcher::with_user_agent(user_agent)?;
        Self::start(config, Arc::new(fetcher)).await
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn network(&self) -> &Arc<NetworkQualityMonitor> {
        &self.network
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    pub fn loader(&self) -> &Arc<ImageLoader> {
        &self.loader
    }

    pub fn preloader(&self) -> &PreloadOrchestrator {
        &self.preloader
    }

    pub fn metrics(&self) -> &Arc<LoaderMetrics> {
        &self.metrics
    }

    /// Compressor for pictures added in the bank editor, at the current
    /// tier's quality.
    pub fn upload_compressor(&self) -> ImageCompressor {
        ImageCompressor::for_upload().with_quality(self.network.load_config().quality_hint)
    }

    /// A sender for host connectivity notifications.
    pub fn connectivity(&self) -> mpsc::Sender<ConnectivityEvent> {
        self.connectivity_tx.clone()
    }

    /// Stop the connectivity listener and log final statistics.
    pub async fn shutdown(self) {
        let Self {
            cache,
            metrics,
            connectivity_tx,
            listener,
            ..
        } = self;

        drop(connectivity_tx);
        // Outstanding sender clones would keep the listener alive
        listener.abort();
        let _ = listener.await;

        info!(
            cache = %cache.stats(),
            loads = %metrics.snapshot(),
            "Image layer stopped"
        );
    }
}
