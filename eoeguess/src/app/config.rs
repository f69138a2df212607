//! Runtime configuration for [`ImageLayer`](super::ImageLayer).

use std::time::Duration;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::config::ConfigFile;
use crate::loader::DEFAULT_RETRY_DELAY;
use crate::network::ConnectionSignals;
use crate::preload::{PreloadMode, DEFAULT_LOOK_AHEAD};

/// Everything needed to wire the image layer.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    /// Maximum number of cached images.
    pub cache_capacity: usize,

    /// Delay between attempts of one load.
    pub retry_delay: Duration,

    /// Overrides the tier retry count for every load when set.
    pub max_retries: Option<u32>,

    /// Keys preloaded ahead of the current question.
    pub look_ahead: usize,

    /// Default batch preload mode.
    pub preload_mode: PreloadMode,

    /// Connectivity at startup.
    pub initially_online: bool,

    /// Connection signals at startup.
    pub signals: ConnectionSignals,

    /// User agent for remote fetches (`HttpFetcher` default when unset).
    pub user_agent: Option<String>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retries: None,
            look_ahead: DEFAULT_LOOK_AHEAD,
            preload_mode: PreloadMode::Sequential,
            initially_online: true,
            signals: ConnectionSignals::default(),
            user_agent: None,
        }
    }
}

impl LayerConfig {
    /// Build from the on-disk configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            cache_capacity: config.cache.capacity,
            retry_delay: Duration::from_millis(config.loader.retry_delay_ms),
            max_retries: config.loader.max_retries,
            look_ahead: config.preload.look_ahead,
            preload_mode: config.preload.mode,
            initially_online: config.network.online,
            signals: ConnectionSignals::new(config.network.downlink_mbps, config.network.rtt_ms),
            user_agent: config.loader.user_agent.clone(),
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_look_ahead(mut self, count: usize) -> Self {
        self.look_ahead = count;
        self
    }

    pub fn with_preload_mode(mut self, mode: PreloadMode) -> Self {
        self.preload_mode = mode;
        self
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.initially_online = online;
        self
    }

    /// Set startup signals. `None` keeps the current value for that signal.
    pub fn with_signals(mut self, downlink_mbps: Option<f64>, rtt_ms: Option<u64>) -> Self {
        if downlink_mbps.is_some() {
            self.signals.downlink_mbps = downlink_mbps;
        }
        if rtt_ms.is_some() {
            self.signals.rtt_ms = rtt_ms;
        }
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
