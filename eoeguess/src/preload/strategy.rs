//! Preload strategies.
//!
//! This module implements the Strategy pattern for sequential vs parallel
//! preloading of a batch of source keys.

use std::fmt;
use std::str::FromStr;

use futures::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tracing::{debug, warn};

use super::progress::{PreloadSummary, ProgressFn};
use crate::loader::{BoxFuture, ImageLoader};

/// How a batch is preloaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreloadMode {
    /// One item at a time, in order.
    #[default]
    Sequential,
    /// All items at once; progress in settlement order.
    Parallel,
}

impl PreloadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreloadMode::Sequential => "sequential",
            PreloadMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for PreloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown preload mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preload mode '{0}' (expected 'sequential' or 'parallel')")]
pub struct ParsePreloadModeError(pub String);

impl FromStr for PreloadMode {
    type Err = ParsePreloadModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(PreloadMode::Sequential),
            "parallel" => Ok(PreloadMode::Parallel),
            other => Err(ParsePreloadModeError(other.to_string())),
        }
    }
}

/// Strategy for preloading a batch of keys.
///
/// Strategies absorb per-item failures: the returned future always
/// resolves with a summary.
pub trait PreloadStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Execute the strategy.
    ///
    /// # Arguments
    ///
    /// * `loader` - Loader used for every item
    /// * `keys` - Source keys in batch order
    /// * `on_progress` - Optional callback invoked after every settled item
    fn execute<'a>(
        &'a self,
        loader: &'a ImageLoader,
        keys: &'a [String],
        on_progress: Option<&'a ProgressFn>,
    ) -> BoxFuture<'a, PreloadSummary>;
}

/// Sequential preload strategy.
///
/// Each load settles before the next begins, so retries of one key delay
/// everything behind it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialStrategy;

impl SequentialStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl PreloadStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn execute<'a>(
        &'a self,
        loader: &'a ImageLoader,
        keys: &'a [String],
        on_progress: Option<&'a ProgressFn>,
    ) -> BoxFuture<'a, PreloadSummary> {
        Box::pin(async move {
            let mut summary = PreloadSummary::empty(keys.len());

            for key in keys {
                let result = loader.load(key).await;
                if let Err(ref e) = result {
                    warn!(key = %key, error = %e, "Preload item failed");
                }

                let progress = summary.record(result.is_ok());
                if let Some(cb) = on_progress {
                    cb(progress);
                }
            }

            summary
        })
    }
}

/// Parallel preload strategy.
///
/// Every load starts at once. When `quiet`, item failures are logged at
/// debug level only (used for look-ahead during play).
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelStrategy {
    pub quiet: bool,
}

impl ParallelStrategy {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// A strategy that tolerates failures silently.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl PreloadStrategy for ParallelStrategy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn execute<'a>(
        &'a self,
        loader: &'a ImageLoader,
        keys: &'a [String],
        on_progress: Option<&'a ProgressFn>,
    ) -> BoxFuture<'a, PreloadSummary> {
        Box::pin(async move {
            let mut summary = PreloadSummary::empty(keys.len());

            let mut pending: FuturesUnordered<_> = keys
                .iter()
                .map(|key| async move { (key, loader.load(key).await) })
                .collect();

            while let Some((key, result)) = pending.next().await {
                if let Err(ref e) = result {
                    if self.quiet {
                        debug!(key = %key, error = %e, "Look-ahead item failed");
                    } else {
                        warn!(key = %key, error = %e, "Preload item failed");
                    }
                }

                let progress = summary.record(result.is_ok());
                if let Some(cb) = on_progress {
                    cb(progress);
                }
            }

            summary
        })
    }
}
