//! Loader telemetry for observability and user feedback.
//!
//! Lock-free atomic counters record what the image loader does; a
//! [`MetricsSnapshot`] is a point-in-time copy suitable for display.
//!
//! # Architecture
//!
//! ```text
//! ImageLoader ─────► LoaderMetrics ─────► MetricsSnapshot ─────► Views
//!                    (atomic counters)    (point-in-time copy)   (CLI, logs)
//! ```
//!
//! # Example
//!
//! ```
//! use eoeguess::telemetry::LoaderMetrics;
//!
//! let metrics = LoaderMetrics::new();
//! metrics.request();
//! metrics.attempt();
//! metrics.success();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.successes, 1);
//! ```

mod metrics;
mod snapshot;

pub use metrics::LoaderMetrics;
pub use snapshot::MetricsSnapshot;
