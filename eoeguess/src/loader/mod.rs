//! Image loading with timeout, bounded retries and cache short-circuit.
//!
//! # Architecture
//!
//! ```text
//! ImageLoader::load_with_retry(key)
//!     │
//!     ├── ImageCache hit? ───────────► handle (no fetch)
//!     ├── NetworkQualityMonitor offline? ─► LoaderError::Connectivity
//!     └── attempt loop (config frozen at call start)
//!             ├── timeout(LoadConfig::timeout, ImageFetcher::fetch)
//!             ├── success ─► cache.put + loaded set ─► handle
//!             └── failure ─► sleep(retry_delay) ─► back to cache check
//!                            or LoaderError::Load when retries run out
//! ```
//!
//! The fetch itself is behind the [`ImageFetcher`] trait so tests can inject
//! scripted fetchers and count network calls.

mod error;
mod fetch;
mod handle;
mod http;
mod image_loader;

pub use error::{AttemptFailure, FetchError, LoaderError};
pub use fetch::{BoxFuture, ImageFetcher};
pub use handle::ImageHandle;
pub use http::{HttpFetcher, DEFAULT_USER_AGENT};
pub use image_loader::{ImageLoader, DEFAULT_RETRY_DELAY};

#[cfg(test)]
pub use fetch::tests::{MockFetcher, MockOutcome};
