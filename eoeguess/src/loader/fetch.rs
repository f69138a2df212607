//! Fetcher abstraction for testability.

use std::future::Future;
use std::pin::Pin;

use super::error::FetchError;
use super::handle::ImageHandle;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for fetching and decoding one image.
///
/// This abstraction allows for dependency injection: the loader owns retry,
/// timeout and caching policy, while fetchers only know how to turn a
/// source key into a decoded [`ImageHandle`]. Implementations must not
/// retry or cache on their own.
pub trait ImageFetcher: Send + Sync {
    /// Fetch and decode the image behind `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - A resolved source key (URL or path)
    fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<ImageHandle, FetchError>>;
}
