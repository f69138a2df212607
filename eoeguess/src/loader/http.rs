//! Real fetcher: HTTP(S) via reqwest, local files via tokio, inline
//! base64 data decoded in place.

use bytes::Bytes;
use tracing::trace;

use super::error::FetchError;
use super::fetch::{BoxFuture, ImageFetcher};
use super::handle::ImageHandle;
use crate::source::{decode_inline, InlineError, SourceKind};

/// User agent sent with remote image requests.
pub const DEFAULT_USER_AGENT: &str = concat!("eoeguess/", env!("CARGO_PKG_VERSION"));

/// Fetches remote images over HTTP and local images from disk.
///
/// The client has no request timeout of its own; the loader wraps every
/// fetch in the tier's timeout. Decoding runs on the blocking pool so large
/// images do not stall the async runtime.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default user agent.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a fetcher with a custom user agent.
    pub fn with_user_agent(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    async fn fetch_remote(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        // Check HTTP status
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|e| FetchError::Http {
            url: url.to_string(),
            reason: format!("failed to read response: {}", e),
        })
    }

    async fn fetch_local(path: &str) -> Result<Bytes, FetchError> {
        tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| FetchError::Io {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    fn inline_bytes(key: &str) -> Result<Bytes, FetchError> {
        decode_inline(key).map(Bytes::from).map_err(|e| match e {
            InlineError::NotBase64 => FetchError::Unsupported {
                key: truncate_key(key),
                reason: e.to_string(),
            },
            InlineError::MissingPayload | InlineError::Base64(_) => FetchError::Decode {
                key: truncate_key(key),
                reason: e.to_string(),
            },
        })
    }

    async fn decode(key: &str, bytes: Bytes) -> Result<ImageHandle, FetchError> {
        let owned_key = key.to_string();
        tokio::task::spawn_blocking(move || ImageHandle::decode(&owned_key, &bytes))
            .await
            .map_err(|e| FetchError::Decode {
                key: key.to_string(),
                reason: format!("decode task failed: {}", e),
            })?
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<ImageHandle, FetchError>> {
        Box::pin(async move {
            let bytes = match SourceKind::of(key) {
                SourceKind::Remote => self.fetch_remote(key).await?,
                SourceKind::Local => Self::fetch_local(key).await?,
                SourceKind::Inline => {
                    let bytes = Self::inline_bytes(key)?;
                    trace!(bytes = bytes.len(), "Decoded inline image data");
                    return Self::decode(key, bytes).await.map_err(|e| match e {
                        FetchError::Decode { reason, .. } => FetchError::Decode {
                            key: truncate_key(key),
                            reason,
                        },
                        other => other,
                    });
                }
            };

            trace!(key, bytes = bytes.len(), "Fetched image bytes");
            Self::decode(key, bytes).await
        })
    }
}

// Inline data keys can be megabytes long; keep errors readable.
fn truncate_key(key: &str) -> String {
    const MAX: usize = 64;
    match key.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &key[..idx]),
        None => key.to_string(),
    }
}
