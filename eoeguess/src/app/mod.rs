//! Application bootstrap and lifecycle management.
//!
//! The image layer is a small graph of shared components. [`ImageLayer`]
//! builds it once, in dependency order, and hands out `Arc`s so nothing
//! needs to be a global.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       ImageLayer                          │
//! │                                                           │
//! │  1. NetworkQualityMonitor ◄── connectivity channel        │
//! │  2. ImageCache (capacity from LayerConfig)                │
//! │  3. ImageLoader ──► ImageFetcher (HttpFetcher or custom)  │
//! │  4. PreloadOrchestrator (look-ahead window)               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use eoeguess::app::{ImageLayer, LayerConfig};
//!
//! let layer = ImageLayer::start_http(LayerConfig::default()).await?;
//! let summary = layer.preloader().preload_sequential(&keys, None).await;
//! layer.shutdown().await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::ImageLayer;
pub use config::LayerConfig;
pub use error::AppError;
