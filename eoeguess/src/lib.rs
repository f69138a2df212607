//! EOE Guess - image layer for the picture quiz game
//!
//! This library loads, caches and preloads the images attached to quiz
//! questions. Loads adapt their timeout and retry budget to the observed
//! network quality, successful loads land in a bounded insertion-order
//! cache, and whole question banks can be preloaded sequentially (with
//! progress) or in parallel (look-ahead during play).
//!
//! # Architecture
//!
//! ```text
//! ImageLayer (bootstrap)
//!     │
//!     ├── NetworkQualityMonitor ◄── ConnectivityEvent channel
//!     ├── ImageCache (insertion-order, bounded)
//!     ├── ImageLoader ──► ImageFetcher (HttpFetcher, mocks)
//!     └── PreloadOrchestrator
//!             ├── SequentialStrategy
//!             └── ParallelStrategy
//!
//! ImageCompressor (bank editor uploads, quality from the current tier)
//! ```

pub mod app;
pub mod bank;
pub mod cache;
pub mod compress;
pub mod config;
pub mod loader;
pub mod logging;
pub mod network;
pub mod preload;
pub mod source;
pub mod telemetry;
