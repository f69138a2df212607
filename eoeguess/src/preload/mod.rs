//! Batch preloading of question images.
//!
//! # Architecture
//!
//! ```text
//! PreloadOrchestrator
//!     ├── preload_sequential ─► SequentialStrategy ─► ImageLoader::load (one by one)
//!     ├── preload_parallel ───► ParallelStrategy ───► ImageLoader::load (all at once)
//!     └── look_ahead ─────────► ParallelStrategy::quiet (next N keys)
//! ```
//!
//! Every strategy absorbs per-item failures and reports
//! [`PreloadProgress`] after each settled item.

mod orchestrator;
mod progress;
mod strategy;

pub use orchestrator::{PreloadOrchestrator, DEFAULT_LOOK_AHEAD};
pub use progress::{PreloadProgress, PreloadSummary, ProgressCallback, ProgressFn};
pub use strategy::{
    ParallelStrategy, ParsePreloadModeError, PreloadMode, PreloadStrategy, SequentialStrategy,
};
