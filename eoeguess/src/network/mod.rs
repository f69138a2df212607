//! Network quality classification.
//!
//! The host reports connectivity (online/offline) and bandwidth signals
//! (downlink, round-trip time). [`NetworkQualityMonitor`] folds those
//! signals into a [`QualityTier`], and each tier maps to one fixed
//! [`LoadConfig`] that the image loader uses for timeouts and retries.
//!
//! # Tiers
//!
//! | tier   | downlink / rtt            | timeout | retries |
//! |--------|---------------------------|---------|---------|
//! | Poor   | < 1 Mbps or > 500ms       | 20s     | 1       |
//! | Medium | < 3 Mbps or > 200ms       | 15s     | 2       |
//! | Good   | otherwise (and unknown)   | 10s     | 3       |

mod monitor;
mod tier;

pub use monitor::{ConnectivityEvent, NetworkQualityMonitor, UNKNOWN_CONNECTION_TYPE};
pub use tier::{
    ConnectionSignals, LoadConfig, QualityTier, DEFAULT_DOWNLINK_MBPS, DEFAULT_RTT_MS,
    MEDIUM_DOWNLINK_MBPS, MEDIUM_RTT_MS, POOR_DOWNLINK_MBPS, POOR_RTT_MS,
};
