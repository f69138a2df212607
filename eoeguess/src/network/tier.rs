//! Quality tiers and their fixed load configurations.

use std::fmt;
use std::time::Duration;

// =============================================================================
// Classification Thresholds
// =============================================================================

/// Downlink assumed when the host does not report one (Mbps).
pub const DEFAULT_DOWNLINK_MBPS: f64 = 10.0;

/// Round-trip time assumed when the host does not report one (ms).
pub const DEFAULT_RTT_MS: u64 = 50;

/// Below this downlink the connection is poor (Mbps).
pub const POOR_DOWNLINK_MBPS: f64 = 1.0;

/// Above this round-trip time the connection is poor (ms).
pub const POOR_RTT_MS: u64 = 500;

/// Below this downlink the connection is medium (Mbps).
pub const MEDIUM_DOWNLINK_MBPS: f64 = 3.0;

/// Above this round-trip time the connection is medium (ms).
pub const MEDIUM_RTT_MS: u64 = 200;

/// Raw connection signals as reported by the host.
///
/// Every field is optional; hosts without a network information API
/// report nothing and the connection classifies as [`QualityTier::Good`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionSignals {
    /// Estimated downlink bandwidth in Mbps.
    pub downlink_mbps: Option<f64>,
    /// Estimated round-trip time in milliseconds.
    pub rtt_ms: Option<u64>,
    /// Effective connection type label (e.g. "4g", "3g", "wifi").
    pub effective_type: Option<String>,
}

impl ConnectionSignals {
    /// Create signals from downlink and round-trip time.
    pub fn new(downlink_mbps: Option<f64>, rtt_ms: Option<u64>) -> Self {
        Self {
            downlink_mbps,
            rtt_ms,
            effective_type: None,
        }
    }

    /// Attach an effective connection type label.
    pub fn with_effective_type(mut self, effective_type: impl Into<String>) -> Self {
        self.effective_type = Some(effective_type.into());
        self
    }

    /// Downlink used for classification.
    ///
    /// Zero, negative and non-finite readings count as missing, since hosts
    /// report 0 when they have no estimate.
    pub fn effective_downlink(&self) -> f64 {
        self.downlink_mbps
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(DEFAULT_DOWNLINK_MBPS)
    }

    /// Round-trip time used for classification. Zero counts as missing.
    pub fn effective_rtt(&self) -> u64 {
        self.rtt_ms.filter(|r| *r > 0).unwrap_or(DEFAULT_RTT_MS)
    }
}

/// Discrete network quality classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QualityTier {
    /// Fast, low-latency connection (also the fallback when unknown).
    #[default]
    Good,
    /// Usable but slow or laggy connection.
    Medium,
    /// Very slow or very laggy connection.
    Poor,
}

impl QualityTier {
    /// All tiers, best first.
    pub const ALL: [QualityTier; 3] = [QualityTier::Good, QualityTier::Medium, QualityTier::Poor];

    /// Classify connection signals into a tier.
    pub fn classify(signals: &ConnectionSignals) -> Self {
        let downlink = signals.effective_downlink();
        let rtt = signals.effective_rtt();

        if downlink < POOR_DOWNLINK_MBPS || rtt > POOR_RTT_MS {
            QualityTier::Poor
        } else if downlink < MEDIUM_DOWNLINK_MBPS || rtt > MEDIUM_RTT_MS {
            QualityTier::Medium
        } else {
            QualityTier::Good
        }
    }

    /// The fixed load configuration for this tier.
    pub fn load_config(&self) -> LoadConfig {
        match self {
            QualityTier::Good => LoadConfig::GOOD,
            QualityTier::Medium => LoadConfig::MEDIUM,
            QualityTier::Poor => LoadConfig::POOR,
        }
    }

    /// Lowercase label ("good", "medium", "poor").
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Good => "good",
            QualityTier::Medium => "medium",
            QualityTier::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image load settings associated with a quality tier.
///
/// One immutable record exists per tier; loaders look it up and never
/// modify it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadConfig {
    /// Suggested encode quality for images authored on this connection.
    pub quality_hint: f32,
    /// How long a single attempt may take before it is abandoned.
    pub timeout: Duration,
    /// Retries after the first attempt (total attempts = max_retries + 1).
    pub max_retries: u32,
}

impl LoadConfig {
    pub const GOOD: LoadConfig = LoadConfig {
        quality_hint: 0.8,
        timeout: Duration::from_millis(10_000),
        max_retries: 3,
    };

    pub const MEDIUM: LoadConfig = LoadConfig {
        quality_hint: 0.6,
        timeout: Duration::from_millis(15_000),
        max_retries: 2,
    };

    pub const POOR: LoadConfig = LoadConfig {
        quality_hint: 0.4,
        timeout: Duration::from_millis(20_000),
        max_retries: 1,
    };

    /// Maximum number of attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl fmt::Display for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timeout {}ms, {} retries, quality {:.1}",
            self.timeout.as_millis(),
            self.max_retries,
            self.quality_hint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(downlink: Option<f64>, rtt: Option<u64>) -> QualityTier {
        QualityTier::classify(&ConnectionSignals::new(downlink, rtt))
    }

    #[test]
    fn test_missing_signals_default_to_good() {
        assert_eq!(classify(None, None), QualityTier::Good);
    }

    #[test]
    fn test_zero_signals_count_as_missing() {
        assert_eq!(classify(Some(0.0), Some(0)), QualityTier::Good);
    }

    #[test]
    fn test_poor_by_downlink() {
        assert_eq!(classify(Some(0.5), Some(50)), QualityTier::Poor);
    }

    #[test]
    fn test_poor_by_rtt() {
        assert_eq!(classify(Some(50.0), Some(501)), QualityTier::Poor);
    }

    #[test]
    fn test_medium_by_downlink() {
        assert_eq!(classify(Some(2.0), None), QualityTier::Medium);
    }

    #[test]
    fn test_medium_by_rtt() {
        assert_eq!(classify(None, Some(300)), QualityTier::Medium);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        // Exactly 1 Mbps is not poor, exactly 500ms is not poor
        assert_eq!(classify(Some(1.0), Some(50)), QualityTier::Medium);
        assert_eq!(classify(Some(10.0), Some(500)), QualityTier::Medium);
        // Exactly 3 Mbps / 200ms is good
        assert_eq!(classify(Some(3.0), Some(200)), QualityTier::Good);
    }

    #[test]
    fn test_poor_wins_over_medium() {
        assert_eq!(classify(Some(2.0), Some(800)), QualityTier::Poor);
    }

    #[test]
    fn test_tier_to_config_mapping() {
        let poor = QualityTier::Poor.load_config();
        assert_eq!(poor.timeout, Duration::from_millis(20_000));
        assert_eq!(poor.max_retries, 1);

        let medium = QualityTier::Medium.load_config();
        assert_eq!(medium.timeout, Duration::from_millis(15_000));
        assert_eq!(medium.max_retries, 2);

        let good = QualityTier::Good.load_config();
        assert_eq!(good.timeout, Duration::from_millis(10_000));
        assert_eq!(good.max_retries, 3);
        assert_eq!(good.max_attempts(), 4);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(QualityTier::Good.to_string(), "good");
        assert_eq!(QualityTier::Medium.to_string(), "medium");
        assert_eq!(QualityTier::Poor.to_string(), "poor");
    }

    #[test]
    fn test_load_config_display() {
        let display = LoadConfig::POOR.to_string();
        assert!(display.contains("20000ms"));
        assert!(display.contains("1 retries"));
    }
}
