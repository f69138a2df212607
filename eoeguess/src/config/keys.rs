//! Addressable configuration keys (`section.key`).

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{ConfigError, ConfigFile};

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    CacheCapacity,
    LoaderRetryDelayMs,
    LoaderMaxRetries,
    LoaderUserAgent,
    PreloadLookAhead,
    PreloadMode,
    NetworkOnline,
    NetworkDownlink,
    NetworkRtt,
    LoggingDirectory,
    LoggingLevel,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::CacheCapacity,
            ConfigKey::LoaderRetryDelayMs,
            ConfigKey::LoaderMaxRetries,
            ConfigKey::LoaderUserAgent,
            ConfigKey::PreloadLookAhead,
            ConfigKey::PreloadMode,
            ConfigKey::NetworkOnline,
            ConfigKey::NetworkDownlink,
            ConfigKey::NetworkRtt,
            ConfigKey::LoggingDirectory,
            ConfigKey::LoggingLevel,
        ]
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::CacheCapacity => "cache",
            ConfigKey::LoaderRetryDelayMs
            | ConfigKey::LoaderMaxRetries
            | ConfigKey::LoaderUserAgent => "loader",
            ConfigKey::PreloadLookAhead | ConfigKey::PreloadMode => "preload",
            ConfigKey::NetworkOnline | ConfigKey::NetworkDownlink | ConfigKey::NetworkRtt => {
                "network"
            }
            ConfigKey::LoggingDirectory | ConfigKey::LoggingLevel => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::CacheCapacity => "capacity",
            ConfigKey::LoaderRetryDelayMs => "retry_delay_ms",
            ConfigKey::LoaderMaxRetries => "max_retries",
            ConfigKey::LoaderUserAgent => "user_agent",
            ConfigKey::PreloadLookAhead => "look_ahead",
            ConfigKey::PreloadMode => "mode",
            ConfigKey::NetworkOnline => "online",
            ConfigKey::NetworkDownlink => "downlink",
            ConfigKey::NetworkRtt => "rtt",
            ConfigKey::LoggingDirectory => "directory",
            ConfigKey::LoggingLevel => "level",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string. Unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(|v| v.to_string()).unwrap_or_default()
        }

        match self {
            ConfigKey::CacheCapacity => config.cache.capacity.to_string(),
            ConfigKey::LoaderRetryDelayMs => config.loader.retry_delay_ms.to_string(),
            ConfigKey::LoaderMaxRetries => opt(&config.loader.max_retries),
            ConfigKey::LoaderUserAgent => opt(&config.loader.user_agent),
            ConfigKey::PreloadLookAhead => config.preload.look_ahead.to_string(),
            ConfigKey::PreloadMode => config.preload.mode.to_string(),
            ConfigKey::NetworkOnline => config.network.online.to_string(),
            ConfigKey::NetworkDownlink => opt(&config.network.downlink_mbps),
            ConfigKey::NetworkRtt => opt(&config.network.rtt_ms),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
        }
    }

    /// Validate and store a value. An empty value clears optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            section: self.section().to_string(),
            key: self.key_name().to_string(),
            value: value.to_string(),
        };

        match self {
            ConfigKey::CacheCapacity => {
                let capacity: usize = value.parse().map_err(|_| invalid())?;
                if capacity == 0 {
                    return Err(invalid());
                }
                config.cache.capacity = capacity;
            }
            ConfigKey::LoaderRetryDelayMs => {
                config.loader.retry_delay_ms = value.parse().map_err(|_| invalid())?;
            }
            ConfigKey::LoaderMaxRetries => {
                config.loader.max_retries = parse_optional(value).map_err(|_| invalid())?;
            }
            ConfigKey::LoaderUserAgent => {
                config.loader.user_agent = (!value.is_empty()).then(|| value.to_string());
            }
            ConfigKey::PreloadLookAhead => {
                config.preload.look_ahead = value.parse().map_err(|_| invalid())?;
            }
            ConfigKey::PreloadMode => {
                config.preload.mode = value.parse().map_err(|_| invalid())?;
            }
            ConfigKey::NetworkOnline => {
                config.network.online = parse_bool(value).ok_or_else(invalid)?;
            }
            ConfigKey::NetworkDownlink => {
                let downlink: Option<f64> = parse_optional(value).map_err(|_| invalid())?;
                if downlink.is_some_and(|d| !d.is_finite() || d < 0.0) {
                    return Err(invalid());
                }
                config.network.downlink_mbps = downlink;
            }
            ConfigKey::NetworkRtt => {
                config.network.rtt_ms = parse_optional(value).map_err(|_| invalid())?;
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            ConfigKey::LoggingLevel => {
                if value.is_empty() {
                    return Err(invalid());
                }
                config.logging.level = value.to_string();
            }
        }

        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_optional<T: FromStr>(value: &str) -> Result<Option<T>, T::Err> {
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
