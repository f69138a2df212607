//! INI-backed configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::keys::ConfigKey;
use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::loader::DEFAULT_RETRY_DELAY;
use crate::preload::{PreloadMode, DEFAULT_LOOK_AHEAD};

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("failed to parse config file: {0}")]
    Parse(String),

    /// A key holds a value of the wrong shape.
    #[error("invalid value '{value}' for {section}.{key}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    /// Unknown `section.key` name.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Failed to write the config file.
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Maximum number of decoded images kept in memory.
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// `[loader]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderSettings {
    /// Delay between attempts of one load.
    pub retry_delay_ms: u64,
    /// Overrides the network tier's retry count when set.
    pub max_retries: Option<u32>,
    /// User agent for remote requests.
    pub user_agent: Option<String>,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            max_retries: None,
            user_agent: None,
        }
    }
}

/// `[preload]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadSettings {
    pub look_ahead: usize,
    pub mode: PreloadMode,
}

impl Default for PreloadSettings {
    fn default() -> Self {
        Self {
            look_ahead: DEFAULT_LOOK_AHEAD,
            mode: PreloadMode::Sequential,
        }
    }
}

/// `[network]` section.
///
/// Without a browser there is no live connection estimate, so downlink and
/// RTT may be pinned here. Unset values fall back to the monitor defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSettings {
    pub online: bool,
    pub downlink_mbps: Option<f64>,
    pub rtt_ms: Option<u64>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            online: true,
            downlink_mbps: None,
            rtt_ms: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for daily log files. Console only when unset.
    pub directory: Option<PathBuf>,
    /// Default filter directive (overridden by `RUST_LOG`).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            level: "info".to_string(),
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub cache: CacheSettings,
    pub loader: LoaderSettings,
    pub preload: PreloadSettings,
    pub network: NetworkSettings,
    pub logging: LoggingSettings,
}

/// Directory holding the config file.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eoeguess")
}

/// Path of the config file.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&text)
    }

    /// Parse INI text. Unknown sections and keys are ignored.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|props| props.get(key.key_name()));

            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }

    /// Render as INI. Unset optional keys are omitted.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        self.to_ini().write_to_file(path).map_err(write_err)
    }
}
