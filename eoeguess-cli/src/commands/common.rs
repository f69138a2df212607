//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::Args;
use tokio::runtime::Runtime;

use eoeguess::app::LayerConfig;
use eoeguess::config::{config_file_path, ConfigFile};
use eoeguess::logging::{self, WorkerGuard};

use crate::error::CliError;

/// Options that apply to every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config_path: Option<PathBuf>,
    pub verbose: u8,
}

impl GlobalArgs {
    /// The config file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(config_file_path)
    }

    /// Load the config file; a missing file yields defaults.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        Ok(ConfigFile::load_from(&self.config_path())?)
    }

    /// Log level after applying `-v` flags.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self.verbose {
            0 => configured,
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Network overrides for commands that load images.
#[derive(Debug, Clone, Default, Args)]
pub struct NetworkArgs {
    /// Start with the network reported offline
    #[arg(long)]
    pub offline: bool,

    /// Downlink estimate in Mbps
    #[arg(long, value_name = "MBPS")]
    pub downlink: Option<f64>,

    /// Round-trip time estimate in milliseconds
    #[arg(long, value_name = "MS")]
    pub rtt: Option<u64>,
}

impl NetworkArgs {
    /// Apply overrides on top of a layer config.
    pub fn apply(&self, config: LayerConfig) -> LayerConfig {
        let config = config.with_signals(self.downlink, self.rtt);
        if self.offline {
            config.with_online(false)
        } else {
            config
        }
    }
}

/// Install logging from the config file and `-v` flags.
pub fn init_logging(
    global: &GlobalArgs,
    config: &ConfigFile,
) -> Result<Option<WorkerGuard>, CliError> {
    let level = global.log_level(&config.logging.level);
    Ok(logging::init(level, config.logging.directory.as_deref())?)
}

/// Create the multi-threaded runtime used by async commands.
pub fn runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

/// Directory against which a bank's relative image paths resolve.
pub fn bank_base_dir(bank_path: &Path) -> Option<&Path> {
    bank_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}
