//! Configuration file support.
//!
//! Settings live in an INI file at `<config dir>/eoeguess/config.ini`
//! (for example `~/.config/eoeguess/config.ini` on Linux). A missing file
//! means defaults; a present file only needs the keys it overrides.
//!
//! ```ini
//! [cache]
//! capacity = 50
//!
//! [loader]
//! retry_delay_ms = 1000
//! ; max_retries = 2
//!
//! [preload]
//! look_ahead = 2
//! mode = sequential
//!
//! [network]
//! online = true
//! ; downlink = 2.5
//! ; rtt = 120
//!
//! [logging]
//! level = info
//! ```
//!
//! Every key is addressable as `section.key` through [`ConfigKey`], which
//! the CLI uses for `config get` and `config set`.

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, CacheSettings, ConfigError, ConfigFile, LoaderSettings,
    LoggingSettings, NetworkSettings, PreloadSettings,
};
pub use keys::ConfigKey;
