//! CLI subcommands.

pub mod common;
pub mod compress;
pub mod config;
pub mod load;
pub mod preload;
pub mod tier;
