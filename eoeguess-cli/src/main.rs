//! EOE Guess CLI - Command-line interface
//!
//! This binary exposes the image layer of the `eoeguess` library: preload a
//! question bank's images, load individual images, compress pictures for a
//! bank, classify network signals, and manage the configuration file.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use console::style;

use commands::compress::CompressArgs;
use commands::config::ConfigCommands;
use commands::load::LoadArgs;
use commands::preload::PreloadArgs;
use commands::tier::TierArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "eoeguess", version, about = "EOE Guess image loading and preloading")]
struct Cli {
    /// Path to the configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Preload every image referenced by a question bank
    Preload(PreloadArgs),

    /// Load one or more images and print their dimensions
    Load(LoadArgs),

    /// Downscale and re-encode a picture for storage in a bank
    Compress(CompressArgs),

    /// Classify network signals into a quality tier
    Tier(TierArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let global = commands::common::GlobalArgs {
        config_path: cli.config,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Preload(args) => commands::preload::run(&global, args),
        Commands::Load(args) => commands::load::run(&global, args),
        Commands::Compress(args) => commands::compress::run(&global, args),
        Commands::Tier(args) => commands::tier::run(&global, args),
        Commands::Config(command) => commands::config::run(&global, command),
    }
}
