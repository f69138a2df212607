//! `preload` command: warm the image cache for a whole question bank.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use eoeguess::app::{ImageLayer, LayerConfig};
use eoeguess::bank::QuestionBank;
use eoeguess::preload::{PreloadMode, PreloadProgress, ProgressCallback};

use super::common::{bank_base_dir, init_logging, runtime, GlobalArgs, NetworkArgs};
use crate::error::CliError;

/// Arguments for `preload`.
#[derive(Debug, Args)]
pub struct PreloadArgs {
    /// Question bank JSON file
    pub bank: PathBuf,

    /// Load all images concurrently instead of one at a time
    #[arg(long)]
    pub parallel: bool,

    /// Retries per image (overrides the network tier default)
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Delay between retries in milliseconds
    #[arg(long, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    #[command(flatten)]
    pub network: NetworkArgs,
}

/// Run the preload command.
pub fn run(global: &GlobalArgs, args: PreloadArgs) -> Result<(), CliError> {
    let config_file = global.load_config()?;
    let _log_guard = init_logging(global, &config_file)?;

    let bank = QuestionBank::load(&args.bank)?;
    let keys = bank.source_keys(bank_base_dir(&args.bank));
    info!(
        bank = %args.bank.display(),
        questions = bank.len(),
        images = keys.len(),
        "Question bank loaded"
    );

    let mut config = args
        .network
        .apply(LayerConfig::from_config_file(&config_file));
    if let Some(retries) = args.max_retries {
        config = config.with_max_retries(Some(retries));
    }
    if let Some(ms) = args.retry_delay_ms {
        config = config.with_retry_delay(Duration::from_millis(ms));
    }
    let mode = if args.parallel {
        PreloadMode::Parallel
    } else {
        config.preload_mode
    };

    println!(
        "{} {} by {} ({} questions, {} images)",
        style("Bank:").bold(),
        bank.name,
        bank.author_or_unknown(),
        bank.len(),
        keys.len()
    );

    if keys.is_empty() {
        println!("Nothing to preload.");
        return Ok(());
    }

    let rt = runtime()?;
    rt.block_on(async {
        let layer = ImageLayer::start_http(config).await?;

        println!(
            "{} {} ({}), {} mode",
            style("Network:").bold(),
            layer.network().current_tier(),
            layer.network().load_config(),
            mode
        );

        let bar = progress_bar(keys.len());
        let bar_handle = bar.clone();
        let on_progress: ProgressCallback = Box::new(move |p: PreloadProgress| {
            bar_handle.set_position(p.loaded as u64);
        });

        let started = Instant::now();
        let summary = layer
            .preloader()
            .preload(mode, &keys, Some(on_progress.as_ref()))
            .await;
        bar.finish_and_clear();

        let elapsed = started.elapsed();
        if summary.failed == 0 {
            println!(
                "{} {} in {:.1}s",
                style("Done:").green().bold(),
                summary,
                elapsed.as_secs_f64()
            );
        } else {
            println!(
                "{} {} in {:.1}s",
                style("Done with failures:").yellow().bold(),
                summary,
                elapsed.as_secs_f64()
            );
            for key in keys.iter().filter(|k| !layer.loader().is_loaded(k)) {
                println!("  {} {}", style("✗").red(), key);
            }
        }

        println!("{} {}", style("Cache:").bold(), layer.cache().stats());
        println!("{} {}", style("Loads:").bold(), layer.metrics().snapshot());

        layer.shutdown().await;
        Ok::<(), CliError>(())
    })
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}
