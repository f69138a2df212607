//! `compress` command: shrink a picture the way the bank editor stores it.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use eoeguess::compress::{compress_upload, ImageCompressor, UPLOAD_MAX_DIMENSION};
use eoeguess::network::{ConnectionSignals, NetworkQualityMonitor};

use super::common::{init_logging, GlobalArgs};
use crate::error::CliError;

/// Arguments for `compress`.
#[derive(Debug, Args)]
pub struct CompressArgs {
    /// Picture to compress
    pub input: PathBuf,

    /// Where to write the JPEG (defaults to `<input stem>.jpg` beside the input)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print a `data:` URI for a bank's image field instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub data_uri: bool,

    /// Bounding box width
    #[arg(long, value_name = "PX", default_value_t = UPLOAD_MAX_DIMENSION)]
    pub max_width: u32,

    /// Bounding box height
    #[arg(long, value_name = "PX", default_value_t = UPLOAD_MAX_DIMENSION)]
    pub max_height: u32,

    /// Encode quality between 0.0 and 1.0 (defaults to the network tier's hint)
    #[arg(long, value_name = "Q")]
    pub quality: Option<f32>,

    /// Downlink estimate in Mbps used to pick the tier
    #[arg(long, value_name = "MBPS")]
    pub downlink: Option<f64>,

    /// Round-trip time in milliseconds used to pick the tier
    #[arg(long, value_name = "MS")]
    pub rtt: Option<u64>,
}

impl CompressArgs {
    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output(&self.input))
    }
}

/// Run the compress command.
pub fn run(global: &GlobalArgs, args: CompressArgs) -> Result<(), CliError> {
    let config = global.load_config()?;
    let _log_guard = init_logging(global, &config)?;

    let monitor = NetworkQualityMonitor::with_signals(
        config.network.online,
        ConnectionSignals::new(
            args.downlink.or(config.network.downlink_mbps),
            args.rtt.or(config.network.rtt_ms),
        ),
    );
    let quality = args
        .quality
        .unwrap_or(monitor.load_config().quality_hint);
    let compressor = ImageCompressor::new(args.max_width, args.max_height).with_quality(quality);

    compress_file(&args, &compressor)
}

fn compress_file(args: &CompressArgs, compressor: &ImageCompressor) -> Result<(), CliError> {
    let bytes = fs::read(&args.input).map_err(|e| CliError::Io {
        path: args.input.clone(),
        source: e,
    })?;
    let key = args.input.to_string_lossy();
    let compressed = compress_upload(&key, &bytes, compressor)?;

    if args.data_uri {
        println!("{}", compressed.to_data_uri());
        return Ok(());
    }

    let output = args.output_path();
    fs::write(&output, &compressed.bytes).map_err(|e| CliError::Io {
        path: output.clone(),
        source: e,
    })?;

    println!(
        "{} {} → {} ({}x{}, {} → {} bytes, {})",
        style("✓").green(),
        args.input.display(),
        output.display(),
        compressed.width,
        compressed.height,
        bytes.len(),
        compressed.len(),
        compressor
    );

    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let name = if input.extension().is_some_and(|ext| ext == "jpg") {
        format!("{}.compressed.jpg", stem)
    } else {
        format!("{}.jpg", stem)
    };
    input.with_file_name(name)
}
