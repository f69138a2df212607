//! `load` command: load individual images and report what was decoded.

use std::time::Duration;

use clap::Args;
use console::style;

use eoeguess::app::{ImageLayer, LayerConfig};
use eoeguess::source::resolve_source;

use super::common::{init_logging, runtime, GlobalArgs, NetworkArgs};
use crate::error::CliError;

/// Arguments for `load`.
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Image URLs or file paths
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Retries per image (overrides the network tier default)
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Delay between retries in milliseconds
    #[arg(long, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    #[command(flatten)]
    pub network: NetworkArgs,
}

/// Run the load command.
pub fn run(global: &GlobalArgs, args: LoadArgs) -> Result<(), CliError> {
    let config_file = global.load_config()?;
    let _log_guard = init_logging(global, &config_file)?;

    let keys: Vec<String> = args
        .sources
        .iter()
        .filter_map(|raw| resolve_source(raw, None))
        .collect();
    if keys.is_empty() {
        return Err(CliError::Config("no image sources given".to_string()));
    }

    let mut config = args
        .network
        .apply(LayerConfig::from_config_file(&config_file));
    if args.max_retries.is_some() {
        config = config.with_max_retries(args.max_retries);
    }
    if let Some(ms) = args.retry_delay_ms {
        config = config.with_retry_delay(Duration::from_millis(ms));
    }

    let rt = runtime()?;
    rt.block_on(async {
        let layer = ImageLayer::start_http(config).await?;
        let mut failed = 0;

        for key in &keys {
            match layer.loader().load(key).await {
                Ok(handle) => {
                    let (width, height) = handle.dimensions();
                    let format = handle
                        .format()
                        .map(|f| format!("{:?}", f))
                        .unwrap_or_else(|| "unknown".to_string());
                    println!(
                        "{} {} {}x{} {} ({} bytes)",
                        style("✓").green(),
                        key,
                        width,
                        height,
                        format,
                        handle.encoded_len()
                    );
                }
                Err(e) => {
                    failed += 1;
                    println!("{} {}", style("✗").red(), e);
                }
            }
        }

        layer.shutdown().await;

        if failed > 0 {
            Err::<(), CliError>(CliError::LoadFailed {
                failed,
                total: keys.len(),
            })
        } else {
            Ok(())
        }
    })
}
