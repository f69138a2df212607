//! `tier` command: show how signals classify and what a load would use.

use clap::Args;
use console::style;

use eoeguess::network::{ConnectionSignals, NetworkQualityMonitor, QualityTier};

use super::common::GlobalArgs;
use crate::error::CliError;

/// Arguments for `tier`.
#[derive(Debug, Args)]
pub struct TierArgs {
    /// Downlink estimate in Mbps (defaults to the configured value)
    #[arg(long, value_name = "MBPS")]
    pub downlink: Option<f64>,

    /// Round-trip time in milliseconds (defaults to the configured value)
    #[arg(long, value_name = "MS")]
    pub rtt: Option<u64>,
}

/// Run the tier command.
pub fn run(global: &GlobalArgs, args: TierArgs) -> Result<(), CliError> {
    let config = global.load_config()?;

    let signals = ConnectionSignals::new(
        args.downlink.or(config.network.downlink_mbps),
        args.rtt.or(config.network.rtt_ms),
    );
    let monitor = NetworkQualityMonitor::with_signals(config.network.online, signals);
    let current = monitor.current_tier();

    println!(
        "Downlink: {} Mbps, RTT: {} ms",
        monitor.signals().effective_downlink(),
        monitor.signals().effective_rtt()
    );
    println!(
        "Tier:     {}{}",
        style(current).bold(),
        if monitor.is_online() { "" } else { " (offline)" }
    );
    println!();

    for tier in QualityTier::ALL {
        let marker = if tier == current { "▶" } else { " " };
        println!(
            "{} {:<7} {}",
            marker,
            tier.as_str(),
            monitor.load_config_for(tier)
        );
    }

    Ok(())
}
