//! Discover command implementation.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use onvif_scout_core::{discover, DiscoveryDevice};

use crate::cli::DiscoverArgs;
use crate::error::CliError;
use crate::output::{get_formatter, OutputFormatter};

/// Run the discover command
pub async fn run_discover(args: DiscoverArgs, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    println!("Probing for ONVIF devices for {} seconds...", args.timeout);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let devices = discover(Duration::from_secs(args.timeout), cancel.clone()).await?;

    if cancel.is_cancelled() {
        println!("{}", formatter.format_message("Discovery cancelled"));
        return Ok(());
    }

    let devices = filter_devices(devices, args.filter_type.as_deref());

    println!("{}", formatter.format_devices(&devices));

    if devices.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    Ok(())
}

fn filter_devices(devices: Vec<DiscoveryDevice>, filter: Option<&str>) -> Vec<DiscoveryDevice> {
    match filter {
        Some(pattern) => devices
            .into_iter()
            .filter(|d| d.types.iter().any(|t| t.contains(pattern)))
            .collect(),
        None => devices,
    }
}
