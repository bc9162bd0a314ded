//! usbdev
//!
//! Waits for a USB device to be plugged in and prints its vendor and
//! product names.

use anyhow::{Context, Result};
use clap::Parser;
use common::setup_logging;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use usbdev::config::{OutputFormat, Overrides, UsbdevConfig};
use usbdev::report::{resolve_devices, write_device_list, write_found};
use usbdev::usb::RusbSource;
use usbdev::watch;

#[derive(Parser, Debug)]
#[command(name = "usbdev")]
#[command(
    author,
    version,
    about = "USBdev - recognition of newly plugged USB devices",
    disable_version_flag = true
)]
#[command(long_about = "
Recognition of newly plugged USB devices.

Snapshots the attached USB devices, waits, and snapshots again until a new
device shows up or the poll limit is reached, then looks up its vendor and
product names in the usb.ids database.

EXAMPLES:
    # Wait for a device, polling every second
    usbdev

    # Poll every 3 seconds
    usbdev --time 3

    # List attached devices with their names and exit
    usbdev --list

    # Machine-readable output
    usbdev --format json

CONFIGURATION:
    usbdev looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/usbdev/config.toml
    3. /etc/usbdev/config.toml
    4. Built-in defaults

DATABASE:
    Unless --database or [database].path is set, usb.ids is searched in
    /var/lib/usbdev, /usr/share/hwdata, /usr/share/misc and /usr/share.
")]
struct Args {
    /// Waiting time in seconds between device snapshots
    #[arg(short, long, value_name = "SEC", value_parser = clap::value_parser!(u64).range(1..))]
    time: Option<u64>,

    /// Give up after this many polls
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_polls: Option<u32>,

    /// Path to the usb.ids database
    #[arg(short, long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// List attached USB devices and exit
    #[arg(long)]
    list: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print program version and exit
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            interval_secs: self.time,
            max_polls: self.max_polls,
            database_path: self.database.clone(),
            format: self.format,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.save_config {
        let config = UsbdevConfig::default();
        let path = UsbdevConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let mut config = if let Some(ref path) = args.config {
        UsbdevConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        UsbdevConfig::load_or_default().context("Failed to load configuration")?
    };

    // Command line wins over the config file
    config.apply_overrides(args.overrides());
    config.validate().context("Invalid configuration")?;

    setup_logging(&config.output.log_level).context("Failed to setup logging")?;

    info!("usbdev v{}", env!("CARGO_PKG_VERSION"));

    let source = Arc::new(RusbSource::new().context("Failed to initialize USB context")?);

    if args.list {
        return list_devices_mode(&source, &config);
    }

    // Keep stdout clean for the JSON document
    let mut progress: Box<dyn Write> = match config.output.format {
        OutputFormat::Text => Box::new(std::io::stdout()),
        OutputFormat::Json => Box::new(std::io::stderr()),
    };

    let outcome = watch(
        Arc::clone(&source),
        config.watch_options(),
        &mut *progress,
        shutdown_signal(),
    )
    .await
    .context("Failed to watch USB devices")?;
    writeln!(progress)?;

    let devices = resolve_devices(&config.database_candidates(), outcome.added);
    write_found(&mut std::io::stdout().lock(), config.output.format, &devices)
        .context("Failed to write report")?;

    Ok(())
}

/// List USB devices and exit
fn list_devices_mode(source: &RusbSource, config: &UsbdevConfig) -> Result<()> {
    info!("Listing USB devices...");

    let devices = source.list_devices().context("Failed to list USB devices")?;
    let names = resolve_devices(
        &config.database_candidates(),
        devices.iter().map(|d| d.id).collect(),
    );

    write_device_list(
        &mut std::io::stdout().lock(),
        config.output.format,
        &devices,
        &names,
    )
    .context("Failed to write device list")?;

    Ok(())
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, stopping"),
        Err(e) => {
            // Without a handler there is nothing to wait for
            error!("Error waiting for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
