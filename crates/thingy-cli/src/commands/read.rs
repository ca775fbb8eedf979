//! Read command implementation.
//!
//! The temperature characteristic is notify-only, so a "read" connects,
//! waits for the next notification, prints it, and disconnects.

use anyhow::{Context, Result};

use crate::cli::OutputFormat;
use crate::commands::connect_target;
use crate::format::{format_reading_json, format_temperature_label};

pub async fn cmd_read(device: Option<String>, format: OutputFormat, quiet: bool) -> Result<()> {
    if !quiet {
        match device.as_deref() {
            Some(id) => eprintln!("Connecting to {}...", id),
            None => eprintln!("Connecting to the first Thingy in range..."),
        }
    }

    let device = connect_target(device.as_deref())
        .await
        .context("Failed to connect to device")?;

    let result = device
        .read_temperature()
        .await
        .context("Failed to read temperature");

    // Disconnect before reporting, so a read error still releases the device
    device.disconnect().await.ok();

    let reading = result?;
    match format {
        OutputFormat::Json => println!("{}", format_reading_json(&reading)?),
        OutputFormat::Text => println!("{}", format_temperature_label(&reading)),
    }

    Ok(())
}
