//! Watch command implementation.
//!
//! Subscribes to temperature notifications and prints one line per reading
//! until Ctrl+C or the requested count is reached. Unlike polling designs,
//! the cadence here is the device's own notification rate.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;
use time::UtcOffset;

use thingy_core::{StreamOptions, TemperatureStream};
use thingy_types::TemperatureReading;

use crate::commands::connect_target;
use crate::format::format_watch_line;

pub async fn cmd_watch(device: Option<String>, count: u32, no_color: bool) -> Result<()> {
    let device = Arc::new(
        connect_target(device.as_deref())
            .await
            .context("Failed to connect to device")?,
    );

    let device_name = device.name().unwrap_or("Thingy").to_string();
    eprintln!("Watching: {} ({})", device_name, device.address());
    if count > 0 {
        eprintln!("Count: {} | Press Ctrl+C to stop", count);
    } else {
        eprintln!("Press Ctrl+C to stop");
    }
    eprintln!("{}", "-".repeat(50));

    // Resolve the local offset once; the watch loop is multithreaded
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let mut stream = TemperatureStream::subscribe(Arc::clone(&device), StreamOptions::default())
        .await
        .context("Failed to subscribe to temperature notifications")?;

    let mut readings_taken: u32 = 0;
    let mut previous: Option<TemperatureReading> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                break;
            }
            item = stream.next() => {
                match item {
                    Some(Ok(reading)) => {
                        readings_taken += 1;
                        print!("{}", format_watch_line(&reading, previous.as_ref(), offset, no_color));
                        previous = Some(reading);

                        if count > 0 && readings_taken >= count {
                            eprintln!("Completed {} readings.", readings_taken);
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        eprintln!("Bad notification: {}", e);
                    }
                    None => {
                        eprintln!("Device disconnected.");
                        break;
                    }
                }
            }
        }
    }

    stream.close().await.ok();
    device.disconnect().await.ok();
    Ok(())
}
