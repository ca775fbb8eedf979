//! Info command implementation.

use anyhow::{Context, Result};

use crate::commands::connect_target;

pub async fn cmd_info(device: Option<String>, quiet: bool) -> Result<()> {
    if !quiet {
        eprintln!("Reading device information...");
    }

    let device = connect_target(device.as_deref())
        .await
        .context("Failed to connect to device")?;

    let info = device
        .read_device_info()
        .await
        .context("Failed to read device information");

    // Battery and RSSI are best-effort extras
    let battery = device.read_battery().await.ok();
    let rssi = device.read_rssi().await.ok();

    device.disconnect().await.ok();

    let info = info?;
    println!("Name:         {}", info.name);
    println!("Model:        {}", info.model);
    println!("Firmware:     {}", info.firmware);
    println!("Hardware:     {}", info.hardware);
    println!("Manufacturer: {}", info.manufacturer);
    if let Some(battery) = battery {
        println!("Battery:      {}%", battery);
    }
    if let Some(rssi) = rssi {
        println!("Signal:       {} dBm", rssi);
    }

    Ok(())
}
