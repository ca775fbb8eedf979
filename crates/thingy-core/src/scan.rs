//! Device discovery and scanning.
//!
//! A Thingy:52 advertises its environment service UUID, which is how the
//! scanner recognizes one without connecting. Devices can be located either
//! by an explicit identifier (name fragment or address) or by taking the
//! first advertising Thingy in range.

use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{DeviceNotFoundReason, Error, Result};
use crate::util::{create_identifier, format_peripheral_id};
use thingy_types::uuid::ENVIRONMENT_SERVICE;

/// Information about a discovered Thingy device.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// The advertised device name (e.g. "Thingy").
    pub name: Option<String>,
    /// The peripheral ID for connecting.
    pub id: PeripheralId,
    /// The BLE address as a string (zeros on macOS, use `identifier` instead).
    pub address: String,
    /// A connection identifier (peripheral ID on macOS, address elsewhere).
    pub identifier: String,
    /// RSSI signal strength in dBm.
    pub rssi: Option<i16>,
    /// Whether the peripheral advertises the Thingy environment service.
    pub is_thingy: bool,
}

/// Options for scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How long to scan for devices.
    pub duration: Duration,
    /// Only return devices that appear to be Thingy devices.
    pub filter_thingy_only: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5),
            filter_thingy_only: true,
        }
    }
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the scan duration in seconds.
    #[must_use]
    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration = Duration::from_secs(secs);
        self
    }

    /// Set whether to filter for Thingy devices only.
    #[must_use]
    pub fn filter_thingy_only(mut self, filter: bool) -> Self {
        self.filter_thingy_only = filter;
        self
    }

    /// Scan for all BLE devices, not just Thingys.
    #[must_use]
    pub fn all_devices(self) -> Self {
        self.filter_thingy_only(false)
    }
}

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters
        .into_iter()
        .next()
        .ok_or(Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter))
}

/// Scan for Thingy devices in range.
///
/// Returns a list of discovered devices, or an error if the scan failed.
/// An empty list means no devices were found (not an error).
pub async fn scan_for_devices() -> Result<Vec<DiscoveredDevice>> {
    scan_with_options(ScanOptions::default()).await
}

/// Scan for devices with custom options.
pub async fn scan_with_options(options: ScanOptions) -> Result<Vec<DiscoveredDevice>> {
    let adapter = get_adapter().await?;
    scan_with_adapter(&adapter, options).await
}

/// Scan for devices using a specific adapter.
pub async fn scan_with_adapter(
    adapter: &Adapter,
    options: ScanOptions,
) -> Result<Vec<DiscoveredDevice>> {
    info!(
        "Starting BLE scan for {} seconds...",
        options.duration.as_secs()
    );

    adapter.start_scan(ScanFilter::default()).await?;
    sleep(options.duration).await;
    adapter.stop_scan().await?;

    let peripherals = adapter.peripherals().await?;
    let mut discovered = Vec::new();

    for peripheral in peripherals {
        match process_peripheral(&peripheral, options.filter_thingy_only).await {
            Ok(Some(device)) => {
                info!("Found Thingy device: {:?}", device.name);
                discovered.push(device);
            }
            Ok(None) => {
                // Not a Thingy or filtered out
            }
            Err(e) => {
                debug!("Error processing peripheral: {}", e);
            }
        }
    }

    info!("Scan complete. Found {} device(s)", discovered.len());
    Ok(discovered)
}

/// Process a peripheral and determine if it's a Thingy device.
async fn process_peripheral(
    peripheral: &Peripheral,
    filter_thingy_only: bool,
) -> Result<Option<DiscoveredDevice>> {
    let properties = match peripheral.properties().await? {
        Some(p) => p,
        None => return Ok(None),
    };

    let id = peripheral.id();
    let address = properties.address.to_string();
    let name = properties.local_name.clone();
    let rssi = properties.rssi;

    let is_thingy = is_thingy_device(&properties);

    if filter_thingy_only && !is_thingy {
        return Ok(None);
    }

    let identifier = create_identifier(&address, &id);

    Ok(Some(DiscoveredDevice {
        name,
        id,
        address,
        identifier,
        rssi,
        is_thingy,
    }))
}

/// Check if a peripheral is a Thingy based on its advertisement.
fn is_thingy_device(properties: &btleplug::api::PeripheralProperties) -> bool {
    // The environment service UUID in the advertisement is authoritative
    if properties.services.contains(&ENVIRONMENT_SERVICE) {
        return true;
    }

    if properties.service_data.contains_key(&ENVIRONMENT_SERVICE) {
        return true;
    }

    // Fall back to the default device name
    if let Some(name) = &properties.local_name {
        if name.to_lowercase().contains("thingy") {
            return true;
        }
    }

    false
}

/// Find a specific device by name or address.
pub async fn find_device(identifier: &str) -> Result<(Adapter, Peripheral)> {
    find_device_with_options(identifier, ScanOptions::default()).await
}

/// Find a specific device by name or address with custom options.
///
/// Checks already-known peripherals first (cached from previous scans), then
/// performs up to 3 scan attempts with growing durations. BLE advertisements
/// can be missed on any single scan, so one attempt is not enough to conclude
/// the device is absent.
pub async fn find_device_with_options(
    identifier: &str,
    options: ScanOptions,
) -> Result<(Adapter, Peripheral)> {
    let adapter = get_adapter().await?;
    let identifier_lower = identifier.to_lowercase();

    info!("Looking for device: {}", identifier);

    if let Some(peripheral) = find_peripheral_by_identifier(&adapter, &identifier_lower).await? {
        info!("Found device in cache (no scan needed)");
        return Ok((adapter, peripheral));
    }

    run_scan_attempts(&adapter, &options, || {
        let adapter = adapter.clone();
        let identifier_lower = identifier_lower.clone();
        async move { find_peripheral_by_identifier(&adapter, &identifier_lower).await }
    })
    .await
    .and_then(|found| found.ok_or_else(|| Error::device_not_found(identifier)))
    .map(|peripheral| (adapter.clone(), peripheral))
}

/// Find the first Thingy in range, without a target identifier.
///
/// This mirrors requesting "any device advertising the environment service":
/// the first advertising Thingy wins.
pub async fn find_first(options: ScanOptions) -> Result<(Adapter, Peripheral)> {
    let adapter = get_adapter().await?;

    info!("Looking for any Thingy in range");

    if let Some(peripheral) = find_thingy_peripheral(&adapter).await? {
        info!("Found Thingy in cache (no scan needed)");
        return Ok((adapter, peripheral));
    }

    run_scan_attempts(&adapter, &options, || {
        let adapter = adapter.clone();
        async move { find_thingy_peripheral(&adapter).await }
    })
    .await
    .and_then(|found| {
        found.ok_or(Error::DeviceNotFound(DeviceNotFoundReason::NoDevicesInRange))
    })
    .map(|peripheral| (adapter.clone(), peripheral))
}

/// Run up to 3 scan attempts with growing durations, probing with `check`
/// after each attempt.
async fn run_scan_attempts<F, Fut>(
    adapter: &Adapter,
    options: &ScanOptions,
    mut check: F,
) -> Result<Option<Peripheral>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<Peripheral>>>,
{
    let max_attempts: u32 = 3;
    let base_duration = options.duration.as_millis() as u64 / 2;
    let base_duration = Duration::from_millis(base_duration.max(2000));

    for attempt in 1..=max_attempts {
        let scan_duration = base_duration * attempt;
        info!(
            "Scan attempt {}/{} ({}s)...",
            attempt,
            max_attempts,
            scan_duration.as_secs()
        );

        adapter.start_scan(ScanFilter::default()).await?;
        sleep(scan_duration).await;
        adapter.stop_scan().await?;

        if let Some(peripheral) = check().await? {
            info!("Found device on attempt {}", attempt);
            return Ok(Some(peripheral));
        }

        if attempt < max_attempts {
            warn!("Device not found, retrying...");
        }
    }

    warn!("Device not found after {} attempts", max_attempts);
    Ok(None)
}

/// Search known peripherals for one matching the identifier.
async fn find_peripheral_by_identifier(
    adapter: &Adapter,
    identifier_lower: &str,
) -> Result<Option<Peripheral>> {
    let peripherals = adapter.peripherals().await?;

    for peripheral in peripherals {
        if let Ok(Some(props)) = peripheral.properties().await {
            let address = props.address.to_string().to_lowercase();
            let peripheral_id = format_peripheral_id(&peripheral.id()).to_lowercase();

            // Peripheral ID match (macOS uses UUIDs)
            if peripheral_id.contains(identifier_lower) {
                debug!("Matched by peripheral ID: {}", peripheral_id);
                return Ok(Some(peripheral));
            }

            // Address match (Linux/Windows use MAC addresses)
            if address != "00:00:00:00:00:00"
                && (address == identifier_lower
                    || address.replace(':', "") == identifier_lower.replace(':', ""))
            {
                debug!("Matched by address: {}", address);
                return Ok(Some(peripheral));
            }

            // Name match (partial match supported)
            if let Some(name) = &props.local_name
                && name.to_lowercase().contains(identifier_lower)
            {
                debug!("Matched by name: {}", name);
                return Ok(Some(peripheral));
            }
        }
    }

    Ok(None)
}

/// Search known peripherals for any Thingy.
async fn find_thingy_peripheral(adapter: &Adapter) -> Result<Option<Peripheral>> {
    let peripherals = adapter.peripherals().await?;

    for peripheral in peripherals {
        if let Ok(Some(props)) = peripheral.properties().await
            && is_thingy_device(&props)
        {
            debug!("Matched Thingy: {:?}", props.local_name);
            return Ok(Some(peripheral));
        }
    }

    Ok(None)
}
