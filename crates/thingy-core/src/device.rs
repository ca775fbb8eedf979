//! Thingy device connection and communication.
//!
//! This module owns the BLE connection lifecycle: connect, service discovery,
//! characteristic lookup, notification subscription, and disconnect. All
//! connection state lives in explicit [`Device`] fields rather than
//! free-standing globals, so there is exactly one place that knows whether a
//! peripheral is held.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::{Adapter, Peripheral};
use futures::StreamExt;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::scan::{ScanOptions, find_device_with_options, find_first};
use crate::traits::TemperatureSensor;
use crate::util::{create_identifier, format_peripheral_id};
use thingy_types::TemperatureReading;
use thingy_types::uuid::{
    BATTERY_LEVEL, BATTERY_SERVICE, DEVICE_INFO_SERVICE, DEVICE_NAME, ENVIRONMENT_SERVICE,
    FIRMWARE_REVISION, GAP_SERVICE, HARDWARE_REVISION, MANUFACTURER_NAME, MODEL_NUMBER,
    TEMPERATURE,
};

/// Default timeout for establishing a BLE connection.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for service discovery after connection.
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for BLE characteristic reads and the first notification.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for enabling notifications on a characteristic.
const DEFAULT_SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for BLE connection timeouts.
///
/// Every asynchronous step of the connect sequence is bounded so that an
/// unresponsive peripheral cannot leave the caller waiting forever.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use thingy_core::device::ConnectionConfig;
///
/// let config = ConnectionConfig::default()
///     .connection_timeout(Duration::from_secs(20))
///     .read_timeout(Duration::from_secs(15));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Timeout for establishing a BLE connection.
    pub connection_timeout: Duration,
    /// Timeout for service discovery after connection.
    pub discovery_timeout: Duration,
    /// Timeout for characteristic reads and awaiting a first notification.
    pub read_timeout: Duration,
    /// Timeout for enabling/disabling notifications.
    pub subscribe_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECT_TIMEOUT,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            subscribe_timeout: DEFAULT_SUBSCRIBE_TIMEOUT,
        }
    }
}

impl ConnectionConfig {
    /// Create a new connection config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set the service discovery timeout.
    #[must_use]
    pub fn discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the subscribe timeout.
    #[must_use]
    pub fn subscribe_timeout(mut self, timeout: Duration) -> Self {
        self.subscribe_timeout = timeout;
        self
    }
}

/// Basic identity read from the standard Device Information service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device name.
    pub name: String,
    /// Model number string.
    pub model: String,
    /// Firmware revision string.
    pub firmware: String,
    /// Hardware revision string.
    pub hardware: String,
    /// Manufacturer name string.
    pub manufacturer: String,
}

/// A connected Thingy device.
///
/// # Note on Clone
///
/// This struct intentionally does not implement `Clone`. A `Device`
/// represents an active BLE connection with associated state; cloning would
/// make connection ownership ambiguous. To share across tasks, wrap it in
/// `Arc<Device>`.
///
/// # Cleanup
///
/// Call [`Device::disconnect`] before dropping the device to release BLE
/// resources. Dropping without disconnecting logs a warning and performs a
/// best-effort cleanup.
pub struct Device {
    /// Kept alive for the lifetime of the peripheral connection; the
    /// peripheral holds internal references to the adapter.
    #[allow(dead_code)]
    adapter: Adapter,
    /// The underlying BLE peripheral.
    peripheral: Peripheral,
    /// Cached device name.
    name: Option<String>,
    /// Device address or identifier (MAC on Linux/Windows, UUID on macOS).
    address: String,
    /// Cache of discovered characteristics by UUID for O(1) lookup.
    characteristics_cache: RwLock<HashMap<Uuid, Characteristic>>,
    /// Handles for spawned notification tasks (for cleanup).
    notification_handles: tokio::sync::Mutex<Vec<tokio::task::JoinHandle<()>>>,
    /// Whether disconnect has been called (for the Drop warning).
    disconnected: AtomicBool,
    /// Connection configuration (timeouts).
    config: ConnectionConfig,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Connect to a Thingy by name fragment or address.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use thingy_core::Device;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let device = Device::connect("Thingy").await?;
    ///     println!("Connected to {:?}", device);
    ///     Ok(())
    /// }
    /// ```
    #[tracing::instrument(level = "info", skip_all, fields(identifier = %identifier))]
    pub async fn connect(identifier: &str) -> Result<Self> {
        Self::connect_with_config(identifier, ConnectionConfig::default()).await
    }

    /// Connect to a Thingy by identifier with custom timeouts.
    #[tracing::instrument(level = "info", skip_all, fields(identifier = %identifier))]
    pub async fn connect_with_config(identifier: &str, config: ConnectionConfig) -> Result<Self> {
        let (adapter, peripheral) =
            find_device_with_options(identifier, ScanOptions::default()).await?;
        Self::from_peripheral_with_config(adapter, peripheral, config).await
    }

    /// Connect to the first Thingy advertising the environment service.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn connect_any() -> Result<Self> {
        Self::connect_any_with_config(ConnectionConfig::default()).await
    }

    /// Connect to the first Thingy in range with custom timeouts.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn connect_any_with_config(config: ConnectionConfig) -> Result<Self> {
        let (adapter, peripheral) = find_first(ScanOptions::default()).await?;
        Self::from_peripheral_with_config(adapter, peripheral, config).await
    }

    /// Create a Device from an already-discovered peripheral.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn from_peripheral(adapter: Adapter, peripheral: Peripheral) -> Result<Self> {
        Self::from_peripheral_with_config(adapter, peripheral, ConnectionConfig::default()).await
    }

    /// Create a Device from an already-discovered peripheral with full
    /// configuration.
    #[tracing::instrument(level = "info", skip_all, fields(connect_timeout = ?config.connection_timeout))]
    pub async fn from_peripheral_with_config(
        adapter: Adapter,
        peripheral: Peripheral,
        config: ConnectionConfig,
    ) -> Result<Self> {
        info!("Connecting to device...");
        timeout(config.connection_timeout, peripheral.connect())
            .await
            .map_err(|_| Error::timeout("connect to device", config.connection_timeout))??;
        info!("Connected!");

        info!("Discovering services...");
        timeout(config.discovery_timeout, peripheral.discover_services())
            .await
            .map_err(|_| Error::timeout("discover services", config.discovery_timeout))??;

        let services = peripheral.services();
        debug!("Found {} services", services.len());

        // Characteristic cache so per-operation lookups don't walk services
        let mut characteristics_cache = HashMap::new();
        for service in &services {
            debug!("  Service: {}", service.uuid);
            for characteristic in &service.characteristics {
                debug!("    Characteristic: {}", characteristic.uuid);
                characteristics_cache.insert(characteristic.uuid, characteristic.clone());
            }
        }

        let properties = peripheral.properties().await?;
        let name = properties.as_ref().and_then(|p| p.local_name.clone());
        let address = properties
            .as_ref()
            .map(|p| create_identifier(&p.address.to_string(), &peripheral.id()))
            .unwrap_or_else(|| format_peripheral_id(&peripheral.id()));

        Ok(Self {
            adapter,
            peripheral,
            name,
            address,
            characteristics_cache: RwLock::new(characteristics_cache),
            notification_handles: tokio::sync::Mutex::new(Vec::new()),
            disconnected: AtomicBool::new(false),
            config,
        })
    }

    /// Check if the device is connected (queries BLE stack state).
    pub async fn is_connected(&self) -> bool {
        self.peripheral.is_connected().await.unwrap_or(false)
    }

    /// Get the current connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Disconnect from the device.
    ///
    /// Aborts active notification handlers, then disconnects the peripheral.
    #[tracing::instrument(level = "info", skip(self), fields(device_name = ?self.name))]
    pub async fn disconnect(&self) -> Result<()> {
        info!("Disconnecting from device...");
        self.disconnected.store(true, Ordering::SeqCst);

        {
            let mut handles = self.notification_handles.lock().await;
            for handle in handles.drain(..) {
                handle.abort();
            }
        }

        self.peripheral.disconnect().await?;
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the device address or identifier.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Read the current RSSI (signal strength) in dBm.
    pub async fn read_rssi(&self) -> Result<i16> {
        let properties = self.peripheral.properties().await?;
        properties
            .and_then(|p| p.rssi)
            .ok_or_else(|| Error::InvalidData("RSSI not available".to_string()))
    }

    /// Find a characteristic by UUID using the cached lookup table.
    ///
    /// Falls back to walking the services if the cache is empty, which should
    /// not happen after a successful discovery.
    async fn find_characteristic(&self, uuid: Uuid) -> Result<Characteristic> {
        {
            let cache = self.characteristics_cache.read().await;
            if let Some(characteristic) = cache.get(&uuid) {
                return Ok(characteristic.clone());
            }

            if !cache.is_empty() {
                return Err(Error::characteristic_not_found(
                    uuid.to_string(),
                    self.peripheral.services().len(),
                ));
            }
        }

        warn!(
            "Characteristics cache empty, falling back to service search for {}",
            uuid
        );
        let services = self.peripheral.services();
        let service_count = services.len();

        // Environment service first, then the standard services, then the rest
        let priority = [
            ENVIRONMENT_SERVICE,
            GAP_SERVICE,
            DEVICE_INFO_SERVICE,
            BATTERY_SERVICE,
        ];
        for wanted in priority {
            for service in &services {
                if service.uuid != wanted {
                    continue;
                }
                for characteristic in &service.characteristics {
                    if characteristic.uuid == uuid {
                        return Ok(characteristic.clone());
                    }
                }
            }
        }

        for service in &services {
            for characteristic in &service.characteristics {
                if characteristic.uuid == uuid {
                    return Ok(characteristic.clone());
                }
            }
        }

        Err(Error::characteristic_not_found(
            uuid.to_string(),
            service_count,
        ))
    }

    /// Read a characteristic value by UUID, bounded by the read timeout.
    pub async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>> {
        let characteristic = self.find_characteristic(uuid).await?;
        let data = timeout(
            self.config.read_timeout,
            self.peripheral.read(&characteristic),
        )
        .await
        .map_err(|_| Error::timeout(format!("read characteristic {}", uuid), self.config.read_timeout))??;
        Ok(data)
    }

    /// Read one temperature sample.
    ///
    /// The temperature characteristic is notify-only, so this subscribes,
    /// waits for the first notification (bounded by the read timeout),
    /// and unsubscribes again.
    #[tracing::instrument(level = "debug", skip(self), fields(device_name = ?self.name))]
    pub async fn read_temperature(&self) -> Result<TemperatureReading> {
        let characteristic = self.find_characteristic(TEMPERATURE).await?;

        timeout(
            self.config.subscribe_timeout,
            self.peripheral.subscribe(&characteristic),
        )
        .await
        .map_err(|_| Error::timeout("enable temperature notifications", self.config.subscribe_timeout))??;

        let mut stream = self.peripheral.notifications().await?;
        let outcome = timeout(self.config.read_timeout, async {
            while let Some(notification) = stream.next().await {
                if notification.uuid == TEMPERATURE {
                    return TemperatureReading::from_bytes(&notification.value)
                        .map_err(Error::from);
                }
            }
            // Notification source ended before a sample arrived
            Err(Error::NotConnected)
        })
        .await;

        self.peripheral.unsubscribe(&characteristic).await.ok();

        match outcome {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(
                "await temperature notification",
                self.config.read_timeout,
            )),
        }
    }

    /// Read the battery level (0-100).
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn read_battery(&self) -> Result<u8> {
        let data = self.read_characteristic(BATTERY_LEVEL).await?;
        if data.is_empty() {
            return Err(Error::InvalidData("Empty battery data".to_string()));
        }
        Ok(data[0])
    }

    /// Read device identity from the Device Information service.
    ///
    /// All characteristics are read in parallel; individual missing
    /// characteristics degrade to empty strings rather than failing the call.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn read_device_info(&self) -> Result<DeviceInfo> {
        fn read_string(data: Vec<u8>) -> String {
            String::from_utf8(data)
                .unwrap_or_default()
                .trim_end_matches('\0')
                .to_string()
        }

        let (name_result, model_result, firmware_result, hardware_result, manufacturer_result) = tokio::join!(
            self.read_characteristic(DEVICE_NAME),
            self.read_characteristic(MODEL_NUMBER),
            self.read_characteristic(FIRMWARE_REVISION),
            self.read_characteristic(HARDWARE_REVISION),
            self.read_characteristic(MANUFACTURER_NAME),
        );

        let name = name_result
            .map(read_string)
            .unwrap_or_else(|_| self.name.clone().unwrap_or_default());

        Ok(DeviceInfo {
            name,
            model: model_result.map(read_string).unwrap_or_default(),
            firmware: firmware_result.map(read_string).unwrap_or_default(),
            hardware: hardware_result.map(read_string).unwrap_or_default(),
            manufacturer: manufacturer_result.map(read_string).unwrap_or_default(),
        })
    }

    /// Subscribe to notifications on a characteristic.
    ///
    /// The callback is invoked with the payload of each notification. The
    /// forwarding task is tracked and aborted by [`disconnect`](Self::disconnect).
    pub async fn subscribe_to_notifications<F>(&self, uuid: Uuid, callback: F) -> Result<()>
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        let characteristic = self.find_characteristic(uuid).await?;

        timeout(
            self.config.subscribe_timeout,
            self.peripheral.subscribe(&characteristic),
        )
        .await
        .map_err(|_| Error::timeout(format!("subscribe to {}", uuid), self.config.subscribe_timeout))??;

        let mut stream = self.peripheral.notifications().await?;
        let char_uuid = characteristic.uuid;

        let handle = tokio::spawn(async move {
            while let Some(notification) = stream.next().await {
                if notification.uuid == char_uuid {
                    callback(&notification.value);
                }
            }
        });

        self.notification_handles.lock().await.push(handle);

        Ok(())
    }

    /// Unsubscribe from notifications on a characteristic.
    pub async fn unsubscribe_from_notifications(&self, uuid: Uuid) -> Result<()> {
        let characteristic = self.find_characteristic(uuid).await?;
        self.peripheral.unsubscribe(&characteristic).await?;
        Ok(())
    }

    /// Number of cached characteristics (for diagnostics and tests).
    pub async fn cached_characteristic_count(&self) -> usize {
        self.characteristics_cache.read().await.len()
    }
}

// Drop performs best-effort cleanup if disconnect() was not called. The
// peripheral disconnect is spawned and may not complete during shutdown;
// callers that care should disconnect explicitly.
impl Drop for Device {
    fn drop(&mut self) {
        if !self.disconnected.load(Ordering::SeqCst) {
            self.disconnected.store(true, Ordering::SeqCst);

            warn!(
                device_name = ?self.name,
                device_address = %self.address,
                "Device dropped without calling disconnect() - performing best-effort cleanup"
            );

            if let Ok(mut handles) = self.notification_handles.try_lock() {
                for handle in handles.drain(..) {
                    handle.abort();
                }
            }

            let peripheral = self.peripheral.clone();
            let address = self.address.clone();
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = peripheral.disconnect().await {
                        debug!(
                            device_address = %address,
                            error = %e,
                            "Best-effort disconnect failed (device may already be disconnected)"
                        );
                    }
                });
            }
        }
    }
}

#[async_trait]
impl TemperatureSensor for Device {
    fn name(&self) -> Option<&str> {
        Device::name(self)
    }

    fn address(&self) -> &str {
        Device::address(self)
    }

    async fn is_connected(&self) -> bool {
        Device::is_connected(self).await
    }

    async fn read_temperature(&self) -> Result<TemperatureReading> {
        Device::read_temperature(self).await
    }

    async fn read_battery(&self) -> Result<u8> {
        Device::read_battery(self).await
    }

    async fn disconnect(&self) -> Result<()> {
        Device::disconnect(self).await
    }
}
