//! Mock sensor implementation for testing.
//!
//! [`MockThingy`] implements [`TemperatureSensor`] without any BLE hardware.
//! Tests can set the raw temperature, inject failures, and simulate read
//! latency.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use thingy_types::TemperatureReading;

use crate::error::{DeviceNotFoundReason, Error, Result};
use crate::traits::TemperatureSensor;

/// A mock Thingy device for testing.
///
/// # Example
///
/// ```
/// use thingy_core::{MockThingy, TemperatureSensor};
///
/// #[tokio::main]
/// async fn main() {
///     let device = MockThingy::new("Thingy");
///     device.connect().await.unwrap();
///     device.set_raw_temperature(235);
///
///     let reading = device.read_temperature().await.unwrap();
///     assert_eq!(reading.celsius(), 23.5);
/// }
/// ```
pub struct MockThingy {
    name: String,
    address: String,
    connected: AtomicBool,
    raw_temperature: AtomicU8,
    battery: AtomicU8,
    read_count: AtomicU32,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    /// Simulated read latency in milliseconds (0 = no delay).
    read_latency_ms: AtomicU64,
    /// Number of operations to fail before succeeding again.
    remaining_failures: AtomicU32,
}

impl std::fmt::Debug for MockThingy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockThingy")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("connected", &self.connected.load(Ordering::Relaxed))
            .finish()
    }
}

impl MockThingy {
    /// Create a new mock device with default values.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            address: format!("MOCK-{:06X}", rand::random::<u32>() % 0xFFFFFF),
            connected: AtomicBool::new(false),
            raw_temperature: AtomicU8::new(225),
            battery: AtomicU8::new(85),
            read_count: AtomicU32::new(0),
            should_fail: AtomicBool::new(false),
            fail_message: RwLock::new("Mock failure".to_string()),
            read_latency_ms: AtomicU64::new(0),
            remaining_failures: AtomicU32::new(0),
        }
    }

    /// Connect to the mock device.
    pub async fn connect(&self) -> Result<()> {
        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::DeviceNotFound(DeviceNotFoundReason::NotFound {
                identifier: self.name.clone(),
            }));
        }

        if self.should_fail.load(Ordering::Relaxed) {
            return Err(Error::DeviceNotFound(DeviceNotFoundReason::NotFound {
                identifier: self.name.clone(),
            }));
        }

        self.connected.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn check_connected(&self) -> Result<()> {
        if !self.connected.load(Ordering::Relaxed) {
            Err(Error::NotConnected)
        } else {
            Ok(())
        }
    }

    async fn check_should_fail(&self) -> Result<()> {
        let latency = self.read_latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::InvalidData(self.fail_message.read().await.clone()));
        }

        if self.should_fail.load(Ordering::Relaxed) {
            Err(Error::InvalidData(self.fail_message.read().await.clone()))
        } else {
            Ok(())
        }
    }

    // --- Test control methods ---

    /// Set the raw temperature byte (degrees Celsius x 10).
    pub fn set_raw_temperature(&self, raw: u8) {
        self.raw_temperature.store(raw, Ordering::Relaxed);
    }

    /// Set the battery level.
    pub fn set_battery(&self, level: u8) {
        self.battery.store(level, Ordering::Relaxed);
    }

    /// Make the device fail on every operation.
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Fail the next `count` operations, then succeed again.
    pub fn fail_times(&self, count: u32) {
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Simulate read latency.
    pub fn set_read_latency(&self, latency: Duration) {
        self.read_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of successful temperature reads performed.
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TemperatureSensor for MockThingy {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn read_temperature(&self) -> Result<TemperatureReading> {
        self.check_connected()?;
        self.check_should_fail().await?;

        self.read_count.fetch_add(1, Ordering::Relaxed);
        Ok(TemperatureReading::from_raw(
            self.raw_temperature.load(Ordering::Relaxed),
        ))
    }

    async fn read_battery(&self) -> Result<u8> {
        self.check_connected()?;
        self.check_should_fail().await?;
        Ok(self.battery.load(Ordering::Relaxed))
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::Relaxed);
        Ok(())
    }
}
