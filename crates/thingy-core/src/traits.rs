//! Trait seam for temperature sensors.
//!
//! [`TemperatureSensor`] is implemented by the real BLE [`Device`](crate::Device)
//! and by [`MockThingy`](crate::MockThingy), so higher-level code and tests
//! can run against either.

use async_trait::async_trait;

use thingy_types::TemperatureReading;

use crate::error::Result;

/// Common interface for devices that produce temperature readings.
#[async_trait]
pub trait TemperatureSensor: Send + Sync {
    /// The device name, if known.
    fn name(&self) -> Option<&str>;

    /// The device address or identifier.
    fn address(&self) -> &str;

    /// Whether the device is currently connected.
    async fn is_connected(&self) -> bool;

    /// Read one temperature sample.
    async fn read_temperature(&self) -> Result<TemperatureReading>;

    /// Read the battery level (0-100).
    async fn read_battery(&self) -> Result<u8>;

    /// Disconnect from the device.
    async fn disconnect(&self) -> Result<()>;
}
