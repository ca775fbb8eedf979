//! Bluetooth UUIDs for the Nordic Thingy:52.
//!
//! All Thingy-specific UUIDs share the vendor base
//! `ef68xxxx-9b35-4933-9b10-52ffa9740042`, with the 16-bit slot selecting the
//! service or characteristic.

use uuid::{Uuid, uuid};

// --- Thingy Environment Service UUIDs ---

/// Environment service (temperature, pressure, humidity, gas, color).
pub const ENVIRONMENT_SERVICE: Uuid = uuid!("ef680200-9b35-4933-9b10-52ffa9740042");

/// Temperature characteristic. Notifies one unsigned byte: degrees Celsius x 10.
pub const TEMPERATURE: Uuid = uuid!("ef680201-9b35-4933-9b10-52ffa9740042");

/// Pressure characteristic.
pub const PRESSURE: Uuid = uuid!("ef680202-9b35-4933-9b10-52ffa9740042");

/// Humidity characteristic.
pub const HUMIDITY: Uuid = uuid!("ef680203-9b35-4933-9b10-52ffa9740042");

/// Gas (air quality) characteristic.
pub const GAS: Uuid = uuid!("ef680204-9b35-4933-9b10-52ffa9740042");

/// Color sensor characteristic.
pub const COLOR: Uuid = uuid!("ef680205-9b35-4933-9b10-52ffa9740042");

/// Environment configuration characteristic (sampling intervals).
pub const ENVIRONMENT_CONFIG: Uuid = uuid!("ef680206-9b35-4933-9b10-52ffa9740042");

// --- Standard BLE Service UUIDs ---

/// Generic Access Profile (GAP) service.
pub const GAP_SERVICE: Uuid = uuid!("00001800-0000-1000-8000-00805f9b34fb");

/// Device Information service.
pub const DEVICE_INFO_SERVICE: Uuid = uuid!("0000180a-0000-1000-8000-00805f9b34fb");

/// Battery service.
pub const BATTERY_SERVICE: Uuid = uuid!("0000180f-0000-1000-8000-00805f9b34fb");

// --- Standard Characteristic UUIDs ---

/// Device name characteristic.
pub const DEVICE_NAME: Uuid = uuid!("00002a00-0000-1000-8000-00805f9b34fb");

/// Model number string characteristic.
pub const MODEL_NUMBER: Uuid = uuid!("00002a24-0000-1000-8000-00805f9b34fb");

/// Firmware revision string characteristic.
pub const FIRMWARE_REVISION: Uuid = uuid!("00002a26-0000-1000-8000-00805f9b34fb");

/// Hardware revision string characteristic.
pub const HARDWARE_REVISION: Uuid = uuid!("00002a27-0000-1000-8000-00805f9b34fb");

/// Manufacturer name string characteristic.
pub const MANUFACTURER_NAME: Uuid = uuid!("00002a29-0000-1000-8000-00805f9b34fb");

/// Battery level characteristic.
pub const BATTERY_LEVEL: Uuid = uuid!("00002a19-0000-1000-8000-00805f9b34fb");
