//! Platform-agnostic types for the Nordic Thingy:52 temperature monitor.
//!
//! This crate contains the pieces of the Thingy:52 BLE contract that do not
//! depend on any Bluetooth stack: the service/characteristic UUIDs and the
//! decoded temperature reading with its wire format.
//!
//! # Wire Format
//!
//! The Thingy:52 temperature characteristic notifies with a payload whose
//! first byte is the temperature in tenths of a degree Celsius:
//!
//! ```
//! use thingy_types::TemperatureReading;
//!
//! let reading = TemperatureReading::from_bytes(&[235]).unwrap();
//! assert_eq!(reading.celsius(), 23.5);
//! assert_eq!(reading.to_string(), "23.5");
//! ```

pub mod error;
pub mod types;
pub mod uuid;

pub use error::ParseError;
pub use types::{MIN_TEMPERATURE_BYTES, TemperatureReading};
