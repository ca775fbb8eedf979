//! Core BLE library for the Nordic Thingy:52 temperature monitor.
//!
//! This crate provides Bluetooth Low Energy communication with a Thingy:52:
//! device discovery, connection management, temperature notification
//! streaming, and a bounded series for charting.
//!
//! # Features
//!
//! - **Device discovery**: scan for Thingys by their advertised environment
//!   service, or match a name/address
//! - **Connection lifecycle**: explicit [`Device`] state, per-step timeouts,
//!   RAII and single-connection guards
//! - **Real-time streaming**: temperature notifications as an async stream
//! - **Bounded history**: [`series::TemperatureSeries`] ring buffer for the
//!   live chart
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use thingy_core::{Device, StreamOptions, TemperatureStream};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to the first Thingy advertising the environment service
//!     let device = Arc::new(Device::connect_any().await?);
//!
//!     // Subscribe to temperature notifications
//!     let mut stream = TemperatureStream::subscribe(Arc::clone(&device), StreamOptions::default()).await?;
//!     while let Some(result) = stream.next().await {
//!         println!("Temperature: {}°C", result?);
//!     }
//!
//!     device.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod guard;
pub mod messages;
pub mod mock;
pub mod scan;
pub mod series;
pub mod streaming;
pub mod traits;
pub mod util;

// Re-export the shared types crate
pub use thingy_types::uuid as uuids;
pub use thingy_types::{ParseError, TemperatureReading};

// Core exports
pub use device::{ConnectionConfig, Device, DeviceInfo};
pub use error::{ConnectionFailureReason, DeviceNotFoundReason, Error, Result};
pub use guard::{ConnectPermit, ConnectionSlot};
pub use messages::{Command, SensorEvent};
pub use mock::MockThingy;
pub use scan::{DiscoveredDevice, ScanOptions};
pub use series::{TemperaturePoint, TemperatureSeries};
pub use streaming::{ReadingResult, StreamOptions, TemperatureStream};
pub use traits::TemperatureSensor;

/// Type alias for a shared device reference.
///
/// `Device` intentionally does not implement `Clone` (connection ownership
/// would become ambiguous), so `Arc` is the standard way to share one across
/// tasks.
pub type SharedDevice = std::sync::Arc<Device>;
