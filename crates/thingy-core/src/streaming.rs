//! Real-time temperature streaming via BLE notifications.
//!
//! [`TemperatureStream`] subscribes to the temperature characteristic and
//! yields decoded readings as an async stream. Each notification becomes one
//! stream item, in delivery order. Malformed payloads surface as `Err` items
//! (when enabled) instead of tearing the subscription down.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::stream::Stream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use thingy_types::TemperatureReading;
use thingy_types::uuid::TEMPERATURE;

use crate::device::Device;
use crate::error::{Error, Result};

/// Options for temperature streams.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Buffer size for the reading channel. Default: 16 readings.
    ///
    /// Notifications arriving while the buffer is full are dropped with a
    /// debug log; the device keeps its own cadence regardless.
    pub buffer_size: usize,
    /// Whether to surface decode failures as `Err` items.
    ///
    /// When `false`, malformed payloads are logged and skipped. When `true`
    /// (default), they are delivered so consumers can count or display them.
    pub include_errors: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            buffer_size: 16,
            include_errors: true,
        }
    }
}

impl StreamOptions {
    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(Error::invalid_config("buffer_size must be > 0"));
        }
        Ok(())
    }
}

/// Result type for stream items.
pub type ReadingResult = std::result::Result<TemperatureReading, Error>;

/// A stream of temperature readings from a connected device.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use futures::StreamExt;
/// use thingy_core::{Device, TemperatureStream, StreamOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let device = Arc::new(Device::connect_any().await?);
/// let mut stream = TemperatureStream::subscribe(device, StreamOptions::default()).await?;
///
/// while let Some(result) = stream.next().await {
///     match result {
///         Ok(reading) => println!("{} °C", reading),
///         Err(e) => eprintln!("bad notification: {}", e),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct TemperatureStream {
    receiver: mpsc::Receiver<ReadingResult>,
    device: Arc<Device>,
}

impl TemperatureStream {
    /// Subscribe to temperature notifications on a connected device.
    ///
    /// # Errors
    ///
    /// Fails if the temperature characteristic is missing or notifications
    /// cannot be enabled.
    pub async fn subscribe(device: Arc<Device>, options: StreamOptions) -> Result<Self> {
        options.validate()?;

        let (tx, rx) = mpsc::channel(options.buffer_size);
        let include_errors = options.include_errors;

        device
            .subscribe_to_notifications(TEMPERATURE, move |payload| {
                let item = TemperatureReading::from_bytes(payload).map_err(Error::from);

                if let Err(ref e) = item {
                    warn!("Malformed temperature notification: {}", e);
                    if !include_errors {
                        return;
                    }
                }

                if tx.try_send(item).is_err() {
                    debug!("Temperature stream buffer full or closed, dropping reading");
                }
            })
            .await?;

        Ok(Self { receiver: rx, device })
    }

    /// Stop the stream and disable notifications on the device.
    ///
    /// The device connection itself stays open.
    pub async fn close(self) -> Result<()> {
        self.device.unsubscribe_from_notifications(TEMPERATURE).await
    }

    /// The device this stream is subscribed to.
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }
}

impl Stream for TemperatureStream {
    type Item = ReadingResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_recv(cx)
    }
}
