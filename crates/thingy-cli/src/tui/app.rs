//! Application state for the TUI dashboard.
//!
//! The monitor moves through three states: Disconnected → Connecting →
//! Subscribed, with explicit transitions back to Disconnected on error,
//! cancellation, or transport loss. All state changes arrive as
//! [`SensorEvent`]s from the background worker.

use time::{OffsetDateTime, UtcOffset};
use tokio::sync::mpsc;

use thingy_core::SensorEvent;
use thingy_core::series::TemperatureSeries;
use thingy_types::TemperatureReading;

use crate::format::format_temperature_label;

const SPINNER_FRAMES: &[char] = &['|', '/', '-', '\\'];

/// Connection status of the monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitorStatus {
    /// No device connection.
    #[default]
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// Connected and receiving temperature notifications.
    Subscribed,
}

impl MonitorStatus {
    /// Display label for the status.
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Subscribed => "Subscribed",
        }
    }
}

/// TUI application state.
pub struct App {
    /// Target device identifier, if one was configured.
    pub target: Option<String>,
    /// Current connection status.
    pub status: MonitorStatus,
    /// Connected device name, if known.
    pub device_name: Option<String>,
    /// Connected device address.
    pub device_address: Option<String>,
    /// Bounded reading history backing the chart.
    pub series: TemperatureSeries,
    /// Most recent reading.
    pub latest: Option<TemperatureReading>,
    /// Last error message, if any.
    pub last_error: Option<String>,
    /// Chart x-axis origin (session start).
    pub origin: OffsetDateTime,
    /// Local UTC offset, resolved once at startup.
    pub local_offset: UtcOffset,
    /// Receiver for worker events.
    pub event_rx: mpsc::Receiver<SensorEvent>,
    should_quit: bool,
    spinner_frame: usize,
}

impl App {
    /// Create the application state.
    pub fn new(
        event_rx: mpsc::Receiver<SensorEvent>,
        target: Option<String>,
        capacity: usize,
    ) -> Self {
        Self {
            target,
            status: MonitorStatus::Disconnected,
            device_name: None,
            device_address: None,
            series: TemperatureSeries::with_capacity(capacity),
            latest: None,
            last_error: None,
            origin: OffsetDateTime::now_utc(),
            local_offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
            event_rx,
            should_quit: false,
            spinner_frame: 0,
        }
    }

    /// Apply a worker event to the state.
    pub fn handle_sensor_event(&mut self, event: SensorEvent) {
        match event {
            SensorEvent::Connecting { .. } => {
                self.status = MonitorStatus::Connecting;
                self.last_error = None;
            }
            SensorEvent::Connected { name, address } => {
                self.status = MonitorStatus::Subscribed;
                self.device_name = name;
                self.device_address = Some(address);
                self.last_error = None;
            }
            SensorEvent::ConnectionFailed { error, cancelled } => {
                self.status = MonitorStatus::Disconnected;
                // A cancelled connect is not an error worth showing
                self.last_error = if cancelled { None } else { Some(error) };
            }
            SensorEvent::ReadingUpdated { reading, at } => {
                self.latest = Some(reading);
                self.series.record(at, reading);
            }
            SensorEvent::ReadingError { error } => {
                self.last_error = Some(error);
            }
            SensorEvent::Disconnected => {
                self.status = MonitorStatus::Disconnected;
            }
        }
    }

    /// The display sink text, e.g. `Temperature: 23.5°C`.
    pub fn display_label(&self) -> Option<String> {
        self.latest.as_ref().map(format_temperature_label)
    }

    /// Display name for the connected device.
    pub fn device_label(&self) -> Option<String> {
        match (&self.device_name, &self.device_address) {
            (Some(name), Some(address)) => Some(format!("{} ({})", name, address)),
            (None, Some(address)) => Some(address.clone()),
            _ => None,
        }
    }

    /// Request application shutdown.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Whether the event loop should exit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Advance the spinner animation.
    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    /// Current spinner character.
    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }
}
