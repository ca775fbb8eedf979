//! Message types for UI/worker communication.
//!
//! The TUI renders on one task while a background worker owns all BLE
//! operations. The two talk over bounded mpsc channels:
//!
//! ```text
//! +------------------+     Command      +------------------+
//! |    UI thread     | --------------> |  SensorWorker    |
//! |    (ratatui)     |                 |  (tokio task)    |
//! |                  | <-------------- |                  |
//! +------------------+   SensorEvent   +------------------+
//! ```

use time::OffsetDateTime;

use thingy_types::TemperatureReading;

/// Commands sent from the UI thread to the background worker.
#[derive(Debug, Clone)]
pub enum Command {
    /// Connect to a device and subscribe to temperature notifications.
    Connect {
        /// Identifier to connect to; `None` takes the first Thingy in range.
        identifier: Option<String>,
    },

    /// Cancel an in-flight connect attempt.
    CancelConnect,

    /// Disconnect from the active device.
    Disconnect,

    /// Shut down the worker.
    Shutdown,
}

/// Events sent from the background worker to the UI thread.
#[derive(Debug, Clone)]
pub enum SensorEvent {
    /// A connect attempt has started.
    Connecting {
        /// The identifier being connected to, if one was given.
        identifier: Option<String>,
    },

    /// Connected and subscribed to temperature notifications.
    Connected {
        /// The device name, if available.
        name: Option<String>,
        /// The device address.
        address: String,
    },

    /// A connect attempt failed.
    ConnectionFailed {
        /// Description of the error.
        error: String,
        /// Whether the failure was a deliberate cancellation rather than a
        /// transport problem.
        cancelled: bool,
    },

    /// A temperature notification arrived.
    ReadingUpdated {
        /// The decoded reading.
        reading: TemperatureReading,
        /// When the notification was received.
        at: OffsetDateTime,
    },

    /// A notification carried a malformed payload.
    ReadingError {
        /// Description of the error.
        error: String,
    },

    /// Disconnected from the device.
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_debug() {
        let cmd = Command::Connect { identifier: None };
        let debug = format!("{:?}", cmd);
        assert!(debug.contains("Connect"));
    }

    #[test]
    fn test_command_clone() {
        let cmd = Command::Connect {
            identifier: Some("Thingy".to_string()),
        };
        match cmd.clone() {
            Command::Connect { identifier } => assert_eq!(identifier.as_deref(), Some("Thingy")),
            _ => panic!("expected Connect variant"),
        }
    }

    #[test]
    fn test_event_carries_cancellation_flag() {
        let event = SensorEvent::ConnectionFailed {
            error: "Operation cancelled".to_string(),
            cancelled: true,
        };
        match event {
            SensorEvent::ConnectionFailed { cancelled, .. } => assert!(cancelled),
            _ => panic!("expected ConnectionFailed variant"),
        }
    }
}
