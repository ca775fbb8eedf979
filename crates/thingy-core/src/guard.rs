//! Single-connection guard.
//!
//! [`ConnectionSlot`] enforces the one-active-connection invariant: a second
//! connect attempt while one is in flight (or a device is already held) is
//! rejected with a typed reason instead of quietly stacking a second
//! subscription on top of the first.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::device::Device;
use crate::error::{ConnectionFailureReason, Error, Result};

#[derive(Debug, Default)]
enum SlotState {
    #[default]
    Idle,
    Connecting,
    Connected(Arc<Device>),
}

/// Tracks the single active device connection.
///
/// State machine: Idle → Connecting (via [`begin_connect`](Self::begin_connect))
/// → Connected (via [`ConnectPermit::complete`]) → Idle (via
/// [`take`](Self::take)). Dropping a permit without completing it rolls the
/// slot back to Idle, so a failed connect never wedges the slot.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use thingy_core::{ConnectionSlot, Device};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let slot = ConnectionSlot::new();
///
/// let permit = slot.begin_connect()?;
/// // A second begin_connect here would fail with ConnectInProgress
/// let device = Arc::new(Device::connect_any().await?);
/// permit.complete(device);
///
/// assert!(slot.active().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConnectionSlot {
    state: Mutex<SlotState>,
}

impl ConnectionSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().expect("connection slot lock poisoned")
    }

    /// Reserve the slot for a connect attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionFailed`] with
    /// [`ConnectionFailureReason::ConnectInProgress`] if a connect is already
    /// in flight, or [`ConnectionFailureReason::AlreadyConnected`] if a
    /// device is already held.
    pub fn begin_connect(&self) -> Result<ConnectPermit<'_>> {
        let mut state = self.lock();
        match *state {
            SlotState::Idle => {
                *state = SlotState::Connecting;
                Ok(ConnectPermit {
                    slot: self,
                    completed: false,
                })
            }
            SlotState::Connecting => Err(Error::connection_failed(
                None,
                ConnectionFailureReason::ConnectInProgress,
            )),
            SlotState::Connected(ref device) => Err(Error::connection_failed(
                Some(device.address().to_string()),
                ConnectionFailureReason::AlreadyConnected,
            )),
        }
    }

    /// The active device, if one is connected.
    pub fn active(&self) -> Option<Arc<Device>> {
        match *self.lock() {
            SlotState::Connected(ref device) => Some(Arc::clone(device)),
            _ => None,
        }
    }

    /// Release the active device, returning the slot to Idle.
    ///
    /// The caller is responsible for disconnecting the returned device.
    pub fn take(&self) -> Option<Arc<Device>> {
        let mut state = self.lock();
        match std::mem::take(&mut *state) {
            SlotState::Connected(device) => Some(device),
            other => {
                // Connecting state is owned by a live permit; restore it
                *state = other;
                None
            }
        }
    }

    /// Whether a connect attempt is currently in flight.
    pub fn is_connecting(&self) -> bool {
        matches!(*self.lock(), SlotState::Connecting)
    }

    /// Whether a device is currently held.
    pub fn is_connected(&self) -> bool {
        matches!(*self.lock(), SlotState::Connected(_))
    }
}

/// Permission to run one connect attempt against a [`ConnectionSlot`].
///
/// Call [`complete`](Self::complete) with the connected device on success;
/// dropping the permit without completing rolls the slot back to Idle.
#[must_use = "dropping the permit rolls the slot back to Idle"]
pub struct ConnectPermit<'a> {
    slot: &'a ConnectionSlot,
    completed: bool,
}

impl ConnectPermit<'_> {
    /// Store the connected device in the slot.
    pub fn complete(mut self, device: Arc<Device>) {
        *self.slot.lock() = SlotState::Connected(device);
        self.completed = true;
    }
}

impl Drop for ConnectPermit<'_> {
    fn drop(&mut self) {
        if !self.completed {
            *self.slot.lock() = SlotState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_idle() {
        let slot = ConnectionSlot::new();
        assert!(!slot.is_connecting());
        assert!(!slot.is_connected());
        assert!(slot.active().is_none());
    }

    #[test]
    fn test_second_connect_attempt_is_rejected() {
        let slot = ConnectionSlot::new();
        let _permit = slot.begin_connect().unwrap();
        assert!(slot.is_connecting());

        let err = slot.begin_connect().unwrap_err();
        assert!(matches!(
            err,
            Error::ConnectionFailed {
                reason: ConnectionFailureReason::ConnectInProgress,
                ..
            }
        ));
    }

    #[test]
    fn test_dropped_permit_rolls_back_to_idle() {
        let slot = ConnectionSlot::new();
        {
            let _permit = slot.begin_connect().unwrap();
        }
        assert!(!slot.is_connecting());
        // Slot is usable again
        let _permit = slot.begin_connect().unwrap();
    }

    #[test]
    fn test_take_on_idle_slot_is_none() {
        let slot = ConnectionSlot::new();
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_take_while_connecting_keeps_permit_state() {
        let slot = ConnectionSlot::new();
        let _permit = slot.begin_connect().unwrap();
        assert!(slot.take().is_none());
        assert!(slot.is_connecting());
    }
}
