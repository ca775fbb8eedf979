//! Core types for Thingy:52 sensor data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Minimum number of bytes required to parse a [`TemperatureReading`].
pub const MIN_TEMPERATURE_BYTES: usize = 1;

/// A decoded temperature reading from the Thingy:52 environment service.
///
/// The device notifies temperature as a single unsigned byte holding tenths
/// of a degree Celsius. The raw byte is kept so that display formatting is
/// exact: `235` renders as `23.5`, `100` renders as `10` (no trailing `.0`),
/// matching how the value appears on the device's companion UIs.
///
/// # Examples
///
/// ```
/// use thingy_types::TemperatureReading;
///
/// let reading = TemperatureReading::from_bytes(&[235]).unwrap();
/// assert_eq!(reading.celsius(), 23.5);
///
/// // Zero is a valid reading, not an absence marker.
/// let zero = TemperatureReading::from_bytes(&[0]).unwrap();
/// assert_eq!(zero.celsius(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemperatureReading {
    /// Raw wire value: degrees Celsius multiplied by 10.
    raw: u8,
}

impl TemperatureReading {
    /// Create a reading directly from the raw wire byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    /// Parse a reading from a notification payload.
    ///
    /// The first byte carries the value; any trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InsufficientBytes`] if `data` is empty.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < MIN_TEMPERATURE_BYTES {
            return Err(ParseError::InsufficientBytes {
                expected: MIN_TEMPERATURE_BYTES,
                actual: data.len(),
            });
        }
        Ok(Self { raw: data[0] })
    }

    /// The raw wire value (degrees Celsius x 10).
    #[must_use]
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// Temperature in degrees Celsius.
    #[must_use]
    pub fn celsius(&self) -> f32 {
        f32::from(self.raw) / 10.0
    }
}

impl fmt::Display for TemperatureReading {
    /// Render the value with at most one decimal digit, omitting a trailing
    /// `.0` (`23.5`, `10`, `0`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.raw / 10;
        let tenths = self.raw % 10;
        if tenths == 0 {
            write!(f, "{}", whole)
        } else {
            write!(f, "{}.{}", whole, tenths)
        }
    }
}
