//! Shared helpers for peripheral identification.

use btleplug::platform::PeripheralId;

/// Extract a plain identifier string from a peripheral ID.
///
/// On macOS peripheral IDs are CoreBluetooth UUIDs; elsewhere they wrap the
/// MAC address. The Debug form is the only portable accessor, so strip its
/// wrapper.
pub fn format_peripheral_id(id: &PeripheralId) -> String {
    format!("{:?}", id)
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
        .to_string()
}

/// Pick a connection identifier from an address and peripheral ID.
///
/// macOS reports addresses as 00:00:00:00:00:00, in which case the
/// peripheral ID is the only usable handle.
pub fn create_identifier(address: &str, peripheral_id: &PeripheralId) -> String {
    if address == "00:00:00:00:00:00" {
        format_peripheral_id(peripheral_id)
    } else {
        address.to_string()
    }
}
