//! Output formatting for scan results and temperature readings.

use anyhow::Result;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use thingy_core::DiscoveredDevice;
use thingy_types::TemperatureReading;

use crate::style;

const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// The display label for a reading: `Temperature: 23.5°C`.
///
/// Whole-degree values render without a decimal (`Temperature: 10°C`).
pub fn format_temperature_label(reading: &TemperatureReading) -> String {
    format!("Temperature: {}°C", reading)
}

/// Current wall-clock time as `HH:MM:SS` in the given offset.
pub fn format_clock(offset: UtcOffset) -> String {
    OffsetDateTime::now_utc()
        .to_offset(offset)
        .format(CLOCK_FORMAT)
        .unwrap_or_else(|_| "--:--:--".to_string())
}

/// Format scan results as human-readable text.
pub fn format_scan_text(devices: &[DiscoveredDevice], no_color: bool) -> String {
    if devices.is_empty() {
        return "No Thingy devices found.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("Found {} device(s):\n", devices.len()));
    for device in devices {
        let name = device.name.as_deref().unwrap_or("Unknown");
        let rssi = device
            .rssi
            .map(|r| format!("{} dBm", r))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {}  {}  {}\n",
            style::device_name(name, no_color),
            device.identifier,
            rssi
        ));
    }
    out
}

/// Format scan results as JSON.
pub fn format_scan_json(devices: &[DiscoveredDevice]) -> Result<String> {
    let entries: Vec<serde_json::Value> = devices
        .iter()
        .map(|d| {
            serde_json::json!({
                "name": d.name,
                "identifier": d.identifier,
                "address": d.address,
                "rssi": d.rssi,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Format a single reading as JSON.
pub fn format_reading_json(reading: &TemperatureReading) -> Result<String> {
    let value = serde_json::json!({
        "temperature_c": reading.celsius(),
        "raw": reading.raw(),
    });
    Ok(serde_json::to_string(&value)?)
}

/// Format one watch line: timestamp, colored value, trend vs the previous
/// reading.
pub fn format_watch_line(
    reading: &TemperatureReading,
    previous: Option<&TemperatureReading>,
    offset: UtcOffset,
    no_color: bool,
) -> String {
    let timestamp = format_clock(offset);
    // "~" on the first line: no trend data yet
    let trend = previous
        .map(|p| style::trend_indicator(reading.celsius(), p.celsius(), no_color))
        .unwrap_or_else(|| "~".to_string());

    format!(
        "[{}] {} °C {}\n",
        timestamp,
        style::format_temp_colored(reading, no_color),
        trend
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_label_trims_trailing_zero() {
        let reading = TemperatureReading::from_raw(100);
        assert_eq!(format_temperature_label(&reading), "Temperature: 10°C");
    }

    #[test]
    fn test_temperature_label_keeps_tenths() {
        let reading = TemperatureReading::from_raw(235);
        assert_eq!(format_temperature_label(&reading), "Temperature: 23.5°C");
    }

    #[test]
    fn test_temperature_label_zero() {
        let reading = TemperatureReading::from_raw(0);
        assert_eq!(format_temperature_label(&reading), "Temperature: 0°C");
    }

    #[test]
    fn test_reading_json() {
        let reading = TemperatureReading::from_raw(235);
        let json = format_reading_json(&reading).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["raw"], 235);
        assert!((value["temperature_c"].as_f64().unwrap() - 23.5).abs() < 0.001);
    }

    #[test]
    fn test_scan_text_empty() {
        assert!(format_scan_text(&[], true).contains("No Thingy devices"));
    }

    #[test]
    fn test_watch_line_has_timestamp_and_value() {
        let reading = TemperatureReading::from_raw(235);
        let line = format_watch_line(&reading, None, UtcOffset::UTC, true);
        assert!(line.contains("23.5 °C"));
        assert!(line.contains('['));
        assert!(line.trim_end().ends_with('~'));
    }

    #[test]
    fn test_watch_line_trend() {
        let current = TemperatureReading::from_raw(240);
        let previous = TemperatureReading::from_raw(235);
        let line = format_watch_line(&current, Some(&previous), UtcOffset::UTC, true);
        assert!(line.contains('+'));
    }
}
