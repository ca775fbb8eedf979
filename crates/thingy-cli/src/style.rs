//! Terminal styling helpers: colors, trend indicators, spinners.

use std::time::Duration;

use indicatif::ProgressBar;
use owo_colors::OwoColorize;

use thingy_types::TemperatureReading;

/// Comfortable-range bounds used for color banding, in °C.
const COOL_BELOW: f32 = 18.0;
const WARM_ABOVE: f32 = 26.0;

/// Color a temperature value by band: cool blue, comfortable green, warm red.
pub fn format_temp_colored(reading: &TemperatureReading, no_color: bool) -> String {
    let text = reading.to_string();
    if no_color {
        return text;
    }

    let celsius = reading.celsius();
    if celsius < COOL_BELOW {
        text.blue().to_string()
    } else if celsius <= WARM_ABOVE {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Trend indicator comparing the current value to the previous one.
pub fn trend_indicator(current: f32, previous: f32, no_color: bool) -> String {
    let delta = current - previous;
    if delta > f32::EPSILON {
        if no_color {
            "+".to_string()
        } else {
            "+".green().to_string()
        }
    } else if delta < -f32::EPSILON {
        if no_color {
            "-".to_string()
        } else {
            "-".blue().to_string()
        }
    } else {
        "=".to_string()
    }
}

/// Color a device name for scan output.
pub fn device_name(name: &str, no_color: bool) -> String {
    if no_color {
        name.to_string()
    } else {
        name.green().to_string()
    }
}

/// Spinner shown while a scan is in progress.
pub fn scanning_spinner(timeout: u64) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Scanning for Thingy devices ({}s)...", timeout));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_colored_plain() {
        let reading = TemperatureReading::from_raw(235);
        assert_eq!(format_temp_colored(&reading, true), "23.5");
    }

    #[test]
    fn test_trend_indicator_plain() {
        assert_eq!(trend_indicator(24.0, 23.5, true), "+");
        assert_eq!(trend_indicator(23.0, 23.5, true), "-");
        assert_eq!(trend_indicator(23.5, 23.5, true), "=");
    }
}
