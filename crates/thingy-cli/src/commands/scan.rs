//! Scan command implementation.

use anyhow::{Context, Result};
use thingy_core::{ScanOptions, scan};

use crate::cli::OutputFormat;
use crate::format::{format_scan_json, format_scan_text};
use crate::style;

pub async fn cmd_scan(
    timeout: u64,
    format: OutputFormat,
    quiet: bool,
    no_color: bool,
) -> Result<()> {
    // Spinner for interactive text output only
    let spinner = if !quiet && matches!(format, OutputFormat::Text) {
        Some(style::scanning_spinner(timeout))
    } else {
        None
    };

    let options = ScanOptions::default()
        .duration_secs(timeout)
        .filter_thingy_only(true);

    let devices = scan::scan_with_options(options)
        .await
        .context("Failed to scan for devices")?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let content = match format {
        OutputFormat::Json => format_scan_json(&devices)?,
        OutputFormat::Text => format_scan_text(&devices, no_color),
    };
    print!("{}", content);

    Ok(())
}
