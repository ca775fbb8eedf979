//! CLI integration tests.
//!
//! These tests verify the binary's argument handling and output formats.
//! Tests that need a real Thingy in range are marked with #[ignore].
//!
//! Run mock tests:
//! ```
//! cargo test --package thingy-cli --test cli_integration
//! ```
//!
//! Run hardware tests:
//! ```
//! THINGY_DEVICE="Thingy" cargo test --package thingy-cli --test cli_integration -- --ignored --nocapture
//! ```

use std::env;
use std::process::Command;

/// Get path to the thingy binary
fn get_binary_path() -> String {
    // Try release first, then debug
    let release_path = env!("CARGO_MANIFEST_DIR").to_string() + "/../../target/release/thingy";
    let debug_path = env!("CARGO_MANIFEST_DIR").to_string() + "/../../target/debug/thingy";

    if std::path::Path::new(&release_path).exists() {
        release_path
    } else if std::path::Path::new(&debug_path).exists() {
        debug_path
    } else {
        // Fall back to cargo run
        "cargo".to_string()
    }
}

/// Run the thingy command and return output
fn run_thingy(args: &[&str]) -> std::process::Output {
    let binary = get_binary_path();

    if binary == "cargo" {
        Command::new("cargo")
            .args(["run", "--package", "thingy-cli", "--"])
            .args(args)
            .output()
            .expect("Failed to run thingy via cargo")
    } else {
        Command::new(&binary)
            .args(args)
            .output()
            .expect("Failed to run thingy binary")
    }
}

/// Get device from environment
fn get_device() -> Option<String> {
    env::var("THINGY_DEVICE").ok().filter(|s| !s.is_empty())
}

// =============================================================================
// Help and Version Tests (no hardware required)
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_thingy(&["--help"]);

    assert!(output.status.success(), "Help should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Thingy") || stdout.contains("thingy"),
        "Help should mention the binary name"
    );
    assert!(stdout.contains("scan"), "Help should list scan command");
    assert!(stdout.contains("read"), "Help should list read command");
    assert!(stdout.contains("watch"), "Help should list watch command");
    assert!(stdout.contains("ui"), "Help should list ui command");
}

#[test]
fn test_version_command() {
    let output = run_thingy(&["--version"]);

    assert!(output.status.success(), "Version should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("thingy"),
        "Version should contain the binary name"
    );
}

#[test]
fn test_subcommand_help() {
    let subcommands = ["scan", "read", "watch", "info", "ui", "completions"];

    for cmd in subcommands {
        let output = run_thingy(&[cmd, "--help"]);

        assert!(output.status.success(), "{} --help should succeed", cmd);

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.is_empty(), "{} --help should produce output", cmd);
    }
}

// =============================================================================
// Completions (no hardware required)
// =============================================================================

#[test]
fn test_completions_bash() {
    let output = run_thingy(&["completions", "bash"]);

    assert!(output.status.success(), "Completions should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("thingy"),
        "Completion script should reference the binary"
    );
}

#[test]
fn test_completions_rejects_unknown_shell() {
    let output = run_thingy(&["completions", "notashell"]);

    assert!(
        !output.status.success(),
        "Unknown shell should be rejected"
    );
}

// =============================================================================
// Error Handling Tests (no hardware required)
// =============================================================================

#[test]
fn test_invalid_subcommand() {
    let output = run_thingy(&["notacommand"]);

    assert!(!output.status.success(), "Invalid subcommand should fail");
}

#[test]
fn test_no_subcommand_shows_usage() {
    let output = run_thingy(&[]);

    assert!(!output.status.success(), "Bare invocation should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Usage") || stderr.contains("usage"),
        "Should print usage"
    );
}

// =============================================================================
// Scan Tests (requires BLE but not a specific device)
// =============================================================================

#[test]
#[ignore = "requires BLE hardware"]
fn test_scan_text_output() {
    let output = run_thingy(&["scan", "--timeout", "5"]);

    // Scan may find no devices, but should complete
    assert!(output.status.success(), "Scan should complete");
}

#[test]
#[ignore = "requires BLE hardware"]
fn test_scan_json_output() {
    let output = run_thingy(&["scan", "--timeout", "5", "--format", "json"]);

    assert!(output.status.success(), "Scan JSON should complete");

    let stdout = String::from_utf8_lossy(&output.stdout);

    // Should be valid JSON (array, possibly empty)
    if !stdout.trim().is_empty() {
        let parsed: Result<serde_json::Value, _> = serde_json::from_str(&stdout);
        assert!(
            parsed.is_ok(),
            "Scan JSON output should be valid JSON: {}",
            stdout
        );
    }
}

// =============================================================================
// Read Tests (requires a specific device)
// =============================================================================

#[test]
#[ignore = "requires BLE hardware and device"]
fn test_read_text_output() {
    let device = match get_device() {
        Some(d) => d,
        None => {
            println!("SKIP: THINGY_DEVICE not set");
            return;
        }
    };

    let output = run_thingy(&["read", "--device", &device]);

    assert!(output.status.success(), "Read should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Temperature:") && stdout.contains("°C"),
        "Read output should contain the temperature label"
    );
}

#[test]
#[ignore = "requires BLE hardware and device"]
fn test_read_json_output() {
    let device = match get_device() {
        Some(d) => d,
        None => {
            println!("SKIP: THINGY_DEVICE not set");
            return;
        }
    };

    let output = run_thingy(&["read", "--device", &device, "--format", "json"]);

    assert!(output.status.success(), "Read JSON should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Read JSON should be valid JSON");

    assert!(
        parsed.get("temperature_c").is_some() && parsed.get("raw").is_some(),
        "JSON should contain the reading fields"
    );
}

#[test]
#[ignore = "requires BLE hardware and device"]
fn test_read_quiet_mode() {
    let device = match get_device() {
        Some(d) => d,
        None => {
            println!("SKIP: THINGY_DEVICE not set");
            return;
        }
    };

    let output = run_thingy(&["--quiet", "read", "--device", &device, "--format", "json"]);

    assert!(output.status.success(), "Quiet read should succeed");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.is_empty() || !stderr.contains("Connecting"),
        "Quiet mode should suppress connection messages"
    );
}

#[test]
#[ignore = "requires BLE hardware"]
fn test_invalid_device() {
    let output = run_thingy(&["read", "--device", "NonExistentDevice12345"]);

    assert!(
        !output.status.success(),
        "Read with invalid device should fail"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("not found")
            || stderr.contains("failed")
            || stderr.contains("error")
            || stderr.contains("timeout"),
        "Should show helpful error message"
    );
}

// =============================================================================
// Watch Tests
// =============================================================================

#[test]
#[ignore = "requires BLE hardware and device - slow"]
fn test_watch_limited_count() {
    let device = match get_device() {
        Some(d) => d,
        None => {
            println!("SKIP: THINGY_DEVICE not set");
            return;
        }
    };

    let output = run_thingy(&["watch", "--device", &device, "--count", "2"]);

    assert!(output.status.success(), "Watch should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.is_empty(), "Watch should produce output");
    assert!(
        stdout.contains("°C"),
        "Watch lines should carry temperature values"
    );
}

// =============================================================================
// Info Tests
// =============================================================================

#[test]
#[ignore = "requires BLE hardware and device"]
fn test_info_output() {
    let device = match get_device() {
        Some(d) => d,
        None => {
            println!("SKIP: THINGY_DEVICE not set");
            return;
        }
    };

    let output = run_thingy(&["info", "--device", &device]);

    assert!(output.status.success(), "Info should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Name") || stdout.contains("Model") || stdout.contains("Firmware"),
        "Info should show device details"
    );
}
