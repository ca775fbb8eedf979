//! Integration tests for thingy-core using the mock sensor.
//!
//! These tests exercise the sensor trait, the connection slot, and the
//! series the way the CLI worker drives them, without BLE hardware.

use std::time::Duration;

use time::OffsetDateTime;

use thingy_core::series::TemperatureSeries;
use thingy_core::{ConnectionFailureReason, Error, MockThingy, TemperatureSensor};

#[tokio::test]
async fn monitor_flow_appends_one_point_per_reading() {
    let device = MockThingy::new("Thingy");
    device.connect().await.unwrap();

    let mut series = TemperatureSeries::with_capacity(16);

    for raw in [235u8, 236, 0, 240] {
        device.set_raw_temperature(raw);
        let reading = device.read_temperature().await.unwrap();
        series.record(OffsetDateTime::now_utc(), reading);
    }

    // Every reading landed, including the zero
    assert_eq!(series.len(), 4);
    let raws: Vec<u8> = series.iter().map(|p| p.reading.raw()).collect();
    assert_eq!(raws, vec![235, 236, 0, 240]);

    device.disconnect().await.unwrap();
}

#[tokio::test]
async fn failed_read_leaves_series_untouched() {
    let device = MockThingy::new("Thingy");
    device.connect().await.unwrap();
    device.set_should_fail(true, Some("out of range")).await;

    let mut series = TemperatureSeries::with_capacity(16);

    match device.read_temperature().await {
        Ok(reading) => series.record(OffsetDateTime::now_utc(), reading),
        Err(e) => assert!(e.to_string().contains("out of range")),
    }

    assert!(series.is_empty());
}

#[tokio::test]
async fn transient_failures_recover_without_reconnect() {
    let device = MockThingy::new("Thingy");
    device.connect().await.unwrap();
    device.fail_times(1);

    assert!(device.read_temperature().await.is_err());
    assert!(device.read_temperature().await.is_ok());
    assert!(device.is_connected().await);
}

#[tokio::test]
async fn read_latency_is_observed() {
    let device = MockThingy::new("Thingy");
    device.connect().await.unwrap();
    device.set_read_latency(Duration::from_millis(50));

    let start = std::time::Instant::now();
    device.read_temperature().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn sensor_trait_is_object_safe() {
    let device: Box<dyn TemperatureSensor> = Box::new(MockThingy::new("Thingy"));
    // Not connected yet
    let err = device.read_temperature().await.unwrap_err();
    assert!(matches!(err, Error::NotConnected));
}

#[test]
fn connection_slot_rejects_concurrent_connects() {
    let slot = thingy_core::ConnectionSlot::new();

    let permit = slot.begin_connect().unwrap();
    let err = slot.begin_connect().unwrap_err();
    assert!(matches!(
        err,
        Error::ConnectionFailed {
            reason: ConnectionFailureReason::ConnectInProgress,
            ..
        }
    ));

    // Abandoning the attempt frees the slot
    drop(permit);
    assert!(slot.begin_connect().is_ok());
}
