//! Bounded time series of temperature readings.
//!
//! The series backs the live chart: every notification appends one point,
//! order follows arrival order, and once the configured capacity is reached
//! the oldest point is evicted. Capacity is a hard bound so that a monitor
//! left running for days does not grow without limit.

use std::collections::VecDeque;

use time::OffsetDateTime;

use thingy_types::TemperatureReading;

/// Default number of points retained (10 minutes at one reading per second).
pub const DEFAULT_SERIES_CAPACITY: usize = 600;

/// A single timestamped temperature sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperaturePoint {
    /// When the sample was received.
    pub at: OffsetDateTime,
    /// The decoded reading.
    pub reading: TemperatureReading,
}

impl TemperaturePoint {
    /// Create a point from a timestamp and reading.
    #[must_use]
    pub fn new(at: OffsetDateTime, reading: TemperatureReading) -> Self {
        Self { at, reading }
    }
}

/// An ordered, capacity-bounded sequence of temperature samples.
///
/// # Example
///
/// ```
/// use thingy_core::series::TemperatureSeries;
/// use thingy_types::TemperatureReading;
/// use time::OffsetDateTime;
///
/// let mut series = TemperatureSeries::with_capacity(3);
/// for raw in [10, 20, 30, 40] {
///     series.record(OffsetDateTime::now_utc(), TemperatureReading::from_raw(raw));
/// }
/// // Capacity 3: the oldest point was evicted
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.iter().next().unwrap().reading.raw(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct TemperatureSeries {
    points: VecDeque<TemperaturePoint>,
    capacity: usize,
}

impl TemperatureSeries {
    /// Create a series with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SERIES_CAPACITY)
    }

    /// Create a series bounded to `capacity` points.
    ///
    /// A capacity of zero is clamped to one; a series that can hold nothing
    /// cannot chart anything.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// The configured capacity bound.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a point, evicting the oldest one when at capacity.
    pub fn push(&mut self, point: TemperaturePoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Append a reading taken at `at`.
    pub fn record(&mut self, at: OffsetDateTime, reading: TemperatureReading) {
        self.push(TemperaturePoint::new(at, reading));
    }

    /// Number of points currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent point, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&TemperaturePoint> {
        self.points.back()
    }

    /// The oldest retained point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&TemperaturePoint> {
        self.points.front()
    }

    /// Iterate points oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TemperaturePoint> {
        self.points.iter()
    }

    /// The highest temperature currently in the series.
    #[must_use]
    pub fn max_celsius(&self) -> Option<f32> {
        self.points
            .iter()
            .map(|p| p.reading.celsius())
            .fold(None, |max, v| Some(max.map_or(v, |m: f32| m.max(v))))
    }

    /// Project to `(seconds since origin, °C)` pairs for chart rendering.
    #[must_use]
    pub fn chart_points(&self, origin: OffsetDateTime) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| ((p.at - origin).as_seconds_f64(), f64::from(p.reading.celsius())))
            .collect()
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for TemperatureSeries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn base_time() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[test]
    fn test_each_push_adds_exactly_one_point() {
        let mut series = TemperatureSeries::with_capacity(10);
        for (i, raw) in [235u8, 236, 237].iter().enumerate() {
            series.record(base_time() + Duration::seconds(i as i64), TemperatureReading::from_raw(*raw));
            assert_eq!(series.len(), i + 1);
        }
    }

    #[test]
    fn test_zero_reading_is_appended() {
        let mut series = TemperatureSeries::new();
        series.record(base_time(), TemperatureReading::from_raw(0));
        assert_eq!(series.len(), 1);
        assert_eq!(series.latest().unwrap().reading.celsius(), 0.0);
    }

    #[test]
    fn test_points_keep_arrival_order() {
        let mut series = TemperatureSeries::new();
        series.record(base_time(), TemperatureReading::from_raw(100));
        series.record(base_time() + Duration::seconds(1), TemperatureReading::from_raw(101));
        series.record(base_time() + Duration::seconds(2), TemperatureReading::from_raw(102));

        let raws: Vec<u8> = series.iter().map(|p| p.reading.raw()).collect();
        assert_eq!(raws, vec![100, 101, 102]);

        let times: Vec<OffsetDateTime> = series.iter().map(|p| p.at).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_no_points_removed_under_capacity() {
        let mut series = TemperatureSeries::with_capacity(100);
        for i in 0..50u8 {
            series.record(base_time() + Duration::seconds(i as i64), TemperatureReading::from_raw(i));
        }
        assert_eq!(series.len(), 50);
        assert_eq!(series.first().unwrap().reading.raw(), 0);
    }

    #[test]
    fn test_eviction_at_capacity() {
        let mut series = TemperatureSeries::with_capacity(3);
        for i in 0..5u8 {
            series.record(base_time() + Duration::seconds(i as i64), TemperatureReading::from_raw(i));
        }
        assert_eq!(series.len(), 3);
        let raws: Vec<u8> = series.iter().map(|p| p.reading.raw()).collect();
        assert_eq!(raws, vec![2, 3, 4]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let series = TemperatureSeries::with_capacity(0);
        assert_eq!(series.capacity(), 1);
    }

    #[test]
    fn test_chart_points_are_relative_to_origin() {
        let origin = base_time();
        let mut series = TemperatureSeries::new();
        series.record(origin + Duration::seconds(5), TemperatureReading::from_raw(235));
        series.record(origin + Duration::seconds(10), TemperatureReading::from_raw(240));

        let points = series.chart_points(origin);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], (5.0, 23.5));
        assert_eq!(points[1], (10.0, 24.0));
    }

    #[test]
    fn test_max_celsius() {
        let mut series = TemperatureSeries::new();
        assert_eq!(series.max_celsius(), None);
        series.record(base_time(), TemperatureReading::from_raw(180));
        series.record(base_time(), TemperatureReading::from_raw(250));
        series.record(base_time(), TemperatureReading::from_raw(200));
        assert_eq!(series.max_celsius(), Some(25.0));
    }
}
