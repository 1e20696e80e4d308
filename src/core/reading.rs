//! Sensor reading events and their text renderings

use super::sensor::{SensorDescriptor, SensorId};
use std::time::{SystemTime, UNIX_EPOCH};

/// Reading accuracy codes as reported by backends
pub mod accuracy {
    pub const UNRELIABLE: i32 = 0;
    pub const LOW: i32 = 1;
    pub const MEDIUM: i32 = 2;
    pub const HIGH: i32 = 3;
}

/// One timestamped sample delivered by the platform
///
/// Transient: produced by a backend, rendered once, not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// The sensor that produced this sample
    pub sensor: SensorId,
    pub timestamp_ns: u64,
    /// Sample values; length depends on the sensor kind
    pub values: Vec<f32>,
    pub accuracy: i32,
}

impl Reading {
    /// Build a reading stamped with the current wall-clock time
    pub fn now(sensor: SensorId, values: Vec<f32>, accuracy: i32) -> Self {
        let timestamp_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self {
            sensor,
            timestamp_ns,
            values,
            accuracy,
        }
    }
}

/// Render the fixed multi-line details text for a sensor
pub fn format_details(sensor: &SensorDescriptor) -> String {
    format!(
        "Name: {}\nVendor: {}\nType: {}\nString Type: {}\nVersion: {}\nMax Range: {}\nResolution: {}\nPower (mA): {}\nMin Delay (µs): {}",
        sensor.name,
        sensor.vendor,
        sensor.kind.code(),
        sensor.string_type(),
        sensor.version,
        sensor.max_range,
        sensor.resolution,
        sensor.power_ma,
        sensor.min_delay_us,
    )
}

/// Render the values text for one reading
///
/// Handles any value count, including zero; never indexes past the
/// sequence the event actually carries.
pub fn format_reading(reading: &Reading) -> String {
    let mut out = format!("Timestamp (ns): {}\n\nValues:\n", reading.timestamp_ns);
    for (i, value) in reading.values.iter().enumerate() {
        out.push_str(&format!("  [{}] = {:.6}\n", i, value));
    }
    out.push_str(&format!("\nAccuracy: {}", reading.accuracy));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sensor::SensorKind;

    #[test]
    fn test_format_reading_is_deterministic() {
        let reading = Reading {
            sensor: SensorId(0),
            timestamp_ns: 123_456_789,
            values: vec![1.0, -2.5],
            accuracy: 3,
        };
        assert_eq!(
            format_reading(&reading),
            "Timestamp (ns): 123456789\n\nValues:\n  [0] = 1.000000\n  [1] = -2.500000\n\nAccuracy: 3"
        );
    }

    #[test]
    fn test_format_reading_with_no_values() {
        let reading = Reading {
            sensor: SensorId(0),
            timestamp_ns: 7,
            values: Vec::new(),
            accuracy: 0,
        };
        assert_eq!(
            format_reading(&reading),
            "Timestamp (ns): 7\n\nValues:\n\nAccuracy: 0"
        );
    }

    #[test]
    fn test_format_details_lists_every_attribute_on_its_own_line() {
        let descriptor = SensorDescriptor {
            id: SensorId(1),
            name: "CPU Fan".to_string(),
            vendor: "nct6775".to_string(),
            kind: SensorKind::Fan,
            version: 1,
            max_range: 10000.0,
            resolution: 1.0,
            power_ma: 0.0,
            min_delay_us: 100_000,
        };
        let details = format_details(&descriptor);
        let lines: Vec<&str> = details.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "Name: CPU Fan");
        assert_eq!(lines[1], "Vendor: nct6775");
        assert_eq!(lines[2], "Type: 2");
        assert_eq!(lines[3], "String Type: fan");
        assert_eq!(lines[4], "Version: 1");
        assert_eq!(lines[5], "Max Range: 10000");
        assert_eq!(lines[6], "Resolution: 1");
        assert_eq!(lines[7], "Power (mA): 0");
        assert_eq!(lines[8], "Min Delay (µs): 100000");
    }

    #[test]
    fn test_reading_now_is_tagged_with_sensor() {
        let reading = Reading::now(SensorId(9), vec![1.5], accuracy::HIGH);
        assert_eq!(reading.sensor, SensorId(9));
        assert!(reading.timestamp_ns > 0);
    }
}
