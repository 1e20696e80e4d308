//! Sensor identity and metadata types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to one sensor within a directory snapshot.
///
/// Ids are assigned by the backend at enumeration time and are unique for
/// the lifetime of the snapshot. Readings carry the id of the sensor that
/// produced them so the session can discard stale cross-sensor events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId(pub u32);

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of sensor, with a stable integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Temperature,
    Fan,
    Voltage,
    Current,
    Power,
    Humidity,
    Synthetic,
}

impl SensorKind {
    /// The integer code shown in selection labels
    pub fn code(self) -> i32 {
        match self {
            SensorKind::Temperature => 1,
            SensorKind::Fan => 2,
            SensorKind::Voltage => 3,
            SensorKind::Current => 4,
            SensorKind::Power => 5,
            SensorKind::Humidity => 6,
            SensorKind::Synthetic => 7,
        }
    }

    /// String form of the kind, used as the descriptor's string type
    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Fan => "fan",
            SensorKind::Voltage => "voltage",
            SensorKind::Current => "current",
            SensorKind::Power => "power",
            SensorKind::Humidity => "humidity",
            SensorKind::Synthetic => "synthetic",
        }
    }
}

/// Immutable metadata for one hardware or virtual sensor
///
/// Descriptors are produced once by a backend's enumeration pass and never
/// mutated afterwards. The session and the display only ever read them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorDescriptor {
    pub id: SensorId,
    /// Human-readable channel name (e.g. "Tctl" or "k10temp temp1")
    pub name: String,
    /// Driver or chip that exposes the sensor
    pub vendor: String,
    pub kind: SensorKind,
    pub version: i32,
    /// Largest value the sensor can report, in its display unit
    pub max_range: f32,
    /// Smallest distinguishable value step, in its display unit
    pub resolution: f32,
    /// Estimated power draw while sampling, in mA
    pub power_ma: f32,
    /// Minimum supported interval between two samples, in microseconds
    pub min_delay_us: u32,
}

impl SensorDescriptor {
    /// String type of the sensor (derived from its kind)
    pub fn string_type(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Label shown in the selection list
    pub fn label(&self) -> String {
        format!("{}  (Type: {})", self.name, self.kind.code())
    }
}
