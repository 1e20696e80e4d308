//! Platform seams: sensor directory backends and the registration API

use super::error::RegistrationError;
use super::reading::Reading;
use super::sensor::{SensorDescriptor, SensorId};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Requested (not guaranteed) delivery cadence for readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RateHint {
    /// As fast as the sensor allows
    Fastest,
    Game,
    /// Moderate, display-oriented cadence; the application default
    #[default]
    Ui,
    Normal,
}

impl RateHint {
    /// Requested interval between readings
    ///
    /// `Fastest` returns zero and defers entirely to the sensor's own
    /// minimum sample interval.
    pub fn interval(self) -> Duration {
        match self {
            RateHint::Fastest => Duration::ZERO,
            RateHint::Game => Duration::from_millis(20),
            RateHint::Ui => Duration::from_millis(60),
            RateHint::Normal => Duration::from_millis(200),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RateHint::Fastest => "fastest",
            RateHint::Game => "game",
            RateHint::Ui => "ui",
            RateHint::Normal => "normal",
        }
    }
}

impl fmt::Display for RateHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fastest" => Ok(RateHint::Fastest),
            "game" => Ok(RateHint::Game),
            "ui" => Ok(RateHint::Ui),
            "normal" => Ok(RateHint::Normal),
            other => Err(format!(
                "unknown rate '{}' (expected fastest, game, ui or normal)",
                other
            )),
        }
    }
}

/// Trait for sensor directory backends
///
/// A backend enumerates the sensors a platform exposes and reads their
/// current values on demand. Enumeration happens once at startup; the
/// resulting snapshot is never refreshed.
pub trait SensorBackend: Send + Sync {
    /// Backend id used for registry lookup and configuration
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Enumerate the sensors this backend exposes, in platform order
    ///
    /// May return an empty list; the caller decides what that means.
    fn enumerate(&mut self) -> Result<Vec<SensorDescriptor>>;

    /// Read the sensor's current value(s)
    ///
    /// Should be quick (<10ms ideally); called at the registered cadence.
    fn sample(&mut self, sensor: &SensorDescriptor) -> Result<Reading>;

    /// Check if this backend is usable on the current system
    fn is_available(&self) -> bool {
        true
    }
}

/// Type-erased backend for dynamic dispatch
pub type BoxedBackend = Box<dyn SensorBackend>;

/// The platform registration API
///
/// Registration and unregistration are synchronous and never suspend.
/// Implementations own the single registered-sensor slot.
pub trait SensorRegistrar {
    /// Register `sensor` for update delivery at the given cadence
    fn register(
        &mut self,
        sensor: &SensorDescriptor,
        rate: RateHint,
    ) -> Result<(), RegistrationError>;

    /// Drop the registration for `sensor`. Idempotent; unknown ids are ignored.
    fn unregister(&mut self, sensor: SensorId);
}
