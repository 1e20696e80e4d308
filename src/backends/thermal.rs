//! Thermal sensor backend backed by sysinfo
//!
//! This module keeps a single process-wide component list that is
//! initialized once and shared between enumeration and sampling, so the
//! expensive sensor discovery happens only one time.

use crate::core::{accuracy, Reading, SensorBackend, SensorDescriptor, SensorId, SensorKind};
use anyhow::{anyhow, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use sysinfo::Components;

/// Minimum interval between component refreshes
///
/// Prevents redundant refreshes when enumeration and sampling read the
/// list back to back.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Shared components with refresh timestamp
struct SharedComponents {
    components: Components,
    last_refresh: Instant,
}

impl SharedComponents {
    fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
            last_refresh: Instant::now(),
        }
    }

    fn refresh_if_needed(&mut self) {
        if self.last_refresh.elapsed() >= MIN_REFRESH_INTERVAL {
            self.components.refresh();
            self.last_refresh = Instant::now();
        }
    }
}

static SHARED_COMPONENTS: Lazy<Mutex<SharedComponents>> = Lazy::new(|| {
    info!("initializing shared thermal components (one-time)");
    let shared = SharedComponents::new();
    info!("{} thermal components found", shared.components.len());
    Mutex::new(shared)
});

/// Run `f` against the refreshed shared component list
fn with_components<T>(f: impl FnOnce(&Components) -> T) -> T {
    let mut shared = SHARED_COMPONENTS.lock().unwrap_or_else(|poisoned| {
        warn!("shared thermal components mutex was poisoned, recovering");
        poisoned.into_inner()
    });
    shared.refresh_if_needed();
    f(&shared.components)
}

/// Sensor backend over sysinfo's thermal components
pub struct ThermalBackend;

impl ThermalBackend {
    pub fn new() -> Self {
        // Front-load discovery so the first sample is cheap
        Lazy::force(&SHARED_COMPONENTS);
        Self
    }
}

impl Default for ThermalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBackend for ThermalBackend {
    fn id(&self) -> &'static str {
        "thermal"
    }

    fn name(&self) -> &'static str {
        "Thermal components (sysinfo)"
    }

    fn enumerate(&mut self) -> Result<Vec<SensorDescriptor>> {
        let sensors = with_components(|components| {
            components
                .iter()
                .enumerate()
                .map(|(index, component)| SensorDescriptor {
                    id: SensorId(index as u32),
                    name: component.label().to_string(),
                    vendor: "sysinfo".to_string(),
                    kind: SensorKind::Temperature,
                    version: 1,
                    max_range: component.critical().unwrap_or_else(|| component.max()),
                    resolution: 0.01,
                    power_ma: 0.0,
                    min_delay_us: MIN_REFRESH_INTERVAL.as_micros() as u32,
                })
                .collect()
        });
        Ok(sensors)
    }

    fn sample(&mut self, sensor: &SensorDescriptor) -> Result<Reading> {
        let temperature = with_components(|components| {
            components
                .iter()
                .find(|c| c.label() == sensor.name)
                .map(|c| c.temperature())
        })
        .ok_or_else(|| anyhow!("thermal component '{}' is no longer present", sensor.name))?;

        Ok(Reading::now(sensor.id, vec![temperature], accuracy::HIGH))
    }

    fn is_available(&self) -> bool {
        with_components(|components| !components.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_yields_sequential_temperature_descriptors() {
        let mut backend = ThermalBackend::new();
        let sensors = backend.enumerate().unwrap();

        for (index, sensor) in sensors.iter().enumerate() {
            assert_eq!(sensor.id, SensorId(index as u32));
            assert_eq!(sensor.kind, SensorKind::Temperature);
            assert_eq!(sensor.min_delay_us, 250_000);
        }
    }
}
