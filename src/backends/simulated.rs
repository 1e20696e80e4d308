//! Simulated sensor backend
//!
//! Synthetic waveform sensors for demos and hardware-free testing.

use crate::core::{accuracy, Reading, SensorBackend, SensorDescriptor, SensorId, SensorKind};
use anyhow::{anyhow, Result};
use std::time::Instant;

/// Waveform period in seconds
const PERIOD: f64 = 5.0;

const MIN_VALUE: f64 = 0.0;
const MAX_VALUE: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
enum Wave {
    Sine,
    Sawtooth,
    Triangle,
    Square,
    /// Three-axis output; exercises multi-value rendering
    Orbit,
}

const WAVES: [(&str, Wave); 5] = [
    ("Sine Wave", Wave::Sine),
    ("Sawtooth Wave", Wave::Sawtooth),
    ("Triangle Wave", Wave::Triangle),
    ("Square Wave", Wave::Square),
    ("Orbit", Wave::Orbit),
];

/// Sensor backend producing time-derived waveforms
pub struct SimulatedBackend {
    start: Instant,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Calculate the wave's value(s) from elapsed time
    fn values(&self, wave: Wave) -> Vec<f32> {
        let elapsed = self.start.elapsed().as_secs_f64();
        let range = MAX_VALUE - MIN_VALUE;

        match wave {
            Wave::Sine => {
                let phase = (elapsed / PERIOD) * std::f64::consts::TAU;
                let normalized = (phase.sin() + 1.0) / 2.0;
                vec![(MIN_VALUE + normalized * range) as f32]
            }
            Wave::Sawtooth => {
                let normalized = (elapsed / PERIOD).fract();
                vec![(MIN_VALUE + normalized * range) as f32]
            }
            Wave::Triangle => {
                let phase = (elapsed / PERIOD).fract() * 2.0;
                let normalized = if phase <= 1.0 { phase } else { 2.0 - phase };
                vec![(MIN_VALUE + normalized * range) as f32]
            }
            Wave::Square => {
                let phase = (elapsed / PERIOD).fract();
                if phase < 0.5 {
                    vec![MIN_VALUE as f32]
                } else {
                    vec![MAX_VALUE as f32]
                }
            }
            Wave::Orbit => {
                let phase = (elapsed / PERIOD) * std::f64::consts::TAU;
                vec![
                    phase.cos() as f32,
                    phase.sin() as f32,
                    (phase / 2.0).sin() as f32,
                ]
            }
        }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBackend for SimulatedBackend {
    fn id(&self) -> &'static str {
        "simulated"
    }

    fn name(&self) -> &'static str {
        "Simulated waveforms"
    }

    fn enumerate(&mut self) -> Result<Vec<SensorDescriptor>> {
        let sensors = WAVES
            .iter()
            .enumerate()
            .map(|(index, (name, wave))| SensorDescriptor {
                id: SensorId(index as u32),
                name: (*name).to_string(),
                vendor: "sens-probe".to_string(),
                kind: SensorKind::Synthetic,
                version: 1,
                max_range: match wave {
                    Wave::Orbit => 1.0,
                    _ => MAX_VALUE as f32,
                },
                resolution: 0.0001,
                power_ma: 0.0,
                min_delay_us: 10_000,
            })
            .collect();
        Ok(sensors)
    }

    fn sample(&mut self, sensor: &SensorDescriptor) -> Result<Reading> {
        let (_, wave) = WAVES
            .get(sensor.id.0 as usize)
            .ok_or_else(|| anyhow!("unknown sensor {}", sensor.id))?;
        Ok(Reading::now(sensor.id, self.values(*wave), accuracy::HIGH))
    }
}
