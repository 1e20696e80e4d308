//! Sampling host
//!
//! Adapts pull-style backends to the push-style event contract: owns the
//! single registered-sensor slot and emits a reading whenever the active
//! sensor's sampling interval has elapsed.

use super::backend::{BoxedBackend, RateHint, SensorRegistrar};
use super::error::RegistrationError;
use super::reading::Reading;
use super::sensor::{SensorDescriptor, SensorId};
use anyhow::Result;
use log::debug;
use std::time::{Duration, Instant};

/// The single live registration
struct ActiveRegistration {
    descriptor: SensorDescriptor,
    /// Effective sampling interval: the rate hint clamped to the
    /// sensor's minimum sample interval
    interval: Duration,
    last_emit: Option<Instant>,
}

/// Polls the active sensor of a backend at its registered cadence
pub struct Sampler {
    backend: BoxedBackend,
    active: Option<ActiveRegistration>,
}

impl Sampler {
    pub fn new(backend: BoxedBackend) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    /// Effective interval for `sensor` under `rate`
    fn effective_interval(sensor: &SensorDescriptor, rate: RateHint) -> Duration {
        rate.interval()
            .max(Duration::from_micros(u64::from(sensor.min_delay_us)))
    }

    /// Produce a reading if the active sensor is due at `now`
    ///
    /// Returns `Ok(None)` when nothing is registered or the interval has
    /// not elapsed yet. A sampling failure is surfaced to the caller; the
    /// registration stays live and the next poll retries on schedule.
    pub fn poll(&mut self, now: Instant) -> Result<Option<Reading>> {
        let active = match self.active.as_mut() {
            Some(a) => a,
            None => return Ok(None),
        };

        if let Some(last) = active.last_emit {
            if now.duration_since(last) < active.interval {
                return Ok(None);
            }
        }
        active.last_emit = Some(now);

        let reading = self.backend.sample(&active.descriptor)?;
        Ok(Some(reading))
    }

    /// The id of the currently registered sensor, if any
    pub fn registered(&self) -> Option<SensorId> {
        self.active.as_ref().map(|a| a.descriptor.id)
    }
}

impl SensorRegistrar for Sampler {
    fn register(
        &mut self,
        sensor: &SensorDescriptor,
        rate: RateHint,
    ) -> Result<(), RegistrationError> {
        // Probe the sensor once so a dead channel fails at registration
        // time instead of producing an error on every later poll
        self.backend
            .sample(sensor)
            .map_err(|_| RegistrationError::SensorGone)?;

        let interval = Self::effective_interval(sensor, rate);
        debug!(
            "registering {} ({}) at {:?}",
            sensor.name, sensor.id, interval
        );
        self.active = Some(ActiveRegistration {
            descriptor: sensor.clone(),
            interval,
            last_emit: None,
        });
        Ok(())
    }

    fn unregister(&mut self, sensor: SensorId) {
        match &self.active {
            Some(active) if active.descriptor.id == sensor => {
                debug!("unregistering {}", sensor);
                self.active = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::SensorBackend;
    use crate::core::reading::accuracy;
    use crate::core::sensor::SensorKind;
    use anyhow::anyhow;

    /// Backend double returning a fixed value per sensor
    struct ScriptedBackend {
        sensors: Vec<SensorDescriptor>,
        /// Ids whose sample calls should fail
        broken: Vec<SensorId>,
    }

    impl ScriptedBackend {
        fn new(sensors: Vec<SensorDescriptor>) -> Self {
            Self {
                sensors,
                broken: Vec::new(),
            }
        }
    }

    impl SensorBackend for ScriptedBackend {
        fn id(&self) -> &'static str {
            "scripted"
        }

        fn name(&self) -> &'static str {
            "Scripted"
        }

        fn enumerate(&mut self) -> Result<Vec<SensorDescriptor>> {
            Ok(self.sensors.clone())
        }

        fn sample(&mut self, sensor: &SensorDescriptor) -> Result<Reading> {
            if self.broken.contains(&sensor.id) {
                return Err(anyhow!("channel vanished"));
            }
            Ok(Reading::now(sensor.id, vec![21.5], accuracy::HIGH))
        }
    }

    fn descriptor(id: u32, min_delay_us: u32) -> SensorDescriptor {
        SensorDescriptor {
            id: SensorId(id),
            name: format!("sensor-{}", id),
            vendor: "scripted".to_string(),
            kind: SensorKind::Temperature,
            version: 1,
            max_range: 120.0,
            resolution: 0.001,
            power_ma: 0.0,
            min_delay_us,
        }
    }

    fn sampler_with(sensors: Vec<SensorDescriptor>) -> Sampler {
        Sampler::new(Box::new(ScriptedBackend::new(sensors)))
    }

    #[test]
    fn test_poll_without_registration_emits_nothing() {
        let mut sampler = sampler_with(vec![descriptor(0, 1_000)]);
        assert!(sampler.poll(Instant::now()).unwrap().is_none());
    }

    #[test]
    fn test_poll_respects_the_registered_interval() {
        let sensor = descriptor(0, 1_000);
        let mut sampler = sampler_with(vec![sensor.clone()]);
        sampler.register(&sensor, RateHint::Ui).unwrap();

        let t0 = Instant::now();
        let first = sampler.poll(t0).unwrap();
        assert!(first.is_some(), "first poll after registration is due");
        assert_eq!(first.unwrap().sensor, SensorId(0));

        // 10ms later: not due at the 60ms UI cadence
        assert!(sampler
            .poll(t0 + Duration::from_millis(10))
            .unwrap()
            .is_none());

        // 60ms later: due again
        assert!(sampler
            .poll(t0 + Duration::from_millis(60))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_interval_is_clamped_to_the_sensor_minimum() {
        // 250ms minimum beats the 60ms UI hint
        let sensor = descriptor(0, 250_000);
        assert_eq!(
            Sampler::effective_interval(&sensor, RateHint::Ui),
            Duration::from_millis(250)
        );

        // Fastest defers entirely to the sensor
        assert_eq!(
            Sampler::effective_interval(&sensor, RateHint::Fastest),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_register_replaces_the_previous_slot() {
        let a = descriptor(0, 1_000);
        let b = descriptor(1, 1_000);
        let mut sampler = sampler_with(vec![a.clone(), b.clone()]);

        sampler.register(&a, RateHint::Ui).unwrap();
        sampler.register(&b, RateHint::Ui).unwrap();
        assert_eq!(sampler.registered(), Some(SensorId(1)));

        let reading = sampler.poll(Instant::now()).unwrap().unwrap();
        assert_eq!(reading.sensor, SensorId(1));
    }

    #[test]
    fn test_unregister_is_idempotent_and_ignores_unknown_ids() {
        let sensor = descriptor(0, 1_000);
        let mut sampler = sampler_with(vec![sensor.clone()]);
        sampler.register(&sensor, RateHint::Ui).unwrap();

        sampler.unregister(SensorId(5));
        assert_eq!(sampler.registered(), Some(SensorId(0)));

        sampler.unregister(SensorId(0));
        sampler.unregister(SensorId(0));
        assert_eq!(sampler.registered(), None);
    }

    #[test]
    fn test_registering_a_dead_channel_fails() {
        let sensor = descriptor(0, 1_000);
        let mut backend = ScriptedBackend::new(vec![sensor.clone()]);
        backend.broken.push(SensorId(0));
        let mut sampler = Sampler::new(Box::new(backend));

        assert!(matches!(
            sampler.register(&sensor, RateHint::Ui),
            Err(RegistrationError::SensorGone)
        ));
        assert_eq!(sampler.registered(), None);
    }
}
