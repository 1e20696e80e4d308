//! Sensor session manager
//!
//! Maintains the invariant that at most one sensor is registered for
//! updates at any time, matching the user's current selection, across
//! selection changes and visibility transitions.

use super::backend::{RateHint, SensorRegistrar};
use super::error::SessionError;
use super::reading::{format_details, format_reading, Reading};
use super::sensor::{SensorDescriptor, SensorId};
use super::sink::DisplaySink;
use log::{debug, warn};

/// Details text shown when the directory snapshot is empty
pub const NO_SENSORS_MESSAGE: &str = "No sensors found on this device.";

/// Values text shown between selection and the first reading
pub const WAITING_MESSAGE: &str = "Waiting for sensor data...";

/// Which sensor, if any, is the active registration target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No snapshot yet
    Uninitialized,
    /// The directory snapshot was empty; terminal state
    Empty,
    /// Snapshot present, nothing selected yet
    Populated,
    /// `sensor` is selected; `registered` tracks whether updates are live
    Active { sensor: SensorId, registered: bool },
}

/// The sensor session manager
///
/// Owns the directory snapshot, the selection state, the registration
/// seam and the display sink. All methods are invoked on one logical
/// thread; no internal locking.
pub struct SensorSession<P: SensorRegistrar, D: DisplaySink> {
    platform: P,
    display: D,
    rate: RateHint,
    sensors: Vec<SensorDescriptor>,
    state: SelectionState,
}

impl<P: SensorRegistrar, D: DisplaySink> SensorSession<P, D> {
    pub fn new(platform: P, display: D, rate: RateHint) -> Self {
        Self {
            platform,
            display,
            rate,
            sensors: Vec::new(),
            state: SelectionState::Uninitialized,
        }
    }

    /// Adopt the directory snapshot and select the first sensor
    ///
    /// An empty snapshot renders the terminal "no sensors" message and
    /// makes every later operation a no-op.
    pub fn initialize(&mut self, snapshot: Vec<SensorDescriptor>) {
        if snapshot.is_empty() {
            debug!("directory snapshot is empty, entering terminal state");
            self.display.set_details(NO_SENSORS_MESSAGE);
            self.state = SelectionState::Empty;
            return;
        }

        debug!("directory snapshot holds {} sensors", snapshot.len());
        self.sensors = snapshot;
        self.state = SelectionState::Populated;

        // Index 0 exists, the snapshot is non-empty
        let _ = self.select_index(0);
    }

    /// The directory snapshot, in enumeration order
    pub fn sensors(&self) -> &[SensorDescriptor] {
        &self.sensors
    }

    /// Selection labels, in enumeration order
    pub fn labels(&self) -> Vec<String> {
        self.sensors.iter().map(|s| s.label()).collect()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// The descriptor of the currently selected sensor, if any
    pub fn selected(&self) -> Option<&SensorDescriptor> {
        match self.state {
            SelectionState::Active { sensor, .. } => self.descriptor(sensor),
            _ => None,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Select the sensor at `index` in the snapshot
    pub fn select_index(&mut self, index: usize) -> Result<(), SessionError> {
        match self.state {
            SelectionState::Uninitialized | SelectionState::Empty => {
                debug!("ignoring selection, session holds no sensors");
                return Ok(());
            }
            _ => {}
        }

        let sensor = self
            .sensors
            .get(index)
            .cloned()
            .ok_or(SessionError::IndexOutOfRange(index))?;
        self.select_sensor(sensor);
        Ok(())
    }

    /// Make `sensor` the active registration target
    fn select_sensor(&mut self, sensor: SensorDescriptor) {
        // Unregister the previous registration first, even when
        // re-selecting the same sensor: two live registrations must
        // never coexist.
        if let SelectionState::Active {
            sensor: current,
            registered: true,
        } = self.state
        {
            self.platform.unregister(current);
        }

        let id = sensor.id;
        self.state = SelectionState::Active {
            sensor: id,
            registered: false,
        };

        self.display.set_details(&format_details(&sensor));
        self.display.set_values(WAITING_MESSAGE);

        match self.platform.register(&sensor, self.rate) {
            Ok(()) => {
                debug!("registered {} ({})", sensor.name, id);
                self.state = SelectionState::Active {
                    sensor: id,
                    registered: true,
                };
            }
            Err(e) => {
                warn!("failed to register {} ({}): {}", sensor.name, id, e);
                self.display
                    .set_values(&format!("Sensor registration failed: {}", e));
            }
        }
    }

    /// Re-assert the current selection's registration (view became visible)
    pub fn on_visible(&mut self) {
        let sensor = match self.state {
            SelectionState::Active { sensor, .. } => sensor,
            _ => return,
        };
        let descriptor = match self.descriptor(sensor) {
            Some(d) => d.clone(),
            None => return,
        };

        match self.platform.register(&descriptor, self.rate) {
            Ok(()) => {
                debug!("re-registered {} ({})", descriptor.name, sensor);
                self.state = SelectionState::Active {
                    sensor,
                    registered: true,
                };
            }
            Err(e) => {
                warn!("failed to re-register {} ({}): {}", descriptor.name, sensor, e);
                self.display
                    .set_values(&format!("Sensor registration failed: {}", e));
                self.state = SelectionState::Active {
                    sensor,
                    registered: false,
                };
            }
        }
    }

    /// Suspend update delivery but remember the selection (view hidden)
    pub fn on_hidden(&mut self) {
        if let SelectionState::Active {
            sensor,
            registered: true,
        } = self.state
        {
            self.platform.unregister(sensor);
            self.state = SelectionState::Active {
                sensor,
                registered: false,
            };
        }
    }

    /// Render a newly delivered reading
    ///
    /// Readings tagged with anything other than the active sensor are
    /// stale leftovers from before a switch and are discarded.
    pub fn on_reading(&mut self, reading: &Reading) {
        let active = match self.state {
            SelectionState::Active { sensor, .. } => sensor,
            _ => return,
        };
        if reading.sensor != active {
            debug!(
                "discarding stale reading from {} while {} is active",
                reading.sensor, active
            );
            return;
        }
        self.display.set_values(&format_reading(reading));
    }

    /// Accuracy change notification. Reserved; deliberately does nothing.
    pub fn on_accuracy_changed(&mut self, _sensor: SensorId, _accuracy: i32) {}

    /// Render a failed sample attempt without tearing the session down
    pub fn on_sample_error(&mut self, message: &str) {
        if let SelectionState::Active { .. } = self.state {
            self.display
                .set_values(&format!("Sensor read failed: {}", message));
        }
    }

    /// Fully unregister on permanent teardown
    pub fn shutdown(&mut self) {
        if let SelectionState::Active {
            sensor,
            registered: true,
        } = self.state
        {
            self.platform.unregister(sensor);
            self.state = SelectionState::Active {
                sensor,
                registered: false,
            };
        }
    }

    fn descriptor(&self, id: SensorId) -> Option<&SensorDescriptor> {
        self.sensors.iter().find(|s| s.id == id)
    }
}
