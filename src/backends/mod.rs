//! Built-in sensor directory backends
//!
//! Each backend enumerates the sensors one platform surface exposes and
//! reads their current values on demand.

mod hwmon;
mod simulated;
mod thermal;

pub use hwmon::HwmonBackend;
pub use simulated::SimulatedBackend;
pub use thermal::ThermalBackend;

use crate::core::Registry;

/// Register all built-in backends
pub fn register_all(registry: &mut Registry) {
    registry.register_backend("hwmon", || Box::new(HwmonBackend::new()));
    registry.register_backend("thermal", || Box::new(ThermalBackend::new()));
    registry.register_backend("simulated", || Box::new(SimulatedBackend::new()));
}
