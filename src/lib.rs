//! sens-probe: an interactive hardware sensor inspector
//!
//! This library provides the core functionality for sens-probe, including:
//! - The sensor session manager driving selection and registration
//! - Sensor directory backends (hwmon, sysinfo thermal, simulated)
//! - Display sink implementations
//! - Configuration management

pub mod backends;
pub mod config;
pub mod core;
pub mod sinks;

// Re-export commonly used types
pub use config::AppConfig;
pub use core::{
    DisplaySink, RateHint, Reading, Registry, Sampler, SelectionState, SensorBackend,
    SensorDescriptor, SensorId, SensorKind, SensorSession,
};
