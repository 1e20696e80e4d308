//! Core traits and types for sens-probe

mod backend;
mod error;
mod reading;
mod registry;
mod sampler;
mod sensor;
mod session;
mod sink;

pub use backend::{BoxedBackend, RateHint, SensorBackend, SensorRegistrar};
pub use error::{RegistrationError, SessionError};
pub use reading::{accuracy, format_details, format_reading, Reading};
pub use registry::{BackendFactory, Registry};
pub use sampler::Sampler;
pub use sensor::{SensorDescriptor, SensorId, SensorKind};
pub use session::{SelectionState, SensorSession, NO_SENSORS_MESSAGE, WAITING_MESSAGE};
pub use sink::DisplaySink;
