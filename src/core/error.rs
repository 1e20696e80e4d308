//! Error types for the session and the platform seams

use thiserror::Error;

/// Platform refusal to register a sensor for updates
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The sensor disappeared between enumeration and registration
    #[error("sensor is no longer present")]
    SensorGone,

    /// The backend cannot deliver updates for this sensor
    #[error("sensor does not support update delivery")]
    Unsupported,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("selection index {0} is out of range")]
    IndexOutOfRange(usize),
}
