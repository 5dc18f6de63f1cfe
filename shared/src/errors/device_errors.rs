use crate::errors::{FramerError, LogError};
use thiserror::Error;

/// Failures from the device surface's read/write/seek/ioctl entry points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceError {
    /// A caller-supplied offset, whence, or ioctl parameter was out of range.
    /// No state change occurred.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    #[error(transparent)]
    Framer(#[from] FramerError),

    #[error(transparent)]
    Log(#[from] LogError),
}

impl From<DeviceError> for std::io::Error {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::InvalidArg(_) => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
            }
            DeviceError::Framer(FramerError::FrameTooLarge { .. }) => {
                std::io::Error::new(std::io::ErrorKind::OutOfMemory, err.to_string())
            }
            DeviceError::Log(LogError::OutOfRange { .. }) => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
            }
        }
    }
}
