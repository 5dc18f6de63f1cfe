mod device_errors;
mod framer_errors;
mod log_errors;
mod server_errors;

pub use device_errors::DeviceError;
pub use framer_errors::FramerError;
pub use log_errors::LogError;
pub use server_errors::ServerError;
