pub mod entry;
pub mod framer;
pub mod log;
pub mod surface;

pub use entry::Entry;
pub use framer::WriteFramer;
pub use log::CircularLog;
pub use surface::{DeviceSurface, SeekTo};
