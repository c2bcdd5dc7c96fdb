//! Transport layer module.

pub mod device_file;
pub mod mock;
pub mod traits;

pub use device_file::DeviceFileTransport;
pub use mock::MockTransport;
pub use traits::{Transport, TransportError};
