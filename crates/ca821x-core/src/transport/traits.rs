//! Command channel abstraction.
//!
//! Defines the `Transport` trait the exchange engine drives, allowing
//! different implementations (kernel device file, mock, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte-oriented channel to the transceiver.
///
/// One `read` returns at most one frame. An empty buffer means nothing is
/// pending; implementations must not block waiting for data.
pub trait Transport: Send {
    /// Write one complete frame.
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Read one frame, or an empty buffer when none is available.
    fn read(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Check if the channel is still usable.
    fn is_connected(&self) -> bool;
}
