//! Kernel character-device transport (`/dev/ca8210_test`).
//!
//! The driver hands out exactly one frame per `read` and accepts exactly
//! one frame per `write`. The node is opened non-blocking so an idle
//! channel reads as an empty buffer.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use super::traits::{Transport, TransportError};
use crate::protocol::constants::MAX_FRAME_SIZE;

/// Character-device transport.
pub struct DeviceFileTransport {
    file: File,
    path: PathBuf,
    connected: bool,
}

impl DeviceFileTransport {
    /// Open the device node read/write, non-blocking.
    #[instrument(level = "info", fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|source| TransportError::OpenFailed {
                path: path.display().to_string(),
                source,
            })?;

        info!("Device opened successfully");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            connected: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_io(&mut self, e: &std::io::Error) {
        // ENODEV / EIO once the driver unbinds.
        if matches!(e.raw_os_error(), Some(libc::ENODEV) | Some(libc::EIO)) {
            self.connected = false;
        }
    }
}

impl Transport for DeviceFileTransport {
    #[instrument(skip(self, data), fields(len = data.len()))]
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        if !self.connected {
            return Err(TransportError::Disconnected);
        }
        let mut written = 0;
        while written < data.len() {
            match self.file.write(&data[written..]) {
                Ok(0) => {
                    self.connected = false;
                    return Err(TransportError::Disconnected);
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {
                    std::thread::yield_now();
                }
                Err(e) => {
                    self.check_io(&e);
                    return Err(TransportError::WriteFailed(e.to_string()));
                }
            }
        }

        debug!(bytes_written = written, "Write complete");
        Ok(written)
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        if !self.connected {
            return Err(TransportError::Disconnected);
        }
        let mut buf = vec![0u8; MAX_FRAME_SIZE];
        match self.file.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                if n > 0 {
                    debug!(bytes_read = n, "Read complete");
                }
                Ok(buf)
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {
                Ok(Vec::new())
            }
            Err(e) => {
                self.check_io(&e);
                if self.connected {
                    Err(TransportError::ReadFailed(e.to_string()))
                } else {
                    Err(TransportError::Disconnected)
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
