//! Frame layout: `[CommandId:1][Length:1][Payload:Length]`.

use thiserror::Error;

use super::command_id::CommandId;
use super::constants::{FRAME_HEADER_SIZE, MAX_PAYLOAD_SIZE};

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Buffer too small: expected {expected}, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("{field} too long: {len} bytes, max {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One command, confirm or indication.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pub command_id: CommandId,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(command_id: CommandId, payload: Vec<u8>) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::FieldTooLong {
                field: "payload",
                len: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self {
            command_id,
            payload,
        })
    }

    /// Length byte as sent on the wire.
    pub fn length(&self) -> u8 {
        // Bounded by MAX_PAYLOAD_SIZE in every constructor.
        self.payload.len() as u8
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + self.payload.len());
        buf.push(self.command_id.as_u8());
        buf.push(self.length());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Parse one frame from the start of `data`. Bytes past `Length` are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() < FRAME_HEADER_SIZE {
            return Err(FrameError::Truncated {
                expected: FRAME_HEADER_SIZE,
                actual: data.len(),
            });
        }
        let len = data[1] as usize;
        let end = FRAME_HEADER_SIZE + len;
        if data.len() < end {
            return Err(FrameError::Truncated {
                expected: end,
                actual: data.len(),
            });
        }
        Ok(Self {
            command_id: CommandId::from_u8(data[0]),
            payload: data[FRAME_HEADER_SIZE..end].to_vec(),
        })
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({} len={} [", self.command_id, self.payload.len())?;
        for (i, b) in self.payload.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        write!(f, "])")
    }
}
