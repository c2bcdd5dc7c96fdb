//! Sequential payload encoding and decoding.
//!
//! Requests are built with a [`PayloadWriter`] that appends fields in wire
//! order and derives the frame length from what was written. Upstream
//! payloads are read back with a [`PayloadReader`].

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use super::command_id::CommandId;
use super::frame::{Frame, FrameError};
use super::types::{AddressMode, FullAddress, SecuritySpec, Status};

/// Appends payload fields in wire order.
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buf: Vec<u8>,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    pub fn put_u8(&mut self, v: u8) -> Result<(), FrameError> {
        self.buf.write_u8(v)?;
        Ok(())
    }

    pub fn put_u16(&mut self, v: u16) -> Result<(), FrameError> {
        self.buf.write_u16::<LittleEndian>(v)?;
        Ok(())
    }

    pub fn put_u32(&mut self, v: u32) -> Result<(), FrameError> {
        self.buf.write_u32::<LittleEndian>(v)?;
        Ok(())
    }

    pub fn put_slice(&mut self, data: &[u8]) -> Result<(), FrameError> {
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Length-checked variable field. The length byte is not written here.
    pub fn put_bounded(
        &mut self,
        field: &'static str,
        data: &[u8],
        max: usize,
    ) -> Result<(), FrameError> {
        check_len(field, data.len(), max)?;
        self.put_slice(data)
    }

    pub fn put_full_address(&mut self, addr: &FullAddress) -> Result<(), FrameError> {
        self.put_u8(addr.mode.as_u8())?;
        self.put_u16(addr.pan_id)?;
        self.put_slice(&addr.wire_address())
    }

    /// Writes the full spec, or a single zero byte when disabled.
    pub fn put_security(&mut self, spec: Option<&SecuritySpec>) -> Result<(), FrameError> {
        match spec {
            Some(s) if s.is_enabled() => {
                self.put_u8(s.security_level)?;
                self.put_u8(s.key_id_mode)?;
                self.put_slice(&s.key_source)?;
                self.put_u8(s.key_index)
            }
            _ => self.put_u8(0),
        }
    }

    pub fn finish(self, command_id: CommandId) -> Result<Frame, FrameError> {
        Frame::new(command_id, self.buf)
    }
}

/// Reject a variable-length field longer than the protocol allows.
pub fn check_len(field: &'static str, len: usize, max: usize) -> Result<u8, FrameError> {
    if len > max || len > u8::MAX as usize {
        return Err(FrameError::FieldTooLong { field, len, max });
    }
    Ok(len as u8)
}

/// Reads payload fields in wire order.
pub struct PayloadReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> PayloadReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len();
        len.saturating_sub(self.cursor.position() as usize)
    }

    fn need(&self, n: usize) -> Result<(), FrameError> {
        let have = self.remaining();
        if have < n {
            let pos = self.cursor.position() as usize;
            return Err(FrameError::Truncated {
                expected: pos + n,
                actual: pos + have,
            });
        }
        Ok(())
    }

    pub fn u8(&mut self) -> Result<u8, FrameError> {
        self.need(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn u16(&mut self) -> Result<u16, FrameError> {
        self.need(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub fn u32(&mut self) -> Result<u32, FrameError> {
        self.need(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn status(&mut self) -> Result<Status, FrameError> {
        Ok(Status(self.u8()?))
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], FrameError> {
        self.need(N)?;
        let mut out = [0u8; N];
        std::io::Read::read_exact(&mut self.cursor, &mut out)?;
        Ok(out)
    }

    pub fn bytes(&mut self, n: usize) -> Result<Vec<u8>, FrameError> {
        self.need(n)?;
        let start = self.cursor.position() as usize;
        let out = self.cursor.get_ref()[start..start + n].to_vec();
        self.cursor.set_position((start + n) as u64);
        Ok(out)
    }

    /// Everything left in the payload.
    pub fn rest(&mut self) -> Vec<u8> {
        let n = self.remaining();
        self.bytes(n).unwrap_or_default()
    }

    pub fn full_address(&mut self) -> Result<FullAddress, FrameError> {
        Ok(FullAddress {
            mode: AddressMode::from_u8(self.u8()?),
            pan_id: self.u16()?,
            address: self.array()?,
        })
    }

    /// Accepts both the full and the zero-compressed form.
    pub fn security(&mut self) -> Result<Option<SecuritySpec>, FrameError> {
        let security_level = self.u8()?;
        if security_level == 0 {
            return Ok(None);
        }
        Ok(Some(SecuritySpec {
            security_level,
            key_id_mode: self.u8()?,
            key_source: self.array()?,
            key_index: self.u8()?,
        }))
    }

    /// Security that may be missing entirely at the end of the payload.
    pub fn trailing_security(&mut self) -> Result<Option<SecuritySpec>, FrameError> {
        if self.remaining() == 0 {
            return Ok(None);
        }
        self.security()
    }
}

/// A downstream primitive.
pub trait Command {
    const ID: CommandId;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError>;

    fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut w = PayloadWriter::new();
        self.encode(&mut w)?;
        w.finish(Self::ID)
    }
}

/// An upstream payload.
pub trait Decode: Sized {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError>;

    fn from_payload(payload: &[u8]) -> Result<Self, FrameError> {
        Self::decode(&mut PayloadReader::new(payload))
    }
}

/// A confirm returned by a synchronous exchange.
pub trait Confirm: Decode {
    /// Offset of the status byte in the payload.
    const STATUS_OFFSET: usize = 0;

    fn status(&self) -> Status;
}

/// A primitive whose confirm is the very next frame on the channel.
pub trait SyncCommand: Command {
    const CONFIRM: CommandId;
    type Confirm: Confirm;
}
