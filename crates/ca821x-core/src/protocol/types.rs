//! Structured values shared by several primitives.

use std::fmt;

use super::constants::{MAC_MODE_LONG_ADDR, MAC_MODE_NO_ADDR, MAC_MODE_RESERVED, MAC_MODE_SHORT_ADDR};

/// Status byte carried by every confirm.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub u8);

impl Status {
    pub const SUCCESS: Self = Self(0x00);
    pub const ERROR: Self = Self(0x01);
    pub const CANCELLED: Self = Self(0x02);
    pub const READY_FOR_POLL: Self = Self(0x03);
    pub const COUNTER_ERROR: Self = Self(0xDB);
    pub const IMPROPER_KEY_TYPE: Self = Self(0xDC);
    pub const IMPROPER_SECURITY_LEVEL: Self = Self(0xDD);
    pub const UNSUPPORTED_LEGACY: Self = Self(0xDE);
    pub const UNSUPPORTED_SECURITY: Self = Self(0xDF);
    pub const BEACON_LOST: Self = Self(0xE0);
    pub const CHANNEL_ACCESS_FAILURE: Self = Self(0xE1);
    pub const DENIED: Self = Self(0xE2);
    pub const DISABLE_TRX_FAILURE: Self = Self(0xE3);
    pub const SECURITY_ERROR: Self = Self(0xE4);
    pub const FRAME_TOO_LONG: Self = Self(0xE5);
    pub const INVALID_GTS: Self = Self(0xE6);
    pub const INVALID_HANDLE: Self = Self(0xE7);
    pub const INVALID_PARAMETER: Self = Self(0xE8);
    pub const NO_ACK: Self = Self(0xE9);
    pub const NO_BEACON: Self = Self(0xEA);
    pub const NO_DATA: Self = Self(0xEB);
    pub const NO_SHORT_ADDRESS: Self = Self(0xEC);
    pub const OUT_OF_CAP: Self = Self(0xED);
    pub const PAN_ID_CONFLICT: Self = Self(0xEE);
    pub const REALIGNMENT: Self = Self(0xEF);
    pub const TRANSACTION_EXPIRED: Self = Self(0xF0);
    pub const TRANSACTION_OVERFLOW: Self = Self(0xF1);
    pub const TX_ACTIVE: Self = Self(0xF2);
    pub const UNAVAILABLE_KEY: Self = Self(0xF3);
    pub const UNSUPPORTED_ATTRIBUTE: Self = Self(0xF4);
    pub const INVALID_ADDRESS: Self = Self(0xF5);
    pub const ON_TIME_TOO_LONG: Self = Self(0xF6);
    pub const PAST_TIME: Self = Self(0xF7);
    pub const TRACKING_OFF: Self = Self(0xF8);
    pub const INVALID_INDEX: Self = Self(0xF9);
    pub const LIMIT_REACHED: Self = Self(0xFA);
    pub const READ_ONLY: Self = Self(0xFB);
    pub const SCAN_IN_PROGRESS: Self = Self(0xFC);
    pub const SUPERFRAME_OVERLAP: Self = Self(0xFD);
    pub const SYSTEM_ERROR: Self = Self(0xFF);

    // HWME / TDME confirms reuse the low values.
    pub const HWME_UNKNOWN: Self = Self(0x01);
    pub const HWME_INVALID: Self = Self(0x02);
    pub const HWME_NO_ACCESS: Self = Self(0x03);
    pub const TDME_UNKNOWN: Self = Self(0x01);
    pub const TDME_INVALID: Self = Self(0x02);
    pub const TDME_NO_ACCESS: Self = Self(0x03);
    pub const TDME_LO_ERROR: Self = Self(0x04);
    pub const TDME_FCS_ERROR: Self = Self(0x05);
    pub const TDME_SHR_ERROR: Self = Self(0x06);
    pub const TDME_PHR_ERROR: Self = Self(0x07);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// MAC status name.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0x00 => "SUCCESS",
            0x01 => "ERROR",
            0x02 => "CANCELLED",
            0x03 => "READY_FOR_POLL",
            0xDB => "COUNTER_ERROR",
            0xDC => "IMPROPER_KEY_TYPE",
            0xDD => "IMPROPER_SECURITY_LEVEL",
            0xDE => "UNSUPPORTED_LEGACY",
            0xDF => "UNSUPPORTED_SECURITY",
            0xE0 => "BEACON_LOST",
            0xE1 => "CHANNEL_ACCESS_FAILURE",
            0xE2 => "DENIED",
            0xE3 => "DISABLE_TRX_FAILURE",
            0xE4 => "SECURITY_ERROR",
            0xE5 => "FRAME_TOO_LONG",
            0xE6 => "INVALID_GTS",
            0xE7 => "INVALID_HANDLE",
            0xE8 => "INVALID_PARAMETER",
            0xE9 => "NO_ACK",
            0xEA => "NO_BEACON",
            0xEB => "NO_DATA",
            0xEC => "NO_SHORT_ADDRESS",
            0xED => "OUT_OF_CAP",
            0xEE => "PAN_ID_CONFLICT",
            0xEF => "REALIGNMENT",
            0xF0 => "TRANSACTION_EXPIRED",
            0xF1 => "TRANSACTION_OVERFLOW",
            0xF2 => "TX_ACTIVE",
            0xF3 => "UNAVAILABLE_KEY",
            0xF4 => "UNSUPPORTED_ATTRIBUTE",
            0xF5 => "INVALID_ADDRESS",
            0xF6 => "ON_TIME_TOO_LONG",
            0xF7 => "PAST_TIME",
            0xF8 => "TRACKING_OFF",
            0xF9 => "INVALID_INDEX",
            0xFA => "LIMIT_REACHED",
            0xFB => "READ_ONLY",
            0xFC => "SCAN_IN_PROGRESS",
            0xFD => "SUPERFRAME_OVERLAP",
            0xFF => "SYSTEM_ERROR",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Status(0x{:02X} {})", self.0, name),
            None => write!(f, "Status(0x{:02X})", self.0),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

/// Addressing mode of a MAC address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    #[default]
    None,
    Reserved,
    Short,
    Extended,
}

impl AddressMode {
    pub fn as_u8(self) -> u8 {
        match self {
            AddressMode::None => MAC_MODE_NO_ADDR,
            AddressMode::Reserved => MAC_MODE_RESERVED,
            AddressMode::Short => MAC_MODE_SHORT_ADDR,
            AddressMode::Extended => MAC_MODE_LONG_ADDR,
        }
    }

    /// Only the two low bits are significant.
    pub fn from_u8(raw: u8) -> Self {
        match raw & 0x03 {
            MAC_MODE_NO_ADDR => AddressMode::None,
            MAC_MODE_RESERVED => AddressMode::Reserved,
            MAC_MODE_SHORT_ADDR => AddressMode::Short,
            _ => AddressMode::Extended,
        }
    }
}

/// Address with PAN identifier, as carried in most MAC primitives.
///
/// The wire form always reserves eight address bytes; a short address
/// occupies the first two (little-endian) and the rest are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullAddress {
    pub mode: AddressMode,
    pub pan_id: u16,
    pub address: [u8; 8],
}

impl FullAddress {
    pub const WIRE_SIZE: usize = 11;

    pub fn none() -> Self {
        Self::default()
    }

    pub fn short(pan_id: u16, short: u16) -> Self {
        let mut address = [0u8; 8];
        address[..2].copy_from_slice(&short.to_le_bytes());
        Self {
            mode: AddressMode::Short,
            pan_id,
            address,
        }
    }

    pub fn extended(pan_id: u16, address: [u8; 8]) -> Self {
        Self {
            mode: AddressMode::Extended,
            pan_id,
            address,
        }
    }

    /// Address bytes as sent: bytes the mode does not use are zeroed.
    pub fn wire_address(&self) -> [u8; 8] {
        match self.mode {
            AddressMode::Extended => self.address,
            AddressMode::Short => {
                let mut out = [0u8; 8];
                out[..2].copy_from_slice(&self.address[..2]);
                out
            }
            AddressMode::None | AddressMode::Reserved => [0u8; 8],
        }
    }

    /// Short address, if that is the active mode.
    pub fn short_address(&self) -> Option<u16> {
        (self.mode == AddressMode::Short)
            .then(|| u16::from_le_bytes([self.address[0], self.address[1]]))
    }
}

impl fmt::Display for FullAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            AddressMode::None => write!(f, "none"),
            AddressMode::Reserved => write!(f, "reserved"),
            AddressMode::Short => write!(
                f,
                "{:04X}/{:04X}",
                self.pan_id,
                u16::from_le_bytes([self.address[0], self.address[1]])
            ),
            AddressMode::Extended => {
                write!(f, "{:04X}/", self.pan_id)?;
                for b in self.address.iter().rev() {
                    write!(f, "{:02X}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// Auxiliary security parameters attached to many requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecuritySpec {
    pub security_level: u8,
    pub key_id_mode: u8,
    pub key_source: [u8; 8],
    pub key_index: u8,
}

impl SecuritySpec {
    /// Full encoding; a disabled spec takes a single zero byte instead.
    pub const WIRE_SIZE: usize = 11;

    pub fn is_enabled(&self) -> bool {
        self.security_level != 0
    }

    /// Bytes this spec occupies on the wire.
    pub fn wire_len(spec: Option<&SecuritySpec>) -> usize {
        match spec {
            Some(s) if s.is_enabled() => Self::WIRE_SIZE,
            _ => 1,
        }
    }
}

/// PAN descriptor reported in a beacon notification or scan result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanDescriptor {
    pub coord: FullAddress,
    pub logical_channel: u8,
    pub superframe_spec: u16,
    pub gts_permit: u8,
    pub link_quality: u8,
    pub timestamp: u32,
    pub security_failure: u8,
    pub security: Option<SecuritySpec>,
}
