//! Command identifiers.
//!
//! Every frame starts with a one-byte command id packing a 5-bit message
//! ordinal, a direction bit and a synchronous bit. All ids are fixed at
//! compile time; nothing here computes an id from runtime data.

use std::fmt;

/// Message ordinal mask (bits 0-4).
pub const MID_MASK: u8 = 0x1F;
/// Set on frames travelling chip to host.
pub const S2M: u8 = 0x20;
/// Set on synchronous commands and their confirms.
pub const SYN: u8 = 0x40;

/// One-byte command id of a frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u8);

impl CommandId {
    /// Idle sentinel: no data available.
    pub const IDLE: Self = Self(0xFF);
    /// Negative acknowledge: the chip asks for a resend.
    pub const NACK: Self = Self(0xF0);

    // Downstream (host -> chip)
    pub const MCPS_DATA_REQUEST: Self = Self::downstream(0x00, false);
    pub const MCPS_PURGE_REQUEST: Self = Self::downstream(0x01, true);
    pub const MLME_ASSOCIATE_REQUEST: Self = Self::downstream(0x02, false);
    pub const MLME_ASSOCIATE_RESPONSE: Self = Self::downstream(0x03, false);
    pub const MLME_DISASSOCIATE_REQUEST: Self = Self::downstream(0x04, false);
    pub const MLME_GET_REQUEST: Self = Self::downstream(0x05, true);
    pub const MLME_ORPHAN_RESPONSE: Self = Self::downstream(0x06, false);
    pub const MLME_RESET_REQUEST: Self = Self::downstream(0x07, true);
    pub const MLME_RX_ENABLE_REQUEST: Self = Self::downstream(0x08, true);
    pub const MLME_SCAN_REQUEST: Self = Self::downstream(0x09, false);
    pub const MLME_SET_REQUEST: Self = Self::downstream(0x0A, true);
    pub const MLME_START_REQUEST: Self = Self::downstream(0x0B, true);
    pub const MLME_SYNC_REQUEST: Self = Self::downstream(0x0C, false);
    pub const MLME_POLL_REQUEST: Self = Self::downstream(0x0D, true);
    pub const HWME_SET_REQUEST: Self = Self::downstream(0x0E, true);
    pub const HWME_GET_REQUEST: Self = Self::downstream(0x0F, true);
    pub const HWME_HAES_REQUEST: Self = Self::downstream(0x10, true);
    pub const TDME_SETSFR_REQUEST: Self = Self::downstream(0x11, true);
    pub const TDME_GETSFR_REQUEST: Self = Self::downstream(0x12, true);
    pub const TDME_TESTMODE_REQUEST: Self = Self::downstream(0x13, true);
    pub const TDME_SET_REQUEST: Self = Self::downstream(0x14, true);
    pub const TDME_TXPKT_REQUEST: Self = Self::downstream(0x15, true);
    pub const TDME_LOTLK_REQUEST: Self = Self::downstream(0x16, true);

    // Upstream (chip -> host)
    pub const MCPS_DATA_INDICATION: Self = Self::upstream(0x00, false);
    pub const MCPS_DATA_CONFIRM: Self = Self::upstream(0x01, false);
    pub const MCPS_PURGE_CONFIRM: Self = Self::upstream(0x02, true);
    pub const MLME_ASSOCIATE_INDICATION: Self = Self::upstream(0x03, false);
    pub const MLME_ASSOCIATE_CONFIRM: Self = Self::upstream(0x04, false);
    pub const MLME_DISASSOCIATE_INDICATION: Self = Self::upstream(0x05, false);
    pub const MLME_DISASSOCIATE_CONFIRM: Self = Self::upstream(0x06, false);
    pub const MLME_BEACON_NOTIFY_INDICATION: Self = Self::upstream(0x07, false);
    pub const MLME_GET_CONFIRM: Self = Self::upstream(0x08, true);
    pub const MLME_ORPHAN_INDICATION: Self = Self::upstream(0x09, false);
    pub const MLME_RESET_CONFIRM: Self = Self::upstream(0x0A, true);
    pub const MLME_RX_ENABLE_CONFIRM: Self = Self::upstream(0x0B, true);
    pub const MLME_SCAN_CONFIRM: Self = Self::upstream(0x0C, false);
    pub const MLME_COMM_STATUS_INDICATION: Self = Self::upstream(0x0D, false);
    pub const MLME_SET_CONFIRM: Self = Self::upstream(0x0E, true);
    pub const MLME_START_CONFIRM: Self = Self::upstream(0x0F, true);
    pub const MLME_SYNC_LOSS_INDICATION: Self = Self::upstream(0x10, false);
    pub const MLME_POLL_CONFIRM: Self = Self::upstream(0x11, true);
    pub const HWME_SET_CONFIRM: Self = Self::upstream(0x12, true);
    pub const HWME_GET_CONFIRM: Self = Self::upstream(0x13, true);
    pub const HWME_HAES_CONFIRM: Self = Self::upstream(0x14, true);
    pub const HWME_WAKEUP_INDICATION: Self = Self::upstream(0x15, false);
    pub const TDME_MESSAGE_INDICATION: Self = Self::upstream(0x16, false);
    pub const TDME_SETSFR_CONFIRM: Self = Self::upstream(0x17, true);
    pub const TDME_GETSFR_CONFIRM: Self = Self::upstream(0x18, true);
    pub const TDME_TESTMODE_CONFIRM: Self = Self::upstream(0x19, true);
    pub const TDME_SET_CONFIRM: Self = Self::upstream(0x1A, true);
    pub const TDME_TXPKT_CONFIRM: Self = Self::upstream(0x1B, true);
    pub const TDME_RXPKT_INDICATION: Self = Self::upstream(0x1C, false);
    pub const TDME_EDDET_INDICATION: Self = Self::upstream(0x1D, false);
    pub const TDME_ERROR_INDICATION: Self = Self::upstream(0x1E, false);
    pub const TDME_LOTLK_CONFIRM: Self = Self::upstream(0x1F, true);

    /// Host-to-chip id for a message ordinal.
    pub const fn downstream(ordinal: u8, sync: bool) -> Self {
        Self((ordinal & MID_MASK) | if sync { SYN } else { 0 })
    }

    /// Chip-to-host id for a message ordinal.
    pub const fn upstream(ordinal: u8, sync: bool) -> Self {
        Self((ordinal & MID_MASK) | S2M | if sync { SYN } else { 0 })
    }

    /// Wrap a raw byte read off the wire.
    pub const fn from_u8(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Message ordinal (bits 0-4).
    pub const fn ordinal(self) -> u8 {
        self.0 & MID_MASK
    }

    pub const fn is_upstream(self) -> bool {
        self.0 & S2M != 0
    }

    pub const fn is_sync(self) -> bool {
        self.0 & SYN != 0
    }

    /// Idle or NACK, neither of which carries a message.
    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::IDLE.0 || self.0 == Self::NACK.0
    }

    /// Primitive name, or `None` for ids outside both tables.
    pub fn name(self) -> Option<&'static str> {
        if self == Self::IDLE {
            return Some("IDLE");
        }
        if self == Self::NACK {
            return Some("NACK");
        }
        if self.0 & 0x80 != 0 {
            return None;
        }
        let table: &[(Self, &'static str)] = if self.is_upstream() {
            UPSTREAM_NAMES
        } else {
            DOWNSTREAM_NAMES
        };
        table
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, name)| *name)
    }
}

const DOWNSTREAM_NAMES: &[(CommandId, &str)] = &[
    (CommandId::MCPS_DATA_REQUEST, "MCPS-DATA.request"),
    (CommandId::MCPS_PURGE_REQUEST, "MCPS-PURGE.request"),
    (CommandId::MLME_ASSOCIATE_REQUEST, "MLME-ASSOCIATE.request"),
    (CommandId::MLME_ASSOCIATE_RESPONSE, "MLME-ASSOCIATE.response"),
    (CommandId::MLME_DISASSOCIATE_REQUEST, "MLME-DISASSOCIATE.request"),
    (CommandId::MLME_GET_REQUEST, "MLME-GET.request"),
    (CommandId::MLME_ORPHAN_RESPONSE, "MLME-ORPHAN.response"),
    (CommandId::MLME_RESET_REQUEST, "MLME-RESET.request"),
    (CommandId::MLME_RX_ENABLE_REQUEST, "MLME-RX-ENABLE.request"),
    (CommandId::MLME_SCAN_REQUEST, "MLME-SCAN.request"),
    (CommandId::MLME_SET_REQUEST, "MLME-SET.request"),
    (CommandId::MLME_START_REQUEST, "MLME-START.request"),
    (CommandId::MLME_SYNC_REQUEST, "MLME-SYNC.request"),
    (CommandId::MLME_POLL_REQUEST, "MLME-POLL.request"),
    (CommandId::HWME_SET_REQUEST, "HWME-SET.request"),
    (CommandId::HWME_GET_REQUEST, "HWME-GET.request"),
    (CommandId::HWME_HAES_REQUEST, "HWME-HAES.request"),
    (CommandId::TDME_SETSFR_REQUEST, "TDME-SETSFR.request"),
    (CommandId::TDME_GETSFR_REQUEST, "TDME-GETSFR.request"),
    (CommandId::TDME_TESTMODE_REQUEST, "TDME-TESTMODE.request"),
    (CommandId::TDME_SET_REQUEST, "TDME-SET.request"),
    (CommandId::TDME_TXPKT_REQUEST, "TDME-TXPKT.request"),
    (CommandId::TDME_LOTLK_REQUEST, "TDME-LOTLK.request"),
];

const UPSTREAM_NAMES: &[(CommandId, &str)] = &[
    (CommandId::MCPS_DATA_INDICATION, "MCPS-DATA.indication"),
    (CommandId::MCPS_DATA_CONFIRM, "MCPS-DATA.confirm"),
    (CommandId::MCPS_PURGE_CONFIRM, "MCPS-PURGE.confirm"),
    (CommandId::MLME_ASSOCIATE_INDICATION, "MLME-ASSOCIATE.indication"),
    (CommandId::MLME_ASSOCIATE_CONFIRM, "MLME-ASSOCIATE.confirm"),
    (CommandId::MLME_DISASSOCIATE_INDICATION, "MLME-DISASSOCIATE.indication"),
    (CommandId::MLME_DISASSOCIATE_CONFIRM, "MLME-DISASSOCIATE.confirm"),
    (CommandId::MLME_BEACON_NOTIFY_INDICATION, "MLME-BEACON-NOTIFY.indication"),
    (CommandId::MLME_GET_CONFIRM, "MLME-GET.confirm"),
    (CommandId::MLME_ORPHAN_INDICATION, "MLME-ORPHAN.indication"),
    (CommandId::MLME_RESET_CONFIRM, "MLME-RESET.confirm"),
    (CommandId::MLME_RX_ENABLE_CONFIRM, "MLME-RX-ENABLE.confirm"),
    (CommandId::MLME_SCAN_CONFIRM, "MLME-SCAN.confirm"),
    (CommandId::MLME_COMM_STATUS_INDICATION, "MLME-COMM-STATUS.indication"),
    (CommandId::MLME_SET_CONFIRM, "MLME-SET.confirm"),
    (CommandId::MLME_START_CONFIRM, "MLME-START.confirm"),
    (CommandId::MLME_SYNC_LOSS_INDICATION, "MLME-SYNC-LOSS.indication"),
    (CommandId::MLME_POLL_CONFIRM, "MLME-POLL.confirm"),
    (CommandId::HWME_SET_CONFIRM, "HWME-SET.confirm"),
    (CommandId::HWME_GET_CONFIRM, "HWME-GET.confirm"),
    (CommandId::HWME_HAES_CONFIRM, "HWME-HAES.confirm"),
    (CommandId::HWME_WAKEUP_INDICATION, "HWME-WAKEUP.indication"),
    (CommandId::TDME_MESSAGE_INDICATION, "TDME-MESSAGE.indication"),
    (CommandId::TDME_SETSFR_CONFIRM, "TDME-SETSFR.confirm"),
    (CommandId::TDME_GETSFR_CONFIRM, "TDME-GETSFR.confirm"),
    (CommandId::TDME_TESTMODE_CONFIRM, "TDME-TESTMODE.confirm"),
    (CommandId::TDME_SET_CONFIRM, "TDME-SET.confirm"),
    (CommandId::TDME_TXPKT_CONFIRM, "TDME-TXPKT.confirm"),
    (CommandId::TDME_RXPKT_INDICATION, "TDME-RXPKT.indication"),
    (CommandId::TDME_EDDET_INDICATION, "TDME-EDDET.indication"),
    (CommandId::TDME_ERROR_INDICATION, "TDME-ERROR.indication"),
    (CommandId::TDME_LOTLK_CONFIRM, "TDME-LOTLK.confirm"),
];

impl From<u8> for CommandId {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "CommandId(0x{:02X} {})", self.0, name),
            None => write!(f, "CommandId(0x{:02X})", self.0),
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_match_wire_values() {
        assert_eq!(CommandId::MCPS_DATA_REQUEST.as_u8(), 0x00);
        assert_eq!(CommandId::MCPS_PURGE_REQUEST.as_u8(), 0x41);
        assert_eq!(CommandId::MLME_GET_REQUEST.as_u8(), 0x45);
        assert_eq!(CommandId::MLME_SCAN_REQUEST.as_u8(), 0x09);
        assert_eq!(CommandId::MLME_SYNC_REQUEST.as_u8(), 0x0C);
        assert_eq!(CommandId::TDME_LOTLK_REQUEST.as_u8(), 0x56);
    }

    #[test]
    fn test_upstream_ids_match_wire_values() {
        assert_eq!(CommandId::MCPS_DATA_INDICATION.as_u8(), 0x20);
        assert_eq!(CommandId::MCPS_PURGE_CONFIRM.as_u8(), 0x62);
        assert_eq!(CommandId::MLME_GET_CONFIRM.as_u8(), 0x68);
        assert_eq!(CommandId::MLME_SCAN_CONFIRM.as_u8(), 0x2C);
        assert_eq!(CommandId::TDME_ERROR_INDICATION.as_u8(), 0x3E);
        assert_eq!(CommandId::TDME_LOTLK_CONFIRM.as_u8(), 0x7F);
    }

    #[test]
    fn test_bit_fields() {
        let id = CommandId::HWME_GET_CONFIRM;
        assert!(id.is_upstream());
        assert!(id.is_sync());
        assert_eq!(id.ordinal(), 0x13);

        let id = CommandId::MLME_ASSOCIATE_REQUEST;
        assert!(!id.is_upstream());
        assert!(!id.is_sync());
    }

    #[test]
    fn test_names() {
        assert_eq!(CommandId::IDLE.name(), Some("IDLE"));
        assert_eq!(CommandId::from_u8(0x6A).name(), Some("MLME-RESET.confirm"));
        assert_eq!(CommandId::from_u8(0x1F).name(), None);
        assert_eq!(CommandId::from_u8(0x85).name(), None);
        assert_eq!(format!("{}", CommandId::from_u8(0x3F)), "0x3F");
    }
}
