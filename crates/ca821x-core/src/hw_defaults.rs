//! Register-level defaults for the CA821x.
//!
//! Pure lookups only; [`crate::device::Ca821x`] turns them into SETSFR and
//! GETSFR exchanges.

use std::ops::RangeInclusive;

use crate::protocol::*;

/// One register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SfrWrite {
    pub page: u8,
    pub address: u8,
    pub value: u8,
}

const fn sfr(page: u8, address: u8, value: u8) -> SfrWrite {
    SfrWrite {
        page,
        address,
        value,
    }
}

/// Bring-up register defaults, written in this order.
pub const CHIP_INIT_SEQUENCE: [SfrWrite; 11] = [
    // LNA gain
    sfr(1, 0xE1, 0x29),
    sfr(1, 0xE2, 0x54),
    sfr(1, 0xE3, 0x6C),
    sfr(1, 0xE4, 0x7A),
    sfr(1, 0xE5, 0x84),
    sfr(1, 0xE6, 0x8B),
    sfr(1, 0xE7, 0x92),
    sfr(1, 0xE9, 0x96),
    // Preamble timing and threshold
    sfr(1, 0xD3, 0x5B),
    sfr(1, 0xD1, 0x5A),
    // Tx output power 8 dBm
    sfr(SFR_PACFGIB.0, SFR_PACFGIB.1, 0x3F),
];

/// LO Tx calibration value for a 2.4 GHz channel.
pub fn lo_tx_cal_for_channel(channel: u8) -> u8 {
    match channel {
        25.. => 0xA7,
        23..=24 => 0xA8,
        22 => 0xA9,
        20..=21 => 0xAA,
        17..=19 => 0xAB,
        16 => 0xAC,
        14..=15 => 0xAD,
        12..=13 => 0xAE,
        _ => 0xAF,
    }
}

/// Register write performing channel calibration.
pub fn channel_init_write(channel: u8) -> SfrWrite {
    sfr(SFR_LOTXCAL.0, SFR_LOTXCAL.1, lo_tx_cal_for_channel(channel))
}

/// Sign-extend a 6-bit two's complement dBm value.
pub fn tx_power_dbm(txp: u8) -> i8 {
    let v = txp & 0x3F;
    if v & 0x20 != 0 {
        (v | 0xC0) as i8
    } else {
        v as i8
    }
}

/// Register write selecting the output power closest to `txp`.
pub fn tx_power_write(txp: u8, mpw: bool) -> SfrWrite {
    let dbm = tx_power_dbm(txp);
    if mpw {
        // Two settings only: +4 dBm boost or -6 dBm.
        let paib = if dbm > 0 { 0xD3 } else { 0x73 };
        return sfr(SFR_PACFG.0, SFR_PACFG.1, paib);
    }
    let paib = match dbm {
        9.. => 0x3F,
        8 => 0x32,
        7 => 0x22,
        6 => 0x18,
        5 => 0x10,
        4 => 0x0C,
        3 => 0x08,
        2 => 0x05,
        1 => 0x03,
        0 => 0x01,
        _ => 0x00,
    };
    sfr(SFR_PACFGIB.0, SFR_PACFGIB.1, paib)
}

/// Register holding the PA setting for the silicon revision.
pub fn tx_power_register(mpw: bool) -> (u8, u8) {
    if mpw { SFR_PACFG } else { SFR_PACFGIB }
}

/// Encode a PA register value as phyTransmitPower: 6-bit dBm in bits 0-5,
/// tolerance code in bits 6-7.
pub fn tx_power_from_register(paib: u8, mpw: bool) -> u8 {
    if mpw {
        let dbm: i8 = if paib & 0x80 != 0 { 4 } else { -6 };
        // Tolerance +-3 dB.
        return ((dbm as u8) & 0x3F) | (0x01 << 6);
    }
    let dbm: i8 = match paib {
        0x32.. => 8,
        0x22..=0x31 => 7,
        0x18..=0x21 => 6,
        0x10..=0x17 => 5,
        0x0C..=0x0F => 4,
        0x08..=0x0B => 3,
        0x05..=0x07 => 2,
        0x03..=0x04 => 1,
        0x01..=0x02 => 0,
        0x00 => -1,
    };
    (dbm as u8) & 0x3F
}

/// Range check for PIB attributes the MAC does not validate itself.
///
/// Returns `false` when `value` is out of range for `attribute`, or empty
/// for a single-byte ranged attribute. Attributes without a local rule
/// always pass.
pub fn check_pib_attribute(attribute: u8, value: &[u8]) -> bool {
    if attribute == MAC_BEACON_PAYLOAD {
        return value.len() <= MAX_BEACON_PAYLOAD_LENGTH;
    }
    match (pib_range(attribute), value.first()) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(range), Some(v)) => range.contains(v),
    }
}

fn pib_range(attribute: u8) -> Option<RangeInclusive<u8>> {
    let range = match attribute {
        PHY_TRANSMIT_POWER => 0..=0x3F,
        PHY_CCA_MODE => 0..=0x03,
        MAC_BATT_LIFE_EXT_PERIODS => 6..=41,
        MAC_BEACON_PAYLOAD_LENGTH => 0..=MAX_BEACON_PAYLOAD_LENGTH as u8,
        MAC_BEACON_ORDER | MAC_SUPERFRAME_ORDER => 0..=15,
        MAC_MAX_BE => 3..=8,
        MAC_MAX_CSMA_BACKOFFS => 0..=5,
        MAC_MAX_FRAME_RETRIES => 0..=7,
        MAC_MIN_BE => 0..=8,
        MAC_RESPONSE_WAIT_TIME => 2..=64,
        MAC_ASSOCIATED_PAN_COORD
        | MAC_ASSOCIATION_PERMIT
        | MAC_AUTO_REQUEST
        | MAC_BATT_LIFE_EXT
        | MAC_GTS_PERMIT
        | MAC_PROMISCUOUS_MODE
        | MAC_RX_ON_WHEN_IDLE
        | MAC_SECURITY_ENABLED => 0..=1,
        MAC_AUTO_REQUEST_SECURITY_LEVEL => 0..=7,
        MAC_AUTO_REQUEST_KEY_ID_MODE => 0..=3,
        _ => return None,
    };
    Some(range)
}
