//! Values shared by the encoder tests.

use crate::protocol::SecuritySpec;

/// Encodes as `5C CA` on the wire.
pub const PAN_ID: u16 = 0xCA5C;
pub const DST: [u8; 8] = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
pub const CHANNEL: u8 = 13;

pub fn fixture_security() -> SecuritySpec {
    SecuritySpec {
        security_level: 7,
        key_id_mode: 3,
        key_source: [0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00],
        key_index: 1,
    }
}

/// Security bytes as they follow every fixture frame.
pub const SECURITY_BYTES: [u8; 11] = [
    0x07, 0x03, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x01,
];

/// `id len payload..` with `SECURITY_BYTES` appended `count` times.
pub fn with_security(head: &[u8], count: usize) -> Vec<u8> {
    let mut out = head.to_vec();
    for _ in 0..count {
        out.extend_from_slice(&SECURITY_BYTES);
    }
    out
}
