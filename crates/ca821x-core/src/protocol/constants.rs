//! Protocol constants for the CA821x command interface.
//!
//! Attribute identifiers follow IEEE 802.15.4-2006 (PIB) and the Cascoda
//! HWME/TDME definitions.

// ============================================================================
// Size Constants
// ============================================================================

/// Frame header: command id + length.
pub const FRAME_HEADER_SIZE: usize = 2;
/// Largest payload a single frame can carry.
pub const MAX_PAYLOAD_SIZE: usize = 254;
/// Largest buffer a transport read must accept.
pub const MAX_FRAME_SIZE: usize = FRAME_HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// aMaxMACPayloadSize for an MCPS-DATA.request.
pub const MAX_DATA_SIZE: usize = 114;
/// Largest PIB attribute value carried by MLME-SET / MLME-GET.
pub const MAX_ATTRIBUTE_SIZE: usize = 250;
/// Largest HWME attribute value.
pub const MAX_HWME_ATTRIBUTE_SIZE: usize = 16;
/// Largest TDME attribute value.
pub const MAX_TDME_ATTRIBUTE_SIZE: usize = 2;
/// Largest test packet for TDME-TXPKT / TDME-RXPKT.
pub const MAX_TEST_PACKET_SIZE: usize = 128;
/// HAES block size.
pub const HAES_DATA_SIZE: usize = 16;

pub const MAX_PHY_PACKET_SIZE: usize = 127;
pub const MAX_BEACON_OVERHEAD: usize = 75;
/// aMaxBeaconPayloadLength
pub const MAX_BEACON_PAYLOAD_LENGTH: usize = MAX_PHY_PACKET_SIZE - MAX_BEACON_OVERHEAD;

// ============================================================================
// Address Modes
// ============================================================================

pub const MAC_MODE_NO_ADDR: u8 = 0x00;
pub const MAC_MODE_RESERVED: u8 = 0x01;
pub const MAC_MODE_SHORT_ADDR: u8 = 0x02;
pub const MAC_MODE_LONG_ADDR: u8 = 0x03;

// ============================================================================
// Scan Types
// ============================================================================

pub const ENERGY_DETECT: u8 = 0x00;
pub const ACTIVE_SCAN: u8 = 0x01;
pub const PASSIVE_SCAN: u8 = 0x02;
pub const ORPHAN_SCAN: u8 = 0x03;

// ============================================================================
// PHY PIB Attributes
// ============================================================================

pub const PHY_CURRENT_CHANNEL: u8 = 0x00;
pub const PHY_CHANNELS_SUPPORTED: u8 = 0x01;
pub const PHY_TRANSMIT_POWER: u8 = 0x02;
pub const PHY_CCA_MODE: u8 = 0x03;
pub const PHY_CURRENT_PAGE: u8 = 0x04;
pub const PHY_MAX_FRAME_DURATION: u8 = 0x05;
pub const PHY_SHR_DURATION: u8 = 0x06;
pub const PHY_SYMBOLS_PER_OCTET: u8 = 0x07;

// ============================================================================
// MAC PIB Attributes
// ============================================================================

pub const MAC_ACK_WAIT_DURATION: u8 = 0x40;
pub const MAC_ASSOCIATION_PERMIT: u8 = 0x41;
pub const MAC_AUTO_REQUEST: u8 = 0x42;
pub const MAC_BATT_LIFE_EXT: u8 = 0x43;
pub const MAC_BATT_LIFE_EXT_PERIODS: u8 = 0x44;
pub const MAC_BEACON_PAYLOAD: u8 = 0x45;
pub const MAC_BEACON_PAYLOAD_LENGTH: u8 = 0x46;
pub const MAC_BEACON_ORDER: u8 = 0x47;
pub const MAC_BEACON_TX_TIME: u8 = 0x48;
pub const MAC_BSN: u8 = 0x49;
pub const MAC_COORD_EXTENDED_ADDRESS: u8 = 0x4a;
pub const MAC_COORD_SHORT_ADDRESS: u8 = 0x4b;
pub const MAC_DSN: u8 = 0x4c;
pub const MAC_GTS_PERMIT: u8 = 0x4d;
pub const MAC_MAX_CSMA_BACKOFFS: u8 = 0x4e;
pub const MAC_MIN_BE: u8 = 0x4f;
pub const MAC_PAN_ID: u8 = 0x50;
pub const MAC_PROMISCUOUS_MODE: u8 = 0x51;
pub const MAC_RX_ON_WHEN_IDLE: u8 = 0x52;
pub const MAC_SHORT_ADDRESS: u8 = 0x53;
pub const MAC_SUPERFRAME_ORDER: u8 = 0x54;
pub const MAC_TRANSACTION_PERSISTENCE_TIME: u8 = 0x55;
pub const MAC_ASSOCIATED_PAN_COORD: u8 = 0x56;
pub const MAC_MAX_BE: u8 = 0x57;
pub const MAC_MAX_FRAME_TOTAL_WAIT_TIME: u8 = 0x58;
pub const MAC_MAX_FRAME_RETRIES: u8 = 0x59;
pub const MAC_RESPONSE_WAIT_TIME: u8 = 0x5a;
pub const MAC_SYNC_SYMBOL_OFFSET: u8 = 0x5b;
pub const MAC_TIMESTAMP_SUPPORTED: u8 = 0x5c;
pub const MAC_SECURITY_ENABLED: u8 = 0x5d;

// ============================================================================
// MAC Security PIB Attributes
// ============================================================================

pub const MAC_KEY_TABLE: u8 = 0x71;
pub const MAC_KEY_TABLE_ENTRIES: u8 = 0x72;
pub const MAC_DEVICE_TABLE: u8 = 0x73;
pub const MAC_DEVICE_TABLE_ENTRIES: u8 = 0x74;
pub const MAC_SECURITY_LEVEL_TABLE: u8 = 0x75;
pub const MAC_SECURITY_LEVEL_TABLE_ENTRIES: u8 = 0x76;
pub const MAC_FRAME_COUNTER: u8 = 0x77;
pub const MAC_AUTO_REQUEST_SECURITY_LEVEL: u8 = 0x78;
pub const MAC_AUTO_REQUEST_KEY_ID_MODE: u8 = 0x79;
pub const MAC_AUTO_REQUEST_KEY_SOURCE: u8 = 0x7a;
pub const MAC_AUTO_REQUEST_KEY_INDEX: u8 = 0x7b;
pub const MAC_DEFAULT_KEY_SOURCE: u8 = 0x7c;
pub const MAC_PAN_COORD_EXTENDED_ADDRESS: u8 = 0x7d;
pub const MAC_PAN_COORD_SHORT_ADDRESS: u8 = 0x7e;

/// Nonstandard: the device's own IEEE address.
pub const NS_IEEE_ADDRESS: u8 = 0xff;

// ============================================================================
// HWME Attributes
// ============================================================================

pub const HWME_POWERCON: u8 = 0x00;
pub const HWME_CHIPID: u8 = 0x01;
pub const HWME_TXPOWER: u8 = 0x02;
pub const HWME_CCAMODE: u8 = 0x03;
pub const HWME_EDTHRESHOLD: u8 = 0x04;
pub const HWME_CSTHRESHOLD: u8 = 0x05;
pub const HWME_EDVALUE: u8 = 0x06;
pub const HWME_CSVALUE: u8 = 0x07;
pub const HWME_EDVALLP: u8 = 0x08;
pub const HWME_CSVALLP: u8 = 0x09;
pub const HWME_FREQOFFS: u8 = 0x0a;
pub const HWME_MACTIMER: u8 = 0x0b;
pub const HWME_RANDOMNUM: u8 = 0x0c;
pub const HWME_TEMPERATURE: u8 = 0x0d;
pub const HWME_HSKEY: u8 = 0x0e;
pub const HWME_SYSCLKOUT: u8 = 0x0f;
pub const HWME_LQILIMIT: u8 = 0x10;

/// HAES modes.
pub const HAES_MODE_ENCRYPT: u8 = 0x00;
pub const HAES_MODE_DECRYPT: u8 = 0x01;

/// HWME-WAKEUP.indication conditions.
pub const HWME_WAKEUP_POWERUP: u8 = 0x00;
pub const HWME_WAKEUP_WDT: u8 = 0x01;
pub const HWME_WAKEUP_TIMER: u8 = 0x02;
pub const HWME_WAKEUP_GPIO: u8 = 0x03;

// ============================================================================
// TDME Attributes and Modes
// ============================================================================

pub const TDME_CHANNEL: u8 = 0x00;
pub const TDME_TX_CONFIG: u8 = 0x01;
pub const TDME_ED_CONFIG: u8 = 0x02;
pub const TDME_RX_CONFIG: u8 = 0x03;
pub const TDME_LO_1_CONFIG: u8 = 0x04;
pub const TDME_LO_2_CONFIG: u8 = 0x05;
pub const TDME_ATM_CONFIG: u8 = 0x06;

pub const TDME_TEST_OFF: u8 = 0x00;
pub const TDME_TEST_IDLE: u8 = 0x01;
pub const TDME_TEST_TX: u8 = 0x02;
pub const TDME_TEST_RX: u8 = 0x03;
pub const TDME_TEST_ED: u8 = 0x04;
pub const TDME_TEST_LO_1: u8 = 0x05;
pub const TDME_TEST_LO_2: u8 = 0x06;
pub const TDME_TEST_LO_3: u8 = 0x07;

/// TDME-TXPKT data types.
pub const TDME_TXD_RANDOM: u8 = 0x00;
pub const TDME_TXD_SEQRANDOM: u8 = 0x01;
pub const TDME_TXD_COUNT: u8 = 0x02;
pub const TDME_TXD_APPENDED: u8 = 0x03;

// ============================================================================
// Transceiver Registers (SFR)
// ============================================================================

/// LO Tx calibration, page 1.
pub const SFR_LOTXCAL: (u8, u8) = (1, 0xBF);
/// PA configuration on MPW silicon, page 0.
pub const SFR_PACFG: (u8, u8) = (0, 0xB1);
/// PA current bias on later silicon, page 0.
pub const SFR_PACFGIB: (u8, u8) = (0, 0xFE);
/// Holds the COORD bit used for channel filtering as coordinator.
pub const SFR_COORD_FILTER: (u8, u8) = (0, 0xD8);

// ============================================================================
// Device File
// ============================================================================

/// Character device exposed by the ca8210 kernel driver.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/ca8210_test";
