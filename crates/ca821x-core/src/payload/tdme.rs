//! TDME (test and debug management entity) primitives.

use crate::protocol::codec::{
    Command, Confirm, Decode, PayloadReader, PayloadWriter, SyncCommand, check_len,
};
use crate::protocol::{
    CommandId, FrameError, MAX_TDME_ATTRIBUTE_SIZE, MAX_TEST_PACKET_SIZE, Status,
    TDME_TXD_APPENDED, TDME_TXD_COUNT, TDME_TXD_RANDOM, TDME_TXD_SEQRANDOM,
};

/// TDME-SETSFR.request: write one transceiver register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSfrRequest {
    pub page: u8,
    pub address: u8,
    pub value: u8,
}

impl Command for SetSfrRequest {
    const ID: CommandId = CommandId::TDME_SETSFR_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.page)?;
        w.put_u8(self.address)?;
        w.put_u8(self.value)
    }
}

impl SyncCommand for SetSfrRequest {
    const CONFIRM: CommandId = CommandId::TDME_SETSFR_CONFIRM;
    type Confirm = SetSfrConfirm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSfrConfirm {
    pub status: Status,
    pub page: u8,
    pub address: u8,
}

impl Decode for SetSfrConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            page: r.u8()?,
            address: r.u8()?,
        })
    }
}

impl Confirm for SetSfrConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// TDME-GETSFR.request: read one transceiver register.
#[derive(Debug, Clone, Copy)]
pub struct GetSfrRequest {
    pub page: u8,
    pub address: u8,
}

impl Command for GetSfrRequest {
    const ID: CommandId = CommandId::TDME_GETSFR_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.page)?;
        w.put_u8(self.address)
    }
}

impl SyncCommand for GetSfrRequest {
    const CONFIRM: CommandId = CommandId::TDME_GETSFR_CONFIRM;
    type Confirm = GetSfrConfirm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetSfrConfirm {
    pub status: Status,
    pub page: u8,
    pub address: u8,
    pub value: u8,
}

impl Decode for GetSfrConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            page: r.u8()?,
            address: r.u8()?,
            value: r.u8()?,
        })
    }
}

impl Confirm for GetSfrConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// TDME-TESTMODE.request
#[derive(Debug, Clone, Copy)]
pub struct TestModeRequest {
    pub mode: u8,
}

impl Command for TestModeRequest {
    const ID: CommandId = CommandId::TDME_TESTMODE_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.mode)
    }
}

impl SyncCommand for TestModeRequest {
    const CONFIRM: CommandId = CommandId::TDME_TESTMODE_CONFIRM;
    type Confirm = TestModeConfirm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestModeConfirm {
    pub status: Status,
    pub mode: u8,
}

impl Decode for TestModeConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            mode: r.u8()?,
        })
    }
}

impl Confirm for TestModeConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// TDME-SET.request
#[derive(Debug, Clone)]
pub struct TdmeSetRequest {
    pub attribute: u8,
    pub value: Vec<u8>,
}

impl Command for TdmeSetRequest {
    const ID: CommandId = CommandId::TDME_SET_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        let len = check_len("TDME attribute value", self.value.len(), MAX_TDME_ATTRIBUTE_SIZE)?;
        w.put_u8(self.attribute)?;
        w.put_u8(len)?;
        w.put_slice(&self.value)
    }
}

impl SyncCommand for TdmeSetRequest {
    const CONFIRM: CommandId = CommandId::TDME_SET_CONFIRM;
    type Confirm = TdmeSetConfirm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TdmeSetConfirm {
    pub status: Status,
    pub attribute: u8,
}

impl Decode for TdmeSetConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            attribute: r.u8()?,
        })
    }
}

impl Confirm for TdmeSetConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// Contents of a test packet. Only appended data travels in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestPacketData {
    Random { length: u8 },
    SequencedRandom { length: u8 },
    Count { length: u8 },
    Appended(Vec<u8>),
}

impl TestPacketData {
    pub fn data_type(&self) -> u8 {
        match self {
            TestPacketData::Random { .. } => TDME_TXD_RANDOM,
            TestPacketData::SequencedRandom { .. } => TDME_TXD_SEQRANDOM,
            TestPacketData::Count { .. } => TDME_TXD_COUNT,
            TestPacketData::Appended(_) => TDME_TXD_APPENDED,
        }
    }
}

/// TDME-TXPKT.request
#[derive(Debug, Clone)]
pub struct TxPacketRequest {
    pub sequence_number: u8,
    pub packet: TestPacketData,
}

impl Command for TxPacketRequest {
    const ID: CommandId = CommandId::TDME_TXPKT_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.packet.data_type())?;
        w.put_u8(self.sequence_number)?;
        match &self.packet {
            TestPacketData::Random { length }
            | TestPacketData::SequencedRandom { length }
            | TestPacketData::Count { length } => {
                check_len("test packet", *length as usize, MAX_TEST_PACKET_SIZE)?;
                w.put_u8(*length)
            }
            TestPacketData::Appended(data) => {
                let len = check_len("test packet", data.len(), MAX_TEST_PACKET_SIZE)?;
                w.put_u8(len)?;
                w.put_slice(data)
            }
        }
    }
}

impl SyncCommand for TxPacketRequest {
    const CONFIRM: CommandId = CommandId::TDME_TXPKT_CONFIRM;
    type Confirm = TxPacketConfirm;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPacketConfirm {
    pub status: Status,
    pub sequence_number: u8,
    pub data: Vec<u8>,
}

impl Decode for TxPacketConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        let status = r.status()?;
        let sequence_number = r.u8()?;
        let len = r.u8()? as usize;
        Ok(Self {
            status,
            sequence_number,
            data: r.bytes(len)?,
        })
    }
}

impl Confirm for TxPacketConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// TDME-LOTLK.request: LO locking test on one channel.
#[derive(Debug, Clone, Copy)]
pub struct LoTlkRequest {
    pub channel: u8,
    /// Receive (true) or transmit (false) LO.
    pub rx: bool,
}

impl Command for LoTlkRequest {
    const ID: CommandId = CommandId::TDME_LOTLK_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.channel)?;
        w.put_u8(self.rx as u8)
    }
}

impl SyncCommand for LoTlkRequest {
    const CONFIRM: CommandId = CommandId::TDME_LOTLK_CONFIRM;
    type Confirm = LoTlkConfirm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoTlkConfirm {
    pub status: Status,
    pub channel: u8,
    pub rx: bool,
    pub lo_fdac: u8,
    pub lo_amp: u8,
    pub lo_txcal: u8,
}

impl Decode for LoTlkConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            channel: r.u8()?,
            rx: r.u8()? != 0,
            lo_fdac: r.u8()?,
            lo_amp: r.u8()?,
            lo_txcal: r.u8()?,
        })
    }
}

impl Confirm for LoTlkConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// TDME-RXPKT.indication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RxPacketIndication {
    pub status: Status,
    pub ed_value: u8,
    pub cs_value: u8,
    pub foffs_value: u8,
    pub data: Vec<u8>,
}

impl Decode for RxPacketIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        let status = r.status()?;
        let ed_value = r.u8()?;
        let cs_value = r.u8()?;
        let foffs_value = r.u8()?;
        let len = r.u8()? as usize;
        Ok(Self {
            status,
            ed_value,
            cs_value,
            foffs_value,
            data: r.bytes(len)?,
        })
    }
}

/// TDME-EDDET.indication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdDetectIndication {
    pub threshold: u8,
    pub ed_value: u8,
    pub cs_value: u8,
    pub time_above_threshold_us: u16,
}

impl Decode for EdDetectIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            threshold: r.u8()?,
            ed_value: r.u8()?,
            cs_value: r.u8()?,
            time_above_threshold_us: r.u16()?,
        })
    }
}

/// TDME-ERROR.indication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TdmeErrorIndication {
    pub error_code: u8,
}

impl Decode for TdmeErrorIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self { error_code: r.u8()? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::fixtures::CHANNEL;
    use crate::protocol::{TDME_CHANNEL, TDME_TEST_IDLE};

    #[test]
    fn test_setsfr_fixture() {
        let req = SetSfrRequest {
            page: 1,
            address: 0xBF,
            value: 0xAE,
        };
        assert_eq!(
            req.to_frame().unwrap().to_bytes(),
            vec![0x51, 0x03, 0x01, 0xBF, 0xAE]
        );
    }

    #[test]
    fn test_getsfr_fixture() {
        let req = GetSfrRequest {
            page: 1,
            address: 0xBF,
        };
        assert_eq!(req.to_frame().unwrap().to_bytes(), vec![0x52, 0x02, 0x01, 0xBF]);
    }

    #[test]
    fn test_testmode_fixture() {
        let req = TestModeRequest {
            mode: TDME_TEST_IDLE,
        };
        assert_eq!(req.to_frame().unwrap().to_bytes(), vec![0x53, 0x01, 0x01]);
    }

    #[test]
    fn test_tdme_set_length_covers_header_and_value() {
        let req = TdmeSetRequest {
            attribute: TDME_CHANNEL,
            value: vec![CHANNEL],
        };
        assert_eq!(
            req.to_frame().unwrap().to_bytes(),
            vec![0x54, 0x03, 0x00, 0x01, 0x0D]
        );
    }

    #[test]
    fn test_tdme_set_value_bound() {
        let req = TdmeSetRequest {
            attribute: TDME_CHANNEL,
            value: vec![0; 3],
        };
        assert!(req.to_frame().is_err());
    }

    #[test]
    fn test_txpkt_appended_fixture() {
        let req = TxPacketRequest {
            sequence_number: 0,
            packet: TestPacketData::Appended(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        };
        assert_eq!(
            req.to_frame().unwrap().to_bytes(),
            vec![0x55, 0x07, 0x03, 0x00, 0x04, 0xDE, 0xAD, 0xBE, 0xEF]
        );
    }

    #[test]
    fn test_txpkt_generated_carries_no_data() {
        let req = TxPacketRequest {
            sequence_number: 9,
            packet: TestPacketData::Count { length: 20 },
        };
        assert_eq!(
            req.to_frame().unwrap().to_bytes(),
            vec![0x55, 0x03, TDME_TXD_COUNT, 9, 20]
        );
    }

    #[test]
    fn test_lotlk_fixture() {
        let req = LoTlkRequest {
            channel: CHANNEL,
            rx: false,
        };
        assert_eq!(req.to_frame().unwrap().to_bytes(), vec![0x56, 0x02, 0x0D, 0x00]);
    }

    #[test]
    fn test_lotlk_confirm_decode() {
        let cnf = LoTlkConfirm::from_payload(&[0x00, 0x0D, 0x01, 0x12, 0x34, 0xAE]).unwrap();
        assert_eq!(cnf.channel, CHANNEL);
        assert!(cnf.rx);
        assert_eq!((cnf.lo_fdac, cnf.lo_amp, cnf.lo_txcal), (0x12, 0x34, 0xAE));
    }

    #[test]
    fn test_rxpkt_decode() {
        let ind = RxPacketIndication::from_payload(&[0x05, 0x80, 0x40, 0x02, 0x02, 0xAA, 0xBB])
            .unwrap();
        assert_eq!(ind.status, Status::TDME_FCS_ERROR);
        assert_eq!(ind.data, vec![0xAA, 0xBB]);
    }

    #[test]
    fn test_eddet_decode() {
        let ind = EdDetectIndication::from_payload(&[0x40, 0x90, 0x10, 0xE8, 0x03]).unwrap();
        assert_eq!(ind.time_above_threshold_us, 1000);
    }
}
