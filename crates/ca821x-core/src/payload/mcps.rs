//! MCPS (MAC common part sublayer) data primitives.

use crate::protocol::codec::{
    Command, Confirm, Decode, PayloadReader, PayloadWriter, SyncCommand, check_len,
};
use crate::protocol::{
    AddressMode, CommandId, FrameError, FullAddress, MAX_DATA_SIZE, SecuritySpec, Status,
};

/// MCPS-DATA.request
#[derive(Debug, Clone)]
pub struct DataRequest {
    pub src_addr_mode: AddressMode,
    pub dst: FullAddress,
    pub msdu_handle: u8,
    pub tx_options: u8,
    pub msdu: Vec<u8>,
    pub security: Option<SecuritySpec>,
}

impl Command for DataRequest {
    const ID: CommandId = CommandId::MCPS_DATA_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        let len = check_len("msdu", self.msdu.len(), MAX_DATA_SIZE)?;
        w.put_u8(self.src_addr_mode.as_u8())?;
        w.put_full_address(&self.dst)?;
        w.put_u8(len)?;
        w.put_u8(self.msdu_handle)?;
        w.put_u8(self.tx_options)?;
        w.put_slice(&self.msdu)?;
        w.put_security(self.security.as_ref())
    }
}

/// MCPS-PURGE.request
#[derive(Debug, Clone, Copy)]
pub struct PurgeRequest {
    pub msdu_handle: u8,
}

impl Command for PurgeRequest {
    const ID: CommandId = CommandId::MCPS_PURGE_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.msdu_handle)
    }
}

impl SyncCommand for PurgeRequest {
    const CONFIRM: CommandId = CommandId::MCPS_PURGE_CONFIRM;
    type Confirm = PurgeConfirm;
}

/// MCPS-PURGE.confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeConfirm {
    pub msdu_handle: u8,
    pub status: Status,
}

impl Decode for PurgeConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            msdu_handle: r.u8()?,
            status: r.status()?,
        })
    }
}

impl Confirm for PurgeConfirm {
    const STATUS_OFFSET: usize = 1;

    fn status(&self) -> Status {
        self.status
    }
}

/// MCPS-DATA.confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataConfirm {
    pub msdu_handle: u8,
    pub status: Status,
    pub timestamp: u32,
}

impl Decode for DataConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            msdu_handle: r.u8()?,
            status: r.status()?,
            timestamp: r.u32()?,
        })
    }
}

/// MCPS-DATA.indication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataIndication {
    pub src: FullAddress,
    pub dst: FullAddress,
    pub link_quality: u8,
    pub dsn: u8,
    pub timestamp: u32,
    pub msdu: Vec<u8>,
    /// Present only when the chip appends it after the MSDU.
    pub security: Option<SecuritySpec>,
}

impl Decode for DataIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        let src = r.full_address()?;
        let dst = r.full_address()?;
        let msdu_len = r.u8()? as usize;
        let link_quality = r.u8()?;
        let dsn = r.u8()?;
        let timestamp = r.u32()?;
        let msdu = r.bytes(msdu_len)?;
        Ok(Self {
            src,
            dst,
            link_quality,
            dsn,
            timestamp,
            msdu,
            security: r.trailing_security()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::fixtures::{DST, PAN_ID, fixture_security};

    #[test]
    fn test_data_request_fixture() {
        let req = DataRequest {
            src_addr_mode: AddressMode::Short,
            dst: FullAddress::extended(PAN_ID, DST),
            msdu_handle: 0xAA,
            tx_options: 0,
            msdu: vec![0xDE, 0xAD, 0xBE, 0xEF],
            security: Some(fixture_security()),
        };
        let expected: &[u8] = &[
            0x00, 0x1E, 0x02, 0x03, 0x5C, 0xCA, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88,
            0x04, 0xAA, 0x00, 0xDE, 0xAD, 0xBE, 0xEF, 0x07, 0x03, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF, 0x00, 0x01,
        ];
        assert_eq!(req.to_frame().unwrap().to_bytes(), expected);
    }

    #[test]
    fn test_data_request_without_security() {
        let req = DataRequest {
            src_addr_mode: AddressMode::Short,
            dst: FullAddress::extended(PAN_ID, DST),
            msdu_handle: 0xAA,
            tx_options: 0,
            msdu: vec![0xDE, 0xAD, 0xBE, 0xEF],
            security: None,
        };
        let frame = req.to_frame().unwrap();
        assert_eq!(frame.length() as usize, 30 - (SecuritySpec::WIRE_SIZE - 1));
        assert_eq!(frame.payload.last(), Some(&0));
    }

    #[test]
    fn test_data_request_msdu_bound() {
        let req = DataRequest {
            src_addr_mode: AddressMode::Short,
            dst: FullAddress::none(),
            msdu_handle: 0,
            tx_options: 0,
            msdu: vec![0; MAX_DATA_SIZE + 1],
            security: None,
        };
        assert!(matches!(
            req.to_frame(),
            Err(FrameError::FieldTooLong { field: "msdu", .. })
        ));
    }

    #[test]
    fn test_purge_fixture() {
        let frame = PurgeRequest { msdu_handle: 0xAA }.to_frame().unwrap();
        assert_eq!(frame.to_bytes(), vec![0x41, 0x01, 0xAA]);
    }

    #[test]
    fn test_data_indication_decode() {
        let mut payload = vec![0x02, 0x5C, 0xCA, 0x01, 0x00, 0, 0, 0, 0, 0, 0];
        payload.extend_from_slice(&[0x03, 0x5C, 0xCA]);
        payload.extend_from_slice(&DST);
        payload.extend_from_slice(&[0x02, 0xC8, 0x17, 0x04, 0x03, 0x02, 0x01, 0xAB, 0xCD]);
        let ind = DataIndication::from_payload(&payload).unwrap();
        assert_eq!(ind.src.short_address(), Some(0x0001));
        assert_eq!(ind.dst.address, DST);
        assert_eq!(ind.link_quality, 0xC8);
        assert_eq!(ind.dsn, 0x17);
        assert_eq!(ind.timestamp, 0x01020304);
        assert_eq!(ind.msdu, vec![0xAB, 0xCD]);
        assert_eq!(ind.security, None);
    }

    #[test]
    fn test_data_confirm_decode() {
        let cnf = DataConfirm::from_payload(&[0xAA, 0xE9, 1, 0, 0, 0]).unwrap();
        assert_eq!(cnf.msdu_handle, 0xAA);
        assert_eq!(cnf.status, Status::NO_ACK);
        assert_eq!(cnf.timestamp, 1);
    }
}
