//! HWME (hardware management entity) primitives.

use crate::protocol::codec::{
    Command, Confirm, Decode, PayloadReader, PayloadWriter, SyncCommand, check_len,
};
use crate::protocol::{
    CommandId, FrameError, HAES_DATA_SIZE, MAX_HWME_ATTRIBUTE_SIZE, Status,
};

/// HWME-SET.request
#[derive(Debug, Clone)]
pub struct HwmeSetRequest {
    pub attribute: u8,
    pub value: Vec<u8>,
}

impl Command for HwmeSetRequest {
    const ID: CommandId = CommandId::HWME_SET_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        let len = check_len("HWME attribute value", self.value.len(), MAX_HWME_ATTRIBUTE_SIZE)?;
        w.put_u8(self.attribute)?;
        w.put_u8(len)?;
        w.put_slice(&self.value)
    }
}

impl SyncCommand for HwmeSetRequest {
    const CONFIRM: CommandId = CommandId::HWME_SET_CONFIRM;
    type Confirm = HwmeSetConfirm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwmeSetConfirm {
    pub status: Status,
    pub attribute: u8,
}

impl Decode for HwmeSetConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            attribute: r.u8()?,
        })
    }
}

impl Confirm for HwmeSetConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// HWME-GET.request
#[derive(Debug, Clone, Copy)]
pub struct HwmeGetRequest {
    pub attribute: u8,
}

impl Command for HwmeGetRequest {
    const ID: CommandId = CommandId::HWME_GET_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.attribute)
    }
}

impl SyncCommand for HwmeGetRequest {
    const CONFIRM: CommandId = CommandId::HWME_GET_CONFIRM;
    type Confirm = HwmeGetConfirm;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HwmeGetConfirm {
    pub status: Status,
    pub attribute: u8,
    pub value: Vec<u8>,
}

impl Decode for HwmeGetConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        let status = r.status()?;
        let attribute = r.u8()?;
        let len = r.u8()? as usize;
        Ok(Self {
            status,
            attribute,
            value: r.bytes(len)?,
        })
    }
}

impl Confirm for HwmeGetConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// HWME-HAES.request: one AES block through the hardware engine.
#[derive(Debug, Clone, Copy)]
pub struct HaesRequest {
    pub mode: u8,
    pub data: [u8; HAES_DATA_SIZE],
}

impl Command for HaesRequest {
    const ID: CommandId = CommandId::HWME_HAES_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.mode)?;
        w.put_slice(&self.data)
    }
}

impl SyncCommand for HaesRequest {
    const CONFIRM: CommandId = CommandId::HWME_HAES_CONFIRM;
    type Confirm = HaesConfirm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaesConfirm {
    pub status: Status,
    pub data: [u8; HAES_DATA_SIZE],
}

impl Decode for HaesConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            data: r.array()?,
        })
    }
}

impl Confirm for HaesConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// HWME-WAKEUP.indication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeupIndication {
    pub condition: u8,
}

impl Decode for WakeupIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self { condition: r.u8()? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{HAES_MODE_ENCRYPT, HWME_EDTHRESHOLD, HWME_WAKEUP_POWERUP};

    const HAES_DATA: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
        0xFF,
    ];

    #[test]
    fn test_hwme_set_fixture() {
        let req = HwmeSetRequest {
            attribute: HWME_EDTHRESHOLD,
            value: vec![0x64],
        };
        assert_eq!(
            req.to_frame().unwrap().to_bytes(),
            vec![0x4E, 0x03, 0x04, 0x01, 0x64]
        );
    }

    #[test]
    fn test_hwme_set_value_bound() {
        let req = HwmeSetRequest {
            attribute: HWME_EDTHRESHOLD,
            value: vec![0; MAX_HWME_ATTRIBUTE_SIZE + 1],
        };
        assert!(req.to_frame().is_err());
    }

    #[test]
    fn test_hwme_get_fixture() {
        let req = HwmeGetRequest {
            attribute: HWME_EDTHRESHOLD,
        };
        assert_eq!(req.to_frame().unwrap().to_bytes(), vec![0x4F, 0x01, 0x04]);
    }

    #[test]
    fn test_haes_fixture() {
        let req = HaesRequest {
            mode: HAES_MODE_ENCRYPT,
            data: HAES_DATA,
        };
        let mut expected = vec![0x50, 0x11, 0x00];
        expected.extend_from_slice(&HAES_DATA);
        assert_eq!(req.to_frame().unwrap().to_bytes(), expected);
    }

    #[test]
    fn test_hwme_get_confirm_decode() {
        let cnf = HwmeGetConfirm::from_payload(&[0x00, 0x04, 0x01, 0x64]).unwrap();
        assert_eq!(cnf.attribute, HWME_EDTHRESHOLD);
        assert_eq!(cnf.value, vec![0x64]);

        let cnf = HwmeGetConfirm::from_payload(&[0x01, 0x04, 0x00]).unwrap();
        assert_eq!(cnf.status, Status::HWME_UNKNOWN);
        assert!(cnf.value.is_empty());
    }

    #[test]
    fn test_wakeup_decode() {
        let ind = WakeupIndication::from_payload(&[HWME_WAKEUP_POWERUP]).unwrap();
        assert_eq!(ind.condition, HWME_WAKEUP_POWERUP);
    }
}
