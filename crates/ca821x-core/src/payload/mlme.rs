//! MLME (MAC sublayer management entity) primitives.

use crate::protocol::codec::{
    Command, Confirm, Decode, PayloadReader, PayloadWriter, SyncCommand, check_len,
};
use crate::protocol::{
    AddressMode, CommandId, FrameError, FullAddress, MAX_ATTRIBUTE_SIZE, PanDescriptor,
    SecuritySpec, Status,
};

/// Confirm carrying nothing but a status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusConfirm {
    pub status: Status,
}

impl Decode for StatusConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self { status: r.status()? })
    }
}

impl Confirm for StatusConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

// ============================================================================
// Requests
// ============================================================================

/// MLME-ASSOCIATE.request
#[derive(Debug, Clone)]
pub struct AssociateRequest {
    pub logical_channel: u8,
    pub coord: FullAddress,
    pub capability_info: u8,
    pub security: Option<SecuritySpec>,
}

impl Command for AssociateRequest {
    const ID: CommandId = CommandId::MLME_ASSOCIATE_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.logical_channel)?;
        w.put_full_address(&self.coord)?;
        w.put_u8(self.capability_info)?;
        w.put_security(self.security.as_ref())
    }
}

/// MLME-ASSOCIATE.response
#[derive(Debug, Clone)]
pub struct AssociateResponse {
    pub device_address: [u8; 8],
    pub assoc_short_address: u16,
    pub status: Status,
    pub security: Option<SecuritySpec>,
}

impl Command for AssociateResponse {
    const ID: CommandId = CommandId::MLME_ASSOCIATE_RESPONSE;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_slice(&self.device_address)?;
        w.put_u16(self.assoc_short_address)?;
        w.put_u8(self.status.0)?;
        w.put_security(self.security.as_ref())
    }
}

/// MLME-DISASSOCIATE.request
#[derive(Debug, Clone)]
pub struct DisassociateRequest {
    pub device: FullAddress,
    pub reason: u8,
    pub tx_indirect: bool,
    pub security: Option<SecuritySpec>,
}

impl Command for DisassociateRequest {
    const ID: CommandId = CommandId::MLME_DISASSOCIATE_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_full_address(&self.device)?;
        w.put_u8(self.reason)?;
        w.put_u8(self.tx_indirect as u8)?;
        w.put_security(self.security.as_ref())
    }
}

/// MLME-GET.request
#[derive(Debug, Clone, Copy)]
pub struct GetRequest {
    pub attribute: u8,
    pub index: u8,
}

impl Command for GetRequest {
    const ID: CommandId = CommandId::MLME_GET_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.attribute)?;
        w.put_u8(self.index)
    }
}

impl SyncCommand for GetRequest {
    const CONFIRM: CommandId = CommandId::MLME_GET_CONFIRM;
    type Confirm = GetConfirm;
}

/// MLME-GET.confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetConfirm {
    pub status: Status,
    pub attribute: u8,
    pub index: u8,
    pub value: Vec<u8>,
}

impl Decode for GetConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        let status = r.status()?;
        let attribute = r.u8()?;
        let index = r.u8()?;
        let len = r.u8()? as usize;
        Ok(Self {
            status,
            attribute,
            index,
            value: r.bytes(len)?,
        })
    }
}

impl Confirm for GetConfirm {
    fn status(&self) -> Status {
        self.status
    }
}

/// MLME-ORPHAN.response
#[derive(Debug, Clone)]
pub struct OrphanResponse {
    pub orphan_address: [u8; 8],
    pub short_address: u16,
    pub associated_member: bool,
    pub security: Option<SecuritySpec>,
}

impl Command for OrphanResponse {
    const ID: CommandId = CommandId::MLME_ORPHAN_RESPONSE;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_slice(&self.orphan_address)?;
        w.put_u16(self.short_address)?;
        w.put_u8(self.associated_member as u8)?;
        w.put_security(self.security.as_ref())
    }
}

/// MLME-RESET.request
#[derive(Debug, Clone, Copy)]
pub struct ResetRequest {
    pub set_default_pib: bool,
}

impl Command for ResetRequest {
    const ID: CommandId = CommandId::MLME_RESET_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.set_default_pib as u8)
    }
}

impl SyncCommand for ResetRequest {
    const CONFIRM: CommandId = CommandId::MLME_RESET_CONFIRM;
    type Confirm = StatusConfirm;
}

/// MLME-RX-ENABLE.request
#[derive(Debug, Clone, Copy)]
pub struct RxEnableRequest {
    pub defer_permit: bool,
    pub rx_on_time: u32,
    pub rx_on_duration: u32,
}

impl Command for RxEnableRequest {
    const ID: CommandId = CommandId::MLME_RX_ENABLE_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.defer_permit as u8)?;
        w.put_u32(self.rx_on_time)?;
        w.put_u32(self.rx_on_duration)
    }
}

impl SyncCommand for RxEnableRequest {
    const CONFIRM: CommandId = CommandId::MLME_RX_ENABLE_CONFIRM;
    type Confirm = StatusConfirm;
}

/// MLME-SCAN.request
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub scan_type: u8,
    /// Bit n selects channel n.
    pub scan_channels: u32,
    pub scan_duration: u8,
    pub security: Option<SecuritySpec>,
}

impl Command for ScanRequest {
    const ID: CommandId = CommandId::MLME_SCAN_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u8(self.scan_type)?;
        w.put_u32(self.scan_channels)?;
        w.put_u8(self.scan_duration)?;
        w.put_security(self.security.as_ref())
    }
}

/// MLME-SET.request
#[derive(Debug, Clone)]
pub struct SetRequest {
    pub attribute: u8,
    pub index: u8,
    pub value: Vec<u8>,
}

impl Command for SetRequest {
    const ID: CommandId = CommandId::MLME_SET_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        let len = check_len("PIB attribute value", self.value.len(), MAX_ATTRIBUTE_SIZE)?;
        w.put_u8(self.attribute)?;
        w.put_u8(self.index)?;
        w.put_u8(len)?;
        w.put_slice(&self.value)
    }
}

impl SyncCommand for SetRequest {
    const CONFIRM: CommandId = CommandId::MLME_SET_CONFIRM;
    type Confirm = StatusConfirm;
}

/// MLME-START.request
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub pan_id: u16,
    pub logical_channel: u8,
    pub beacon_order: u8,
    pub superframe_order: u8,
    pub pan_coordinator: bool,
    pub battery_life_extension: bool,
    pub coord_realignment: bool,
    pub coord_realign_security: Option<SecuritySpec>,
    pub beacon_security: Option<SecuritySpec>,
}

impl Command for StartRequest {
    const ID: CommandId = CommandId::MLME_START_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_u16(self.pan_id)?;
        w.put_u8(self.logical_channel)?;
        w.put_u8(self.beacon_order)?;
        w.put_u8(self.superframe_order)?;
        w.put_u8(self.pan_coordinator as u8)?;
        w.put_u8(self.battery_life_extension as u8)?;
        w.put_u8(self.coord_realignment as u8)?;
        // Each spec is compressed independently; the second follows the first.
        w.put_security(self.coord_realign_security.as_ref())?;
        w.put_security(self.beacon_security.as_ref())
    }
}

impl SyncCommand for StartRequest {
    const CONFIRM: CommandId = CommandId::MLME_START_CONFIRM;
    type Confirm = StatusConfirm;
}

/// MLME-POLL.request
#[derive(Debug, Clone)]
pub struct PollRequest {
    pub coord: FullAddress,
    /// Units of 0.1 s; 0 polls once, 0xFFFF stops polling.
    pub interval: u16,
    pub security: Option<SecuritySpec>,
}

impl Command for PollRequest {
    const ID: CommandId = CommandId::MLME_POLL_REQUEST;

    fn encode(&self, w: &mut PayloadWriter) -> Result<(), FrameError> {
        w.put_full_address(&self.coord)?;
        w.put_u16(self.interval)?;
        w.put_security(self.security.as_ref())
    }
}

impl SyncCommand for PollRequest {
    const CONFIRM: CommandId = CommandId::MLME_POLL_CONFIRM;
    type Confirm = StatusConfirm;
}

// ============================================================================
// Indications and asynchronous confirms
// ============================================================================

/// MLME-ASSOCIATE.indication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociateIndication {
    pub device_address: [u8; 8],
    pub capability_info: u8,
    pub security: Option<SecuritySpec>,
}

impl Decode for AssociateIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            device_address: r.array()?,
            capability_info: r.u8()?,
            security: r.trailing_security()?,
        })
    }
}

/// MLME-ASSOCIATE.confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociateConfirm {
    pub assoc_short_address: u16,
    pub status: Status,
    pub security: Option<SecuritySpec>,
}

impl Decode for AssociateConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            assoc_short_address: r.u16()?,
            status: r.status()?,
            security: r.trailing_security()?,
        })
    }
}

/// MLME-DISASSOCIATE.indication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassociateIndication {
    pub device_address: [u8; 8],
    pub reason: u8,
    pub security: Option<SecuritySpec>,
}

impl Decode for DisassociateIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            device_address: r.array()?,
            reason: r.u8()?,
            security: r.trailing_security()?,
        })
    }
}

/// MLME-DISASSOCIATE.confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassociateConfirm {
    pub status: Status,
    pub device: FullAddress,
}

impl Decode for DisassociateConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            device: r.full_address()?,
        })
    }
}

impl Decode for PanDescriptor {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            coord: r.full_address()?,
            logical_channel: r.u8()?,
            superframe_spec: r.u16()?,
            gts_permit: r.u8()?,
            link_quality: r.u8()?,
            timestamp: r.u32()?,
            security_failure: r.u8()?,
            security: r.security()?,
        })
    }
}

/// MLME-BEACON-NOTIFY.indication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconNotifyIndication {
    pub bsn: u8,
    pub pan_descriptor: PanDescriptor,
    pub short_pending: Vec<u16>,
    pub extended_pending: Vec<[u8; 8]>,
    /// Beacon payload, empty if the beacon carried none.
    pub sdu: Vec<u8>,
}

impl BeaconNotifyIndication {
    const SHORT_COUNT_MASK: u8 = 0x07;
    const EXT_COUNT_SHIFT: u8 = 4;
}

impl Decode for BeaconNotifyIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        let bsn = r.u8()?;
        let pan_descriptor = PanDescriptor::decode(r)?;
        let pend_addr_spec = r.u8()?;
        let n_short = pend_addr_spec & Self::SHORT_COUNT_MASK;
        let n_ext = (pend_addr_spec >> Self::EXT_COUNT_SHIFT) & Self::SHORT_COUNT_MASK;
        let short_pending = (0..n_short).map(|_| r.u16()).collect::<Result<Vec<_>, _>>()?;
        let extended_pending = (0..n_ext)
            .map(|_| r.array::<8>())
            .collect::<Result<Vec<_>, _>>()?;
        let sdu = if r.remaining() > 0 {
            let len = r.u8()? as usize;
            r.bytes(len)?
        } else {
            Vec::new()
        };
        Ok(Self {
            bsn,
            pan_descriptor,
            short_pending,
            extended_pending,
            sdu,
        })
    }
}

/// MLME-ORPHAN.indication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanIndication {
    pub orphan_address: [u8; 8],
    pub security: Option<SecuritySpec>,
}

impl Decode for OrphanIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            orphan_address: r.array()?,
            security: r.trailing_security()?,
        })
    }
}

/// MLME-SCAN.confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfirm {
    pub status: Status,
    pub scan_type: u8,
    pub unscanned_channels: u32,
    pub result_list_size: u8,
    /// Energy values for an ED scan, PAN descriptors otherwise.
    pub result_list: Vec<u8>,
}

impl ScanConfirm {
    /// Decoded PAN descriptors of an active or passive scan.
    pub fn pan_descriptors(&self) -> Result<Vec<PanDescriptor>, FrameError> {
        let mut r = PayloadReader::new(&self.result_list);
        (0..self.result_list_size)
            .map(|_| PanDescriptor::decode(&mut r))
            .collect()
    }
}

impl Decode for ScanConfirm {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            status: r.status()?,
            scan_type: r.u8()?,
            unscanned_channels: r.u32()?,
            result_list_size: r.u8()?,
            result_list: r.rest(),
        })
    }
}

/// MLME-COMM-STATUS.indication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommStatusIndication {
    pub pan_id: u16,
    pub src_addr_mode: AddressMode,
    pub src_addr: [u8; 8],
    pub dst_addr_mode: AddressMode,
    pub dst_addr: [u8; 8],
    pub status: Status,
    pub security: Option<SecuritySpec>,
}

impl Decode for CommStatusIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            pan_id: r.u16()?,
            src_addr_mode: AddressMode::from_u8(r.u8()?),
            src_addr: r.array()?,
            dst_addr_mode: AddressMode::from_u8(r.u8()?),
            dst_addr: r.array()?,
            status: r.status()?,
            security: r.trailing_security()?,
        })
    }
}

/// MLME-SYNC-LOSS.indication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLossIndication {
    pub loss_reason: Status,
    pub pan_id: u16,
    pub logical_channel: u8,
    pub security: Option<SecuritySpec>,
}

impl Decode for SyncLossIndication {
    fn decode(r: &mut PayloadReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            loss_reason: r.status()?,
            pan_id: r.u16()?,
            logical_channel: r.u8()?,
            security: r.trailing_security()?,
        })
    }
}
