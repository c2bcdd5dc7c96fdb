//! Per-device context and the primitive API.
//!
//! A [`Ca821x`] owns the exchange engine (and through it the transport),
//! the callback table and the hardware flags of one transceiver. Any
//! number of them can coexist.
//!
//! Fire-and-forget primitives return once the request is written; their
//! confirms arrive later through [`Ca821x::dispatch`]. Synchronous
//! primitives return the confirm's outputs only when its status is
//! success, and the chip's status as [`ApiError::Status`] otherwise.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::dispatch::{Callbacks, DispatchError, Dispatched};
use crate::error::{ApiError, Result};
use crate::events::LinkObserver;
use crate::exchange::Exchange;
use crate::hw_defaults::{self, CHIP_INIT_SEQUENCE, SfrWrite};
use crate::payload::hwme::{HaesRequest, HwmeGetRequest, HwmeSetRequest};
use crate::payload::mcps::{DataRequest, PurgeRequest};
use crate::payload::mlme::{
    AssociateRequest, AssociateResponse, DisassociateRequest, GetRequest, OrphanResponse,
    PollRequest, ResetRequest, RxEnableRequest, ScanRequest, SetRequest, StartRequest,
};
use crate::payload::tdme::{
    GetSfrRequest, LoTlkConfirm, LoTlkRequest, SetSfrRequest, TdmeSetRequest, TestModeRequest,
    TxPacketConfirm, TxPacketRequest,
};
use crate::protocol::{
    HAES_DATA_SIZE, PHY_CURRENT_CHANNEL, PHY_TRANSMIT_POWER, SFR_COORD_FILTER,
    SyncCommand, TDME_CHANNEL,
};
use crate::transport::Transport;

/// Silicon-specific behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareFlags {
    /// Apply register fix-ups after MAC operations.
    pub workarounds: bool,
    /// Early (MPW) silicon with the two-step PA.
    pub mpw: bool,
}

pub struct Ca821x<T: Transport> {
    exchange: Exchange<T>,
    callbacks: Callbacks,
    flags: HardwareFlags,
}

impl<T: Transport> Ca821x<T> {
    pub fn new(transport: T) -> Self {
        Self::with_flags(transport, HardwareFlags::default())
    }

    pub fn with_flags(transport: T, flags: HardwareFlags) -> Self {
        Self {
            exchange: Exchange::new(transport),
            callbacks: Callbacks::new(),
            flags,
        }
    }

    pub fn flags(&self) -> HardwareFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: HardwareFlags) {
        self.flags = flags;
    }

    pub fn set_observer(&mut self, observer: Arc<dyn LinkObserver>) {
        self.exchange.set_observer(observer);
    }

    /// Replace the callback table. Needs `&mut`, so it cannot race the reader.
    pub fn register_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks = callbacks;
    }

    pub fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    /// Route one inbound frame to the registered callbacks.
    pub fn dispatch(&self, bytes: &[u8]) -> std::result::Result<Dispatched, DispatchError> {
        self.callbacks.dispatch(bytes)
    }

    pub fn exchange(&self) -> &Exchange<T> {
        &self.exchange
    }

    pub fn is_connected(&self) -> bool {
        self.exchange.is_connected()
    }

    /// Run a synchronous command. Only successful confirms come back.
    fn sync<C: SyncCommand>(&self, command: &C) -> Result<C::Confirm> {
        self.exchange.exchange(command)
    }

    // ========================================================================
    // MCPS
    // ========================================================================

    #[instrument(skip(self, request), fields(handle = request.msdu_handle, len = request.msdu.len()))]
    pub fn mcps_data_request(&self, request: &DataRequest) -> Result<()> {
        self.exchange.post(request)
    }

    /// Purge a queued MSDU. Returns the handle the chip purged.
    #[instrument(skip(self))]
    pub fn mcps_purge_request(&self, msdu_handle: u8) -> Result<u8> {
        let confirm = self.sync(&PurgeRequest { msdu_handle })?;
        Ok(confirm.msdu_handle)
    }

    // ========================================================================
    // MLME
    // ========================================================================

    #[instrument(skip(self, request), fields(channel = request.logical_channel))]
    pub fn mlme_associate_request(&self, request: &AssociateRequest) -> Result<()> {
        self.channel_init(request.logical_channel)?;
        self.exchange.post(request)
    }

    #[instrument(skip(self, response))]
    pub fn mlme_associate_response(&self, response: &AssociateResponse) -> Result<()> {
        self.exchange.post(response)
    }

    #[instrument(skip(self, request))]
    pub fn mlme_disassociate_request(&self, request: &DisassociateRequest) -> Result<()> {
        self.exchange.post(request)
    }

    /// Read a PIB attribute. phyTransmitPower is served from the PA register.
    #[instrument(skip(self))]
    pub fn mlme_get_request(&self, attribute: u8, index: u8) -> Result<Vec<u8>> {
        if attribute == PHY_TRANSMIT_POWER {
            return Ok(vec![self.get_tx_power()?]);
        }
        let confirm = self.sync(&GetRequest { attribute, index })?;
        Ok(confirm.value)
    }

    #[instrument(skip(self, response))]
    pub fn mlme_orphan_response(&self, response: &OrphanResponse) -> Result<()> {
        self.exchange.post(response)
    }

    #[instrument(skip(self))]
    pub fn mlme_reset_request(&self, set_default_pib: bool) -> Result<()> {
        self.sync(&ResetRequest { set_default_pib })?;
        if self.flags.workarounds && set_default_pib {
            // Clear the COORD bit used for channel filtering as coordinator.
            let (page, address) = SFR_COORD_FILTER;
            self.tdme_setsfr_request(page, address, 0)?;
        }
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub fn mlme_rx_enable_request(&self, request: &RxEnableRequest) -> Result<()> {
        self.sync(request)?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(scan_type = request.scan_type))]
    pub fn mlme_scan_request(&self, request: &ScanRequest) -> Result<()> {
        self.exchange.post(request)
    }

    /// Write a PIB attribute.
    ///
    /// The value is range-checked locally first. A new phyCurrentChannel
    /// recalibrates the LO, and phyTransmitPower goes to the PA register
    /// instead of the MAC.
    #[instrument(skip(self, value), fields(len = value.len()))]
    pub fn mlme_set_request(&self, attribute: u8, index: u8, value: &[u8]) -> Result<()> {
        check_pib_attribute(attribute, value)?;

        if attribute == PHY_CURRENT_CHANNEL {
            if let Some(&channel) = value.first() {
                self.channel_init(channel)?;
            }
        }
        if let (PHY_TRANSMIT_POWER, Some(&txp)) = (attribute, value.first()) {
            return self.set_tx_power(txp);
        }

        self.sync(&SetRequest {
            attribute,
            index,
            value: value.to_vec(),
        })?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(pan_id = request.pan_id, channel = request.logical_channel))]
    pub fn mlme_start_request(&self, request: &StartRequest) -> Result<()> {
        self.channel_init(request.logical_channel)?;
        self.sync(request)?;
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub fn mlme_poll_request(&self, request: &PollRequest) -> Result<()> {
        self.sync(request)?;
        Ok(())
    }

    // ========================================================================
    // HWME
    // ========================================================================

    #[instrument(skip(self, value))]
    pub fn hwme_set_request(&self, attribute: u8, value: &[u8]) -> Result<()> {
        self.sync(&HwmeSetRequest {
            attribute,
            value: value.to_vec(),
        })?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn hwme_get_request(&self, attribute: u8) -> Result<Vec<u8>> {
        Ok(self.sync(&HwmeGetRequest { attribute })?.value)
    }

    /// Run one block through the hardware AES engine.
    #[instrument(skip(self, data))]
    pub fn hwme_haes_request(
        &self,
        mode: u8,
        data: [u8; HAES_DATA_SIZE],
    ) -> Result<[u8; HAES_DATA_SIZE]> {
        Ok(self.sync(&HaesRequest { mode, data })?.data)
    }

    // ========================================================================
    // TDME
    // ========================================================================

    #[instrument(level = "debug", skip(self))]
    pub fn tdme_setsfr_request(&self, page: u8, address: u8, value: u8) -> Result<()> {
        self.sync(&SetSfrRequest {
            page,
            address,
            value,
        })?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn tdme_getsfr_request(&self, page: u8, address: u8) -> Result<u8> {
        Ok(self.sync(&GetSfrRequest { page, address })?.value)
    }

    #[instrument(skip(self))]
    pub fn tdme_testmode_request(&self, mode: u8) -> Result<()> {
        self.sync(&TestModeRequest { mode })?;
        Ok(())
    }

    /// Write a test attribute; a new TDME_CHANNEL recalibrates the LO first.
    #[instrument(skip(self, value))]
    pub fn tdme_set_request(&self, attribute: u8, value: &[u8]) -> Result<()> {
        if attribute == TDME_CHANNEL {
            if let Some(&channel) = value.first() {
                self.channel_init(channel)?;
            }
        }
        self.sync(&TdmeSetRequest {
            attribute,
            value: value.to_vec(),
        })?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(seq = request.sequence_number))]
    pub fn tdme_txpkt_request(&self, request: &TxPacketRequest) -> Result<TxPacketConfirm> {
        self.sync(request)
    }

    #[instrument(skip(self))]
    pub fn tdme_lotlk_request(&self, channel: u8, rx: bool) -> Result<LoTlkConfirm> {
        self.sync(&LoTlkRequest { channel, rx })
    }

    // ========================================================================
    // Hardware defaults
    // ========================================================================

    fn write_sfr(&self, w: SfrWrite) -> Result<()> {
        self.tdme_setsfr_request(w.page, w.address, w.value)
    }

    /// Write the bring-up register defaults. Stops at the first failure.
    #[instrument(skip(self))]
    pub fn chip_init(&self) -> Result<()> {
        for w in CHIP_INIT_SEQUENCE {
            self.write_sfr(w).inspect_err(|e| {
                warn!(page = w.page, addr = %format!("0x{:02X}", w.address), "Chip init failed: {}", e);
            })?;
        }
        info!("Chip defaults written");
        Ok(())
    }

    /// Load the LO Tx calibration for `channel`.
    pub fn channel_init(&self, channel: u8) -> Result<()> {
        let w = hw_defaults::channel_init_write(channel);
        debug!(channel, txcal = %format!("0x{:02X}", w.value), "Channel init");
        self.write_sfr(w)
    }

    /// Set output power from a 6-bit two's complement dBm value.
    #[instrument(skip(self))]
    pub fn set_tx_power(&self, txp: u8) -> Result<()> {
        self.write_sfr(hw_defaults::tx_power_write(txp, self.flags.mpw))
    }

    /// Current output power as phyTransmitPower (dBm plus tolerance code).
    #[instrument(skip(self))]
    pub fn get_tx_power(&self) -> Result<u8> {
        let (page, address) = hw_defaults::tx_power_register(self.flags.mpw);
        let paib = self.tdme_getsfr_request(page, address)?;
        Ok(hw_defaults::tx_power_from_register(paib, self.flags.mpw))
    }
}

/// Reject PIB values the MAC would accept but must not see.
pub fn check_pib_attribute(attribute: u8, value: &[u8]) -> Result<()> {
    if hw_defaults::check_pib_attribute(attribute, value) {
        Ok(())
    } else {
        Err(ApiError::InvalidParameter(format!(
            "PIB attribute 0x{:02X} value {:02X?} out of range",
            attribute, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::fixtures::{CHANNEL, DST, PAN_ID};
    use crate::payload::tdme::TestPacketData;
    use crate::protocol::{
        AddressMode, CommandId, Frame, FullAddress, MAC_BEACON_ORDER, MAC_PAN_ID, Status,
        TDME_TXD_APPENDED,
    };
    use crate::transport::{MockTransport, TransportError};

    fn setup(flags: HardwareFlags) -> (Ca821x<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        (Ca821x::with_flags(mock.clone(), flags), mock)
    }

    fn setsfr_ok(mock: &MockTransport, page: u8, address: u8) {
        mock.queue_frame(CommandId::TDME_SETSFR_CONFIRM, &[0x00, page, address]);
    }

    fn sfr_writes(mock: &MockTransport) -> Vec<(u8, u8, u8)> {
        mock.written_frames()
            .into_iter()
            .filter(|f| f.command_id == CommandId::TDME_SETSFR_REQUEST)
            .map(|f| (f.payload[0], f.payload[1], f.payload[2]))
            .collect()
    }

    #[test]
    fn test_data_request_is_fire_and_forget() {
        let (dev, mock) = setup(HardwareFlags::default());
        let req = DataRequest {
            src_addr_mode: AddressMode::Short,
            dst: FullAddress::extended(PAN_ID, DST),
            msdu_handle: 1,
            tx_options: 0,
            msdu: vec![0xAA; 4],
            security: None,
        };
        dev.mcps_data_request(&req).unwrap();
        let frames = mock.written_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].command_id, CommandId::MCPS_DATA_REQUEST);
        assert_eq!(mock.pending(), 0);
    }

    #[test]
    fn test_purge_returns_handle() {
        let (dev, mock) = setup(HardwareFlags::default());
        mock.queue_frame(CommandId::MCPS_PURGE_CONFIRM, &[0x05, 0x00]);
        assert_eq!(dev.mcps_purge_request(5).unwrap(), 5);

        mock.queue_frame(CommandId::MCPS_PURGE_CONFIRM, &[0x06, 0xE7]);
        let err = dev.mcps_purge_request(6).unwrap_err();
        assert_eq!(err.status(), Status::INVALID_HANDLE);
    }

    #[test]
    fn test_get_returns_value_only_on_success() {
        let (dev, mock) = setup(HardwareFlags::default());
        mock.queue_frame(CommandId::MLME_GET_CONFIRM, &[0x00, MAC_PAN_ID, 0x00, 0x02, 0x5C, 0xCA]);
        assert_eq!(dev.mlme_get_request(MAC_PAN_ID, 0).unwrap(), vec![0x5C, 0xCA]);

        mock.queue_frame(CommandId::MLME_GET_CONFIRM, &[0xF4, 0x99, 0x00, 0x00]);
        let err = dev.mlme_get_request(0x99, 0).unwrap_err();
        assert_eq!(err.status(), Status::UNSUPPORTED_ATTRIBUTE);
    }

    #[test]
    fn test_set_rejects_out_of_range_without_traffic() {
        let (dev, mock) = setup(HardwareFlags::default());
        let err = dev.mlme_set_request(MAC_BEACON_ORDER, 0, &[16]).unwrap_err();
        assert_eq!(err.status(), Status::INVALID_PARAMETER);
        let err = dev.mlme_set_request(PHY_TRANSMIT_POWER, 0, &[0x40]).unwrap_err();
        assert_eq!(err.status(), Status::INVALID_PARAMETER);
        assert!(mock.get_writes().is_empty());
    }

    #[test]
    fn test_set_empty_ranged_value_rejected() {
        let (dev, mock) = setup(HardwareFlags::default());
        let err = dev.mlme_set_request(PHY_TRANSMIT_POWER, 0, &[]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        let err = dev.mlme_set_request(MAC_BEACON_ORDER, 0, &[]).unwrap_err();
        assert_eq!(err.status(), Status::INVALID_PARAMETER);
        assert!(mock.get_writes().is_empty());
    }

    #[test]
    fn test_failing_confirm_without_tail_keeps_status() {
        let (dev, mock) = setup(HardwareFlags::default());
        mock.queue_frame(CommandId::MLME_GET_CONFIRM, &[0xF4, 0x50, 0x00]);
        let err = dev.mlme_get_request(0x50, 0).unwrap_err();
        assert!(matches!(err, ApiError::Status(Status::UNSUPPORTED_ATTRIBUTE)));

        mock.queue_frame(CommandId::TDME_LOTLK_CONFIRM, &[0x04]);
        let err = dev.tdme_lotlk_request(CHANNEL, true).unwrap_err();
        assert_eq!(err.status(), Status(0x04));

        mock.queue_frame(CommandId::MCPS_PURGE_CONFIRM, &[0x07, 0xE7]);
        let err = dev.mcps_purge_request(7).unwrap_err();
        assert_eq!(err.status(), Status::INVALID_HANDLE);
    }

    #[test]
    fn test_set_channel_calibrates_first() {
        let (dev, mock) = setup(HardwareFlags::default());
        setsfr_ok(&mock, 1, 0xBF);
        mock.queue_frame(CommandId::MLME_SET_CONFIRM, &[0x00]);

        dev.mlme_set_request(PHY_CURRENT_CHANNEL, 0, &[CHANNEL]).unwrap();
        let frames = mock.written_frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].to_bytes(), vec![0x51, 0x03, 0x01, 0xBF, 0xAE]);
        assert_eq!(frames[1].to_bytes(), vec![0x4A, 0x04, 0x00, 0x00, 0x01, 0x0D]);
    }

    #[test]
    fn test_set_channel_calibration_failure_aborts() {
        let (dev, mock) = setup(HardwareFlags::default());
        mock.queue_frame(CommandId::TDME_SETSFR_CONFIRM, &[0x02, 0x01, 0xBF]);

        let err = dev.mlme_set_request(PHY_CURRENT_CHANNEL, 0, &[CHANNEL]).unwrap_err();
        assert_eq!(err.status(), Status::TDME_INVALID);
        assert_eq!(mock.written_frames().len(), 1);
    }

    #[test]
    fn test_tx_power_never_reaches_pib() {
        let (dev, mock) = setup(HardwareFlags::default());
        setsfr_ok(&mock, 0, 0xFE);
        dev.mlme_set_request(PHY_TRANSMIT_POWER, 0, &[0x05]).unwrap();
        assert_eq!(sfr_writes(&mock), vec![(0, 0xFE, 0x10)]);

        mock.clear_writes();
        mock.queue_frame(CommandId::TDME_GETSFR_CONFIRM, &[0x00, 0x00, 0xFE, 0x10]);
        assert_eq!(dev.mlme_get_request(PHY_TRANSMIT_POWER, 0).unwrap(), vec![0x05]);
        let frames = mock.written_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].command_id, CommandId::TDME_GETSFR_REQUEST);
    }

    #[test]
    fn test_tx_power_mpw_round_trip() {
        let (dev, mock) = setup(HardwareFlags {
            workarounds: false,
            mpw: true,
        });
        setsfr_ok(&mock, 0, 0xB1);
        dev.set_tx_power(0x08).unwrap();
        assert_eq!(sfr_writes(&mock), vec![(0, 0xB1, 0xD3)]);

        mock.queue_frame(CommandId::TDME_GETSFR_CONFIRM, &[0x00, 0x00, 0xB1, 0xD3]);
        assert_eq!(dev.get_tx_power().unwrap(), 0x44);
    }

    #[test]
    fn test_reset_workaround() {
        let (dev, mock) = setup(HardwareFlags {
            workarounds: true,
            mpw: false,
        });
        mock.queue_frame(CommandId::MLME_RESET_CONFIRM, &[0x00]);
        setsfr_ok(&mock, 0, 0xD8);
        dev.mlme_reset_request(true).unwrap();
        assert_eq!(sfr_writes(&mock), vec![(0, 0xD8, 0x00)]);

        // No fix-up without a PIB reset.
        mock.clear_writes();
        mock.queue_frame(CommandId::MLME_RESET_CONFIRM, &[0x00]);
        dev.mlme_reset_request(false).unwrap();
        assert!(sfr_writes(&mock).is_empty());
    }

    #[test]
    fn test_reset_workaround_failure_is_returned() {
        let (dev, mock) = setup(HardwareFlags {
            workarounds: true,
            mpw: false,
        });
        mock.queue_frame(CommandId::MLME_RESET_CONFIRM, &[0x00]);
        mock.queue_frame(CommandId::TDME_SETSFR_CONFIRM, &[0x03, 0x00, 0xD8]);
        let err = dev.mlme_reset_request(true).unwrap_err();
        assert_eq!(err.status(), Status::TDME_NO_ACCESS);
    }

    #[test]
    fn test_reset_failure_skips_workaround() {
        let (dev, mock) = setup(HardwareFlags {
            workarounds: true,
            mpw: false,
        });
        mock.queue_frame(CommandId::MLME_RESET_CONFIRM, &[0xE8]);
        let err = dev.mlme_reset_request(true).unwrap_err();
        assert_eq!(err.status(), Status::INVALID_PARAMETER);
        assert_eq!(mock.written_frames().len(), 1);
    }

    #[test]
    fn test_chip_init_writes_sequence() {
        let (dev, mock) = setup(HardwareFlags::default());
        for w in CHIP_INIT_SEQUENCE {
            setsfr_ok(&mock, w.page, w.address);
        }
        dev.chip_init().unwrap();
        let writes = sfr_writes(&mock);
        assert_eq!(writes.len(), CHIP_INIT_SEQUENCE.len());
        assert_eq!(writes[0], (1, 0xE1, 0x29));
        assert_eq!(writes[10], (0, 0xFE, 0x3F));
    }

    #[test]
    fn test_chip_init_aborts_on_first_failure() {
        let (dev, mock) = setup(HardwareFlags::default());
        setsfr_ok(&mock, 1, 0xE1);
        setsfr_ok(&mock, 1, 0xE2);
        mock.queue_frame(CommandId::TDME_SETSFR_CONFIRM, &[0x03, 0x01, 0xE3]);

        let err = dev.chip_init().unwrap_err();
        assert_eq!(err.status(), Status::TDME_NO_ACCESS);
        assert_eq!(sfr_writes(&mock).len(), 3);
    }

    #[test]
    fn test_start_and_associate_calibrate_channel() {
        let (dev, mock) = setup(HardwareFlags::default());
        setsfr_ok(&mock, 1, 0xBF);
        mock.queue_frame(CommandId::MLME_START_CONFIRM, &[0x00]);
        dev.mlme_start_request(&StartRequest {
            pan_id: PAN_ID,
            logical_channel: 26,
            beacon_order: 15,
            superframe_order: 15,
            pan_coordinator: true,
            battery_life_extension: false,
            coord_realignment: false,
            coord_realign_security: None,
            beacon_security: None,
        })
        .unwrap();

        setsfr_ok(&mock, 1, 0xBF);
        dev.mlme_associate_request(&AssociateRequest {
            logical_channel: 11,
            coord: FullAddress::short(PAN_ID, 0x0000),
            capability_info: 0x80,
            security: None,
        })
        .unwrap();

        assert_eq!(sfr_writes(&mock), vec![(1, 0xBF, 0xA7), (1, 0xBF, 0xAF)]);
        let ids: Vec<CommandId> = mock.written_frames().iter().map(|f| f.command_id).collect();
        assert_eq!(
            ids,
            vec![
                CommandId::TDME_SETSFR_REQUEST,
                CommandId::MLME_START_REQUEST,
                CommandId::TDME_SETSFR_REQUEST,
                CommandId::MLME_ASSOCIATE_REQUEST,
            ]
        );
    }

    #[test]
    fn test_tdme_set_channel_calibrates_first() {
        let (dev, mock) = setup(HardwareFlags::default());
        setsfr_ok(&mock, 1, 0xBF);
        mock.queue_frame(CommandId::TDME_SET_CONFIRM, &[0x00, TDME_CHANNEL]);
        dev.tdme_set_request(TDME_CHANNEL, &[CHANNEL]).unwrap();
        let frames = mock.written_frames();
        assert_eq!(frames[0].command_id, CommandId::TDME_SETSFR_REQUEST);
        assert_eq!(frames[1].to_bytes(), vec![0x54, 0x03, 0x00, 0x01, 0x0D]);
    }

    #[test]
    fn test_txpkt_confirm() {
        let (dev, mock) = setup(HardwareFlags::default());
        mock.queue_frame(
            CommandId::TDME_TXPKT_CONFIRM,
            &[0x00, 0x00, 0x04, 0xDE, 0xAD, 0xBE, 0xEF],
        );
        let cnf = dev
            .tdme_txpkt_request(&TxPacketRequest {
                sequence_number: 0,
                packet: TestPacketData::Appended(vec![0xDE, 0xAD, 0xBE, 0xEF]),
            })
            .unwrap();
        assert_eq!(cnf.data, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        let sent: Frame = mock.written_frames().remove(0);
        assert_eq!(sent.payload[0], TDME_TXD_APPENDED);
    }

    #[test]
    fn test_haes_round_trip() {
        let (dev, mock) = setup(HardwareFlags::default());
        let mut reply = vec![0x00];
        reply.extend_from_slice(&[0x5A; 16]);
        mock.queue_frame(CommandId::HWME_HAES_CONFIRM, &reply);
        assert_eq!(dev.hwme_haes_request(0, [0; 16]).unwrap(), [0x5A; 16]);
    }

    #[test]
    fn test_transport_error_is_system_error() {
        let (dev, mock) = setup(HardwareFlags::default());
        mock.disconnect();
        let err = dev.tdme_getsfr_request(0, 0xFE).unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Disconnected)));
        assert_eq!(err.status(), Status::SYSTEM_ERROR);
    }

    #[test]
    fn test_dispatch_uses_registered_callbacks() {
        let (mut dev, _mock) = setup(HardwareFlags::default());
        let mut cb = Callbacks::new();
        cb.on_wakeup_indication(|ind| {
            assert_eq!(ind.condition, 0x01);
            Ok(())
        });
        dev.register_callbacks(cb);
        assert_eq!(
            dev.dispatch(&[0x35, 0x01, 0x01]).unwrap(),
            Dispatched::Handled(CommandId::HWME_WAKEUP_INDICATION)
        );
    }
}
