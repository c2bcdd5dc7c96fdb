//! Inbound frame routing.
//!
//! [`Callbacks`] holds one optional handler per indication or asynchronous
//! confirm plus a generic fallback. [`Callbacks::dispatch`] decodes a frame
//! and hands it to the matching handler on the calling thread.

use thiserror::Error;
use tracing::{debug, warn};

use crate::payload::hwme::WakeupIndication;
use crate::payload::mcps::{DataConfirm, DataIndication};
use crate::payload::mlme::{
    AssociateConfirm, AssociateIndication, BeaconNotifyIndication, CommStatusIndication,
    DisassociateConfirm, DisassociateIndication, OrphanIndication, ScanConfirm,
    SyncLossIndication,
};
use crate::payload::tdme::{EdDetectIndication, RxPacketIndication, TdmeErrorIndication};
use crate::protocol::{CommandId, Decode, Frame, FrameError};

/// Handler for one decoded upstream primitive.
pub type Handler<T> = Box<dyn Fn(&T) -> anyhow::Result<()> + Send + Sync>;

/// Handler for undecoded bytes.
pub type RawHandler = Box<dyn Fn(&[u8]) -> anyhow::Result<()> + Send + Sync>;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Malformed frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Unrecognised command id {0}")]
    Unrecognised(CommandId),

    #[error("Callback for {id} failed: {source}")]
    Callback {
        id: CommandId,
        #[source]
        source: anyhow::Error,
    },
}

/// What happened to a dispatched frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A specific handler ran.
    Handled(CommandId),
    /// The generic handler ran.
    Generic(CommandId),
    /// Recognised, but no handler is registered for it.
    Dropped(CommandId),
    /// Idle sentinel; nothing to do.
    Idle,
}

/// Per-device callback table.
#[derive(Default)]
pub struct Callbacks {
    data_indication: Option<Handler<DataIndication>>,
    data_confirm: Option<Handler<DataConfirm>>,
    associate_indication: Option<Handler<AssociateIndication>>,
    associate_confirm: Option<Handler<AssociateConfirm>>,
    disassociate_indication: Option<Handler<DisassociateIndication>>,
    disassociate_confirm: Option<Handler<DisassociateConfirm>>,
    beacon_notify_indication: Option<Handler<BeaconNotifyIndication>>,
    orphan_indication: Option<Handler<OrphanIndication>>,
    scan_confirm: Option<Handler<ScanConfirm>>,
    comm_status_indication: Option<Handler<CommStatusIndication>>,
    sync_loss_indication: Option<Handler<SyncLossIndication>>,
    wakeup_indication: Option<Handler<WakeupIndication>>,
    tdme_message_indication: Option<RawHandler>,
    rx_packet_indication: Option<Handler<RxPacketIndication>>,
    ed_detect_indication: Option<Handler<EdDetectIndication>>,
    tdme_error_indication: Option<Handler<TdmeErrorIndication>>,
    generic: Option<RawHandler>,
}

macro_rules! setters {
    ($($(#[$doc:meta])* $name:ident => $field:ident : $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<F>(&mut self, f: F) -> &mut Self
            where
                F: Fn(&$ty) -> anyhow::Result<()> + Send + Sync + 'static,
            {
                self.$field = Some(Box::new(f));
                self
            }
        )*
    };
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    setters! {
        on_data_indication => data_indication: DataIndication;
        on_data_confirm => data_confirm: DataConfirm;
        on_associate_indication => associate_indication: AssociateIndication;
        on_associate_confirm => associate_confirm: AssociateConfirm;
        on_disassociate_indication => disassociate_indication: DisassociateIndication;
        on_disassociate_confirm => disassociate_confirm: DisassociateConfirm;
        on_beacon_notify_indication => beacon_notify_indication: BeaconNotifyIndication;
        on_orphan_indication => orphan_indication: OrphanIndication;
        on_scan_confirm => scan_confirm: ScanConfirm;
        on_comm_status_indication => comm_status_indication: CommStatusIndication;
        on_sync_loss_indication => sync_loss_indication: SyncLossIndication;
        on_wakeup_indication => wakeup_indication: WakeupIndication;
        /// Receives the raw text of a TDME-MESSAGE.indication.
        on_tdme_message_indication => tdme_message_indication: [u8];
        on_rx_packet_indication => rx_packet_indication: RxPacketIndication;
        on_ed_detect_indication => ed_detect_indication: EdDetectIndication;
        on_tdme_error_indication => tdme_error_indication: TdmeErrorIndication;
        /// Receives the whole frame for anything without a specific handler.
        on_generic => generic: [u8];
    }

    /// Route one inbound frame.
    pub fn dispatch(&self, bytes: &[u8]) -> Result<Dispatched, DispatchError> {
        if bytes.first() == Some(&CommandId::IDLE.as_u8()) {
            return Ok(Dispatched::Idle);
        }
        let frame = Frame::from_bytes(bytes)?;
        let id = frame.command_id;
        let payload = frame.payload.as_slice();

        let handled = match id {
            CommandId::MCPS_DATA_INDICATION => call(&self.data_indication, payload),
            CommandId::MCPS_DATA_CONFIRM => call(&self.data_confirm, payload),
            CommandId::MLME_ASSOCIATE_INDICATION => call(&self.associate_indication, payload),
            CommandId::MLME_ASSOCIATE_CONFIRM => call(&self.associate_confirm, payload),
            CommandId::MLME_DISASSOCIATE_INDICATION => {
                call(&self.disassociate_indication, payload)
            }
            CommandId::MLME_DISASSOCIATE_CONFIRM => call(&self.disassociate_confirm, payload),
            CommandId::MLME_BEACON_NOTIFY_INDICATION => {
                call(&self.beacon_notify_indication, payload)
            }
            CommandId::MLME_ORPHAN_INDICATION => call(&self.orphan_indication, payload),
            CommandId::MLME_SCAN_CONFIRM => call(&self.scan_confirm, payload),
            CommandId::MLME_COMM_STATUS_INDICATION => call(&self.comm_status_indication, payload),
            CommandId::MLME_SYNC_LOSS_INDICATION => call(&self.sync_loss_indication, payload),
            CommandId::HWME_WAKEUP_INDICATION => call(&self.wakeup_indication, payload),
            CommandId::TDME_MESSAGE_INDICATION => match &self.tdme_message_indication {
                Some(f) => f(payload).map(|_| true).map_err(HandlerError::Callback),
                None => Ok(false),
            },
            CommandId::TDME_RXPKT_INDICATION => call(&self.rx_packet_indication, payload),
            CommandId::TDME_EDDET_INDICATION => call(&self.ed_detect_indication, payload),
            CommandId::TDME_ERROR_INDICATION => call(&self.tdme_error_indication, payload),
            _ if id.is_sync() && !id.is_sentinel() => Ok(false),
            _ => {
                warn!(id = %format!("0x{:02X}", id.as_u8()), "Unrecognised frame");
                return Err(DispatchError::Unrecognised(id));
            }
        }
        .map_err(|e| match e {
            HandlerError::Decode(e) => DispatchError::Frame(e),
            HandlerError::Callback(source) => DispatchError::Callback { id, source },
        })?;

        if handled {
            debug!(id = %id, "Dispatched");
            return Ok(Dispatched::Handled(id));
        }
        match &self.generic {
            Some(f) => {
                f(bytes).map_err(|source| DispatchError::Callback { id, source })?;
                Ok(Dispatched::Generic(id))
            }
            None => {
                debug!(id = %id, "No handler registered");
                Ok(Dispatched::Dropped(id))
            }
        }
    }
}

enum HandlerError {
    Decode(FrameError),
    Callback(anyhow::Error),
}

/// Decode and run `slot` if it is set. `Ok(false)` when empty.
fn call<T: Decode>(slot: &Option<Handler<T>>, payload: &[u8]) -> Result<bool, HandlerError> {
    let Some(f) = slot else {
        return Ok(false);
    };
    let decoded = T::from_payload(payload).map_err(HandlerError::Decode)?;
    f(&decoded).map_err(HandlerError::Callback)?;
    Ok(true)
}
