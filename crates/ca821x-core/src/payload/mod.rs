//! Primitive payloads.
//!
//! One module per management entity. Requests implement
//! [`Command`](crate::protocol::Command), upstream payloads implement
//! [`Decode`](crate::protocol::Decode).

pub mod hwme;
pub mod mcps;
pub mod mlme;
pub mod tdme;

#[cfg(test)]
pub(crate) mod fixtures;

pub use hwme::{
    HaesConfirm, HaesRequest, HwmeGetConfirm, HwmeGetRequest, HwmeSetConfirm, HwmeSetRequest,
    WakeupIndication,
};
pub use mcps::{DataConfirm, DataIndication, DataRequest, PurgeConfirm, PurgeRequest};
pub use mlme::{
    AssociateConfirm, AssociateIndication, AssociateRequest, AssociateResponse,
    BeaconNotifyIndication, CommStatusIndication, DisassociateConfirm, DisassociateIndication,
    DisassociateRequest, GetConfirm, GetRequest, OrphanIndication, OrphanResponse, PollRequest,
    ResetRequest, RxEnableRequest, ScanConfirm, ScanRequest, SetRequest, StartRequest,
    StatusConfirm, SyncLossIndication,
};
pub use tdme::{
    EdDetectIndication, GetSfrConfirm, GetSfrRequest, LoTlkConfirm, LoTlkRequest,
    RxPacketIndication, SetSfrConfirm, SetSfrRequest, TdmeErrorIndication, TdmeSetConfirm,
    TdmeSetRequest, TestModeConfirm, TestModeRequest, TestPacketData, TxPacketConfirm,
    TxPacketRequest,
};
