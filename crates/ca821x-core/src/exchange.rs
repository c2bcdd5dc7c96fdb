//! Exchange engine.
//!
//! The command channel is one shared duplex stream and a synchronous
//! confirm is correlated only by being the next reply on it. Every
//! transport access therefore goes through one mutex: `request` holds it
//! from the write of the command until its confirm has been read, `send`
//! and `poll` hold it for a single write or read.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, instrument, trace};

use crate::error::{ApiError, Result, check_status};
use crate::events::{FrameDirection, LinkEvent, LinkObserver, NullObserver};
use crate::protocol::{Command, CommandId, Confirm, Decode, Frame, Status, SyncCommand};
use crate::transport::{Transport, TransportError};

/// Pause between empty reads while a confirm is outstanding.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_micros(500);

pub struct Exchange<T: Transport> {
    transport: Mutex<T>,
    observer: Arc<dyn LinkObserver>,
}

impl<T: Transport> Exchange<T> {
    pub fn new(transport: T) -> Self {
        Self::with_observer(transport, Arc::new(NullObserver))
    }

    pub fn with_observer(transport: T, observer: Arc<dyn LinkObserver>) -> Self {
        Self {
            transport: Mutex::new(transport),
            observer,
        }
    }

    pub fn set_observer(&mut self, observer: Arc<dyn LinkObserver>) {
        self.observer = observer;
    }

    pub(crate) fn notify(&self, event: &LinkEvent) {
        self.observer.on_event(event);
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        // Poisoning is ignored; the transport carries no invariant.
        self.transport.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_connected()
    }

    fn write_frame(&self, transport: &mut T, frame: &Frame) -> Result<()> {
        let bytes = frame.to_bytes();
        transport.write(&bytes)?;
        self.observer.on_event(&LinkEvent::Frame {
            direction: FrameDirection::Tx,
            command_id: frame.command_id,
            length: bytes.len(),
        });
        Ok(())
    }

    /// Write a fire-and-forget frame.
    #[instrument(skip(self, frame), fields(id = %frame.command_id))]
    pub fn send(&self, frame: &Frame) -> Result<()> {
        let mut transport = self.lock();
        self.write_frame(&mut transport, frame)
    }

    /// Write `frame` and read the next non-idle frame as its reply.
    ///
    /// The reply must carry `expected`; a NACK or any other id is an error.
    #[instrument(skip(self, frame), fields(id = %frame.command_id, expected = %expected))]
    pub fn request(&self, frame: &Frame, expected: CommandId) -> Result<Frame> {
        let mut transport = self.lock();
        self.write_frame(&mut transport, frame)?;

        let mut idle = 0usize;
        let reply = loop {
            let bytes = transport.read()?;
            if bytes.is_empty() {
                std::thread::sleep(CONFIRM_POLL_INTERVAL);
                continue;
            }
            match CommandId::from_u8(bytes[0]) {
                CommandId::IDLE => {
                    idle += 1;
                    continue;
                }
                CommandId::NACK => {
                    self.observer.on_event(&LinkEvent::Nack);
                    return Err(ApiError::Nack);
                }
                _ => break Frame::from_bytes(&bytes)?,
            }
        };
        drop(transport);

        if idle > 0 {
            self.observer.on_event(&LinkEvent::IdleSkipped { count: idle });
        }
        self.observer.on_event(&LinkEvent::Frame {
            direction: FrameDirection::Rx,
            command_id: reply.command_id,
            length: reply.payload.len() + 2,
        });

        if reply.command_id != expected {
            return Err(ApiError::UnexpectedConfirm {
                expected,
                actual: reply.command_id,
            });
        }
        debug!(len = reply.payload.len(), "Confirm received");
        Ok(reply)
    }

    /// Encode a synchronous command, run it and decode its confirm.
    ///
    /// A non-success status is returned as [`ApiError::Status`] before the
    /// rest of the confirm is decoded; failing confirms may omit their tail.
    pub fn exchange<C: SyncCommand>(&self, command: &C) -> Result<C::Confirm> {
        let frame = command.to_frame()?;
        let reply = self.request(&frame, C::CONFIRM)?;
        if let Some(&raw) = reply.payload.get(C::Confirm::STATUS_OFFSET) {
            check_status(Status(raw))?;
        }
        Ok(C::Confirm::from_payload(&reply.payload)?)
    }

    /// Encode and send a fire-and-forget command.
    pub fn post<C: Command>(&self, command: &C) -> Result<()> {
        let frame = command.to_frame()?;
        self.send(&frame)
    }

    /// One read for the background reader. `None` when nothing is pending.
    pub fn poll(&self) -> std::result::Result<Option<Vec<u8>>, TransportError> {
        let bytes = self.lock().read()?;
        match bytes.first() {
            None => Ok(None),
            Some(&b) if CommandId::from_u8(b) == CommandId::IDLE => {
                trace!("Idle frame");
                Ok(None)
            }
            Some(_) => {
                self.observer.on_event(&LinkEvent::Frame {
                    direction: FrameDirection::Rx,
                    command_id: CommandId::from_u8(bytes[0]),
                    length: bytes.len(),
                });
                Ok(Some(bytes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::tests::RecordingObserver;
    use crate::payload::mlme::{GetRequest, ResetRequest};
    use crate::protocol::{PHY_CURRENT_CHANNEL, Status};
    use crate::transport::MockTransport;

    fn setup() -> (Exchange<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        (Exchange::new(mock.clone()), mock)
    }

    #[test]
    fn test_request_returns_matching_confirm() {
        let (ex, mock) = setup();
        mock.queue_frame(CommandId::MLME_RESET_CONFIRM, &[0x00]);

        let cnf = ex
            .exchange(&ResetRequest {
                set_default_pib: true,
            })
            .unwrap();
        assert_eq!(cnf.status, Status::SUCCESS);
        assert_eq!(mock.get_writes(), vec![vec![0x47, 0x01, 0x01]]);
    }

    #[test]
    fn test_request_skips_idle() {
        let (ex, mock) = setup();
        mock.queue_bytes(&[0xFF, 0x00]);
        mock.queue_bytes(&[0xFF]);
        mock.queue_frame(CommandId::MLME_GET_CONFIRM, &[0x00, 0x00, 0x00, 0x01, 0x0B]);

        let cnf = ex
            .exchange(&GetRequest {
                attribute: PHY_CURRENT_CHANNEL,
                index: 0,
            })
            .unwrap();
        assert_eq!(cnf.value, vec![0x0B]);
        assert_eq!(mock.pending(), 0);
    }

    #[test]
    fn test_confirm_mismatch_is_system_error() {
        let (ex, mock) = setup();
        mock.queue_frame(CommandId::MLME_SET_CONFIRM, &[0x00]);

        let err = ex
            .exchange(&ResetRequest {
                set_default_pib: false,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnexpectedConfirm {
                expected: CommandId::MLME_RESET_CONFIRM,
                actual: CommandId::MLME_SET_CONFIRM,
            }
        ));
        assert_eq!(err.status(), Status::SYSTEM_ERROR);
    }

    #[test]
    fn test_nack_is_reported() {
        let mock = MockTransport::new();
        let obs = Arc::new(RecordingObserver::default());
        let ex = Exchange::with_observer(mock.clone(), obs.clone());
        mock.queue_bytes(&[0xF0, 0x00]);

        let err = ex
            .exchange(&ResetRequest {
                set_default_pib: false,
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::Nack));
        assert!(obs
            .events
            .lock()
            .unwrap()
            .iter()
            .any(|e| matches!(e, LinkEvent::Nack)));
    }

    #[test]
    fn test_transport_failure_surfaces() {
        let (ex, mock) = setup();
        mock.disconnect();
        let err = ex
            .exchange(&ResetRequest {
                set_default_pib: false,
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Disconnected)));
        assert_eq!(err.status(), Status::SYSTEM_ERROR);
    }

    #[test]
    fn test_oversized_frame_never_written() {
        let (ex, mock) = setup();
        let req = crate::payload::mlme::SetRequest {
            attribute: crate::protocol::MAC_BEACON_PAYLOAD,
            index: 0,
            value: vec![0; 251],
        };
        let err = ex.exchange(&req).unwrap_err();
        assert_eq!(err.status(), Status::INVALID_PARAMETER);
        assert!(mock.get_writes().is_empty());
    }

    #[test]
    fn test_poll() {
        let (ex, mock) = setup();
        assert_eq!(ex.poll().unwrap(), None);
        mock.queue_bytes(&[0xFF, 0x00]);
        assert_eq!(ex.poll().unwrap(), None);
        mock.queue_frame(CommandId::HWME_WAKEUP_INDICATION, &[0x00]);
        assert_eq!(ex.poll().unwrap(), Some(vec![0x35, 0x01, 0x00]));
    }
}
