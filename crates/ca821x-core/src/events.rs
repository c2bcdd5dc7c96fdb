//! Event system for front-end decoupling.
//!
//! Lets the CLI (or any embedding application) watch link traffic without
//! tight coupling to the exchange engine or the reader thread.

use std::fmt;

use crate::protocol::CommandId;

/// Frame direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDirection {
    Tx, // Host -> chip
    Rx, // Chip -> host
}

impl fmt::Display for FrameDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDirection::Tx => write!(f, "TX"),
            FrameDirection::Rx => write!(f, "RX"),
        }
    }
}

/// Events emitted by a device link.
#[derive(Debug, Clone)]
pub enum LinkEvent {
    /// A frame crossed the command channel.
    Frame {
        direction: FrameDirection,
        command_id: CommandId,
        length: usize,
    },
    /// Idle frames skipped while waiting for a confirm.
    IdleSkipped { count: usize },
    /// The chip refused a request.
    Nack,
    /// A frame nobody handles.
    Unrecognised { command_id: CommandId },
    /// Background reader started.
    ReaderStarted,
    /// Transient reader failure; the loop keeps going.
    ReaderError { message: String },
    /// Background reader exited.
    ReaderStopped,
}

/// Observer trait for receiving link events.
///
/// Implement this trait in your front end to receive updates.
pub trait LinkObserver: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: &LinkEvent);
}

/// No-op observer that discards all events.
pub struct NullObserver;

impl LinkObserver for NullObserver {
    fn on_event(&self, _event: &LinkEvent) {}
}

/// Observer that logs events using tracing.
pub struct TracingObserver;

impl LinkObserver for TracingObserver {
    fn on_event(&self, event: &LinkEvent) {
        match event {
            LinkEvent::Frame {
                direction,
                command_id,
                length,
            } => {
                tracing::debug!(dir = %direction, id = %command_id, len = length, "Frame");
            }
            LinkEvent::IdleSkipped { count } => {
                tracing::trace!(count = count, "Skipped idle frames");
            }
            LinkEvent::Nack => {
                tracing::warn!("Chip NACKed request");
            }
            LinkEvent::Unrecognised { command_id } => {
                tracing::warn!(id = %format!("0x{:02X}", command_id.as_u8()), "Unrecognised frame");
            }
            LinkEvent::ReaderStarted => {
                tracing::info!("Reader started");
            }
            LinkEvent::ReaderError { message } => {
                tracing::warn!("Reader error: {}", message);
            }
            LinkEvent::ReaderStopped => {
                tracing::info!("Reader stopped");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every event for later inspection.
    #[derive(Default)]
    pub(crate) struct RecordingObserver {
        pub events: Mutex<Vec<LinkEvent>>,
    }

    impl LinkObserver for RecordingObserver {
        fn on_event(&self, event: &LinkEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(FrameDirection::Tx.to_string(), "TX");
        assert_eq!(FrameDirection::Rx.to_string(), "RX");
    }

    #[test]
    fn test_recording_observer() {
        let obs = RecordingObserver::default();
        obs.on_event(&LinkEvent::Nack);
        obs.on_event(&LinkEvent::IdleSkipped { count: 2 });
        let events = obs.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], LinkEvent::IdleSkipped { count: 2 }));
    }
}
