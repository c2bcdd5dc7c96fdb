//! Mock transport for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::traits::{Transport, TransportError};
use crate::protocol::{CommandId, Frame};

#[derive(Default)]
struct MockState {
    /// Queued frames to return on read.
    rx_queue: VecDeque<Vec<u8>>,
    /// Captured writes.
    write_log: Vec<Vec<u8>>,
    /// Frames queued once a write with the given id arrives.
    replies: Vec<(u8, Vec<u8>)>,
    disconnected: bool,
}

/// Scripted transport for exercising the exchange engine.
///
/// Clones share state, so a test can keep a handle after moving the
/// transport into a device.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        // Poisoning is ignored.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue raw bytes to be returned on a later read.
    pub fn queue_bytes(&self, bytes: &[u8]) {
        self.state().rx_queue.push_back(bytes.to_vec());
    }

    /// Queue a frame built from an ID and payload.
    pub fn queue_frame(&self, command_id: CommandId, payload: &[u8]) {
        let mut bytes = vec![command_id.as_u8(), payload.len() as u8];
        bytes.extend_from_slice(payload);
        self.queue_bytes(&bytes);
    }

    /// Queue `reply` only when a frame with id `request` is written.
    ///
    /// Each registration answers one write.
    pub fn reply_to(&self, request: CommandId, reply: CommandId, payload: &[u8]) {
        let mut bytes = vec![reply.as_u8(), payload.len() as u8];
        bytes.extend_from_slice(payload);
        self.state().replies.push((request.as_u8(), bytes));
    }

    /// Frames still waiting to be read.
    pub fn pending(&self) -> usize {
        self.state().rx_queue.len()
    }

    /// Get all captured writes.
    pub fn get_writes(&self) -> Vec<Vec<u8>> {
        self.state().write_log.clone()
    }

    /// Captured writes parsed back into frames.
    pub fn written_frames(&self) -> Vec<Frame> {
        self.state()
            .write_log
            .iter()
            .filter_map(|w| Frame::from_bytes(w).ok())
            .collect()
    }

    /// Clear captured writes.
    pub fn clear_writes(&self) {
        self.state().write_log.clear();
    }

    /// Simulate device disconnect.
    pub fn disconnect(&self) {
        self.state().disconnected = true;
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut state = self.state();
        if state.disconnected {
            return Err(TransportError::Disconnected);
        }
        state.write_log.push(data.to_vec());
        if let Some(pos) = state
            .replies
            .iter()
            .position(|(id, _)| data.first() == Some(id))
        {
            let (_, reply) = state.replies.remove(pos);
            state.rx_queue.push_back(reply);
        }
        Ok(data.len())
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut state = self.state();
        if state.disconnected {
            return Err(TransportError::Disconnected);
        }
        Ok(state.rx_queue.pop_front().unwrap_or_default())
    }

    fn is_connected(&self) -> bool {
        !self.state().disconnected
    }
}
