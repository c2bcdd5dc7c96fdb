//! Background reader thread.
//!
//! Polls the channel under the exchange lock and feeds every frame to the
//! device's callback table. Callbacks therefore run on this thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

use crate::device::Ca821x;
use crate::dispatch::DispatchError;
use crate::events::LinkEvent;
use crate::transport::{Transport, TransportError};

/// Handle to a running reader. Dropping it stops the thread.
pub struct ReaderHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ReaderHandle {
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Ask the thread to exit and wait for it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Reader thread panicked");
            }
        }
    }
}

impl Drop for ReaderHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start reading frames for `device`, sleeping `interval` whenever the
/// channel is idle.
pub fn spawn_reader<T>(device: Arc<Ca821x<T>>, interval: Duration) -> std::io::Result<ReaderHandle>
where
    T: Transport + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    let thread = thread::Builder::new()
        .name("ca821x-reader".into())
        .spawn(move || run(&device, &flag, interval))?;

    Ok(ReaderHandle {
        stop,
        thread: Some(thread),
    })
}

fn run<T: Transport>(device: &Ca821x<T>, stop: &AtomicBool, interval: Duration) {
    let exchange = device.exchange();
    exchange.notify(&LinkEvent::ReaderStarted);

    while !stop.load(Ordering::SeqCst) {
        match exchange.poll() {
            Ok(Some(bytes)) => match device.dispatch(&bytes) {
                Ok(outcome) => debug!(?outcome, "Frame dispatched"),
                Err(DispatchError::Unrecognised(command_id)) => {
                    exchange.notify(&LinkEvent::Unrecognised { command_id });
                }
                Err(e) => {
                    warn!("Dispatch failed: {}", e);
                }
            },
            Ok(None) => thread::sleep(interval),
            Err(TransportError::Disconnected) => {
                warn!("Device disconnected, reader exiting");
                break;
            }
            Err(e) => {
                exchange.notify(&LinkEvent::ReaderError {
                    message: e.to_string(),
                });
                thread::sleep(interval);
            }
        }
    }

    exchange.notify(&LinkEvent::ReaderStopped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Callbacks;
    use crate::protocol::CommandId;
    use crate::transport::MockTransport;
    use std::sync::mpsc;
    use std::time::Instant;

    #[test]
    fn test_reader_dispatches_indications() {
        let mock = MockTransport::new();
        let mut device = Ca821x::new(mock.clone());
        let (tx, rx) = mpsc::channel();
        let tx = std::sync::Mutex::new(tx);
        let mut cb = Callbacks::new();
        cb.on_tdme_error_indication(move |ind| {
            tx.lock().unwrap().send(ind.error_code)?;
            Ok(())
        });
        device.register_callbacks(cb);

        mock.queue_bytes(&[0xFF, 0x00]);
        mock.queue_frame(CommandId::TDME_ERROR_INDICATION, &[0x07]);

        let handle = spawn_reader(Arc::new(device), Duration::from_millis(1)).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 0x07);
        assert!(handle.is_running());
        handle.stop();
    }

    #[test]
    fn test_request_is_atomic_against_reader() {
        let mock = MockTransport::new();
        let mut device = Ca821x::new(mock.clone());
        let stolen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = stolen.clone();
        let mut cb = Callbacks::new();
        cb.on_generic(move |bytes| {
            seen.lock().unwrap().push(bytes.to_vec());
            Ok(())
        });
        device.register_callbacks(cb);

        let device = Arc::new(device);
        let handle = spawn_reader(device.clone(), Duration::from_micros(10)).unwrap();
        for _ in 0..200 {
            mock.reply_to(
                CommandId::MLME_RESET_REQUEST,
                CommandId::MLME_RESET_CONFIRM,
                &[0x00],
            );
            device.mlme_reset_request(false).unwrap();
        }
        handle.stop();

        assert_eq!(mock.written_frames().len(), 200);
        assert!(stolen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reader_exits_on_disconnect() {
        let mock = MockTransport::new();
        let device = Arc::new(Ca821x::new(mock.clone()));
        let handle = spawn_reader(device, Duration::from_millis(1)).unwrap();
        mock.disconnect();

        let deadline = Instant::now() + Duration::from_secs(5);
        while handle.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!handle.is_running());
    }
}
