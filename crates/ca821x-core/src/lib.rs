//! ca821x-core: host-side API for the Cascoda CA821x IEEE 802.15.4 transceiver.
//!
//! Translates MCPS/MLME/HWME/TDME primitives into the chip's
//! `[CommandId][Length][Payload]` command protocol and routes the frames
//! the chip sends back to registered callbacks.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! - **Protocol**: Command ids, frame layout, shared wire types, cursor codec
//! - **Payload**: One request/confirm/indication type per primitive
//! - **Transport**: Command channel abstraction (kernel device file, mock)
//! - **Exchange**: Serialised write / write-then-read over the transport
//! - **Dispatch**: Callback table for upstream frames
//! - **Device**: Per-transceiver context exposing every primitive
//! - **Reader**: Background thread feeding the dispatch table
//! - **Events**: Observer pattern for front-end decoupling
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ca821x_core::{Ca821x, Callbacks, DeviceConfig, spawn_reader};
//!
//! let config = DeviceConfig::default();
//! let mut device = Ca821x::open(&config)?;
//!
//! let mut callbacks = Callbacks::new();
//! callbacks.on_data_indication(|ind| {
//!     println!("{} bytes from {}", ind.msdu.len(), ind.src);
//!     Ok(())
//! });
//! device.register_callbacks(callbacks);
//!
//! let device = Arc::new(device);
//! device.mlme_reset_request(true)?;
//! let _reader = spawn_reader(device.clone(), config.poll_interval())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod exchange;
pub mod hw_defaults;
pub mod payload;
pub mod protocol;
pub mod reader;
pub mod transport;

// Re-exports for convenience
pub use config::DeviceConfig;
pub use device::{Ca821x, HardwareFlags};
pub use dispatch::{Callbacks, DispatchError, Dispatched};
pub use error::ApiError;
pub use events::{FrameDirection, LinkEvent, LinkObserver, NullObserver, TracingObserver};
pub use exchange::Exchange;
pub use protocol::{CommandId, Frame, FrameError, Status};
pub use reader::{ReaderHandle, spawn_reader};
pub use transport::{DeviceFileTransport, MockTransport, Transport, TransportError};
