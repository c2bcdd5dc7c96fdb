//! Protocol module - CA821x wire format definitions.

pub mod codec;
pub mod command_id;
pub mod constants;
pub mod frame;
pub mod types;

pub use codec::{Command, Confirm, Decode, PayloadReader, PayloadWriter, SyncCommand};
pub use command_id::CommandId;
pub use constants::*;
pub use frame::{Frame, FrameError};
pub use types::{AddressMode, FullAddress, PanDescriptor, SecuritySpec, Status};
