//! Errors returned by device primitives.

use thiserror::Error;

use crate::protocol::{CommandId, FrameError, Status};
use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Unexpected confirm: expected {expected}, got {actual}")]
    UnexpectedConfirm {
        expected: CommandId,
        actual: CommandId,
    },

    #[error("Chip NACKed the request")]
    Nack,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Chip returned {0}")]
    Status(Status),
}

impl ApiError {
    /// The status byte a C caller would have seen.
    pub fn status(&self) -> Status {
        match self {
            ApiError::Transport(_)
            | ApiError::UnexpectedConfirm { .. }
            | ApiError::Nack => Status::SYSTEM_ERROR,
            ApiError::Frame(FrameError::FieldTooLong { .. }) | ApiError::InvalidParameter(_) => {
                Status::INVALID_PARAMETER
            }
            ApiError::Frame(_) => Status::SYSTEM_ERROR,
            ApiError::Status(status) => *status,
        }
    }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Turn a non-success chip status into an error.
pub(crate) fn check_status(status: Status) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status(status))
    }
}
