use thiserror::Error;

use crate::protocol::command::CommandDescriptor;

/// Errors returned by packet decoding.
///
/// A nonzero device error code is not an error here; it is reported as
/// `DecodeOutcome::DeviceError`.
///
/// # Examples
/// ```
/// use snapshot_core::{DecodeError, decode};
///
/// let err = decode(&[0x7E, 0x20, 250, 0]).unwrap_err();
/// assert!(matches!(err, DecodeError::UnknownCommand(250)));
/// assert!(err.to_string().contains("unknown command"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("invalid header marker: {}", describe_marker(.found))]
    InvalidHeader { found: Option<u8> },
    #[error("packet truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("unknown command identifier: {0}")]
    UnknownCommand(u8),
    #[error("payload decode failed for {command}: {source}")]
    PayloadDecode {
        command: CommandDescriptor,
        #[source]
        source: PayloadError,
    },
}

/// Errors raised while decoding a command payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("payload holds a non-finite value")]
    NonFinite,
}

impl DecodeError {
    /// Stable short label, used by report aggregation and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::InvalidHeader { .. } => "invalid_header",
            DecodeError::Truncated { .. } => "truncated",
            DecodeError::UnknownCommand(_) => "unknown_command",
            DecodeError::PayloadDecode { .. } => "payload_decode",
        }
    }
}

fn describe_marker(found: &Option<u8>) -> String {
    match found {
        Some(byte) => format!("0x{byte:02X}"),
        None => "empty buffer".to_string(),
    }
}
