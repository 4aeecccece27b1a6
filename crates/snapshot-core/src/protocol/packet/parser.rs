use serde::Serialize;

use super::error::{DecodeError, PayloadError};
use super::layout;
use super::reader::{PacketReader, PayloadReader};
use crate::protocol::colour::{Lab, lab_to_rgb8};
use crate::protocol::command::{self, Command, CommandDescriptor};

/// Packet classification carried by the flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Notification,
    Response,
}

impl PacketKind {
    pub fn from_flags(flags: u8) -> Self {
        if flags & layout::FLAG_RESPONSE != 0 {
            PacketKind::Response
        } else {
            PacketKind::Notification
        }
    }
}

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DecodedValue {
    /// `#RRGGBB` colour converted from the device's Lab reading.
    Colour(String),
    /// Raw payload of a command this decoder does not interpret.
    Unparsed(Vec<u8>),
}

/// Result of decoding one well-formed packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeOutcome {
    Notification(CommandDescriptor),
    DeviceError {
        command: CommandDescriptor,
        code: u8,
    },
    Response {
        command: CommandDescriptor,
        value: DecodedValue,
    },
}

impl DecodeOutcome {
    pub fn command(&self) -> &CommandDescriptor {
        match self {
            DecodeOutcome::Notification(command)
            | DecodeOutcome::DeviceError { command, .. }
            | DecodeOutcome::Response { command, .. } => command,
        }
    }
}

/// Decode one raw buffer received from the device.
///
/// Header checks run in wire order and the first failure wins: marker,
/// length, command identifier, then error code. A nonzero error code is a
/// normal outcome regardless of the flags byte. Notifications are classified
/// but their payload is left alone.
///
/// # Examples
/// ```
/// use snapshot_core::{DecodeOutcome, decode};
///
/// let outcome = decode(&[0x7E, 0x00, 2, 0]).unwrap();
/// assert!(matches!(outcome, DecodeOutcome::Notification(cmd) if cmd.name == "CMD_PING"));
/// ```
///
/// # Errors
/// Returns `DecodeError` when the buffer is not a valid packet or a response
/// payload cannot be decoded.
pub fn decode(buffer: &[u8]) -> Result<DecodeOutcome, DecodeError> {
    let reader = PacketReader::new(buffer);
    match reader.read_marker() {
        Some(layout::HEADER_MARKER) => {}
        found => return Err(DecodeError::InvalidHeader { found }),
    }
    reader.require_len(layout::HEADER_LEN)?;

    let identifier = reader.read_u8(layout::COMMAND_OFFSET)?;
    let command = command::lookup(identifier).ok_or(DecodeError::UnknownCommand(identifier))?;

    let code = reader.read_u8(layout::ERROR_CODE_OFFSET)?;
    if code != layout::ERROR_CODE_OK {
        return Ok(DecodeOutcome::DeviceError { command, code });
    }

    let flags = reader.read_u8(layout::FLAGS_OFFSET)?;
    if PacketKind::from_flags(flags) == PacketKind::Notification {
        return Ok(DecodeOutcome::Notification(command));
    }

    let value = decode_payload(&command, reader.payload())
        .map_err(|source| DecodeError::PayloadDecode { command, source })?;
    Ok(DecodeOutcome::Response { command, value })
}

fn decode_payload(
    command: &CommandDescriptor,
    payload: &[u8],
) -> Result<DecodedValue, PayloadError> {
    match command.command {
        Command::GetDataColour => decode_colour(payload).map(DecodedValue::Colour),
        _ => Ok(DecodedValue::Unparsed(payload.to_vec())),
    }
}

fn decode_colour(payload: &[u8]) -> Result<String, PayloadError> {
    let reader = PayloadReader::new(payload);
    if reader.len() != layout::COLOUR_PAYLOAD_LEN {
        return Err(PayloadError::LengthMismatch {
            expected: layout::COLOUR_PAYLOAD_LEN,
            actual: reader.len(),
        });
    }
    let read = |range: std::ops::Range<usize>| {
        reader.read_f32_be(range).ok_or(PayloadError::LengthMismatch {
            expected: layout::COLOUR_PAYLOAD_LEN,
            actual: payload.len(),
        })
    };
    let lab = Lab::new(
        f64::from(read(layout::COLOUR_L_RANGE)?),
        f64::from(read(layout::COLOUR_A_RANGE)?),
        f64::from(read(layout::COLOUR_B_RANGE)?),
    );
    if !lab.is_finite() {
        return Err(PayloadError::NonFinite);
    }
    Ok(lab_to_rgb8(lab).to_hex())
}
