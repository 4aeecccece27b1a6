//! Device packet decoding.
//!
//! Every packet starts with a fixed four-byte header (marker, flags, command
//! identifier, error code) followed by a command-specific payload. Multi-byte
//! payload fields are big-endian.
//!
//! The decoder is a pure function of its input buffer and the static command
//! table: no state spans packets and nothing is logged. Callers own
//! presentation and recovery.
//!
//! Byte offsets live in `layout`, bounds-checked access in `reader`, and the
//! header/payload decoding in `parser`.

pub mod error;
pub mod layout;
pub mod parser;
pub(crate) mod reader;

pub use error::{DecodeError, PayloadError};
pub use parser::{DecodeOutcome, DecodedValue, PacketKind, decode};
