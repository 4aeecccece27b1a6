//! Device protocol.
//!
//! - `command`: the static command table and lookups
//! - `packet`: header validation, classification and payload decoding
//! - `colour`: CIELab to sRGB conversion used by the colour command
//!
//! Nothing in here performs I/O or logging.

pub mod colour;
pub mod command;
pub mod packet;
