//! Hex capture source.
//!
//! A capture is a text file holding one device buffer per line as hex bytes,
//! optionally preceded by a capture timestamp and a comma:
//!
//! ```text
//! # ping notification, then a colour response
//! 1700000000.000, 7E 00 02 00
//! 1700000000.250, 7E2040004254EB8542A03852428670A4
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::HexFileSource;
