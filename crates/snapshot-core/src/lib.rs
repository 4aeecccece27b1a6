//! Snapshot core library: decoding for the Snapshot colorimeter protocol.
//!
//! The device answers commands (and emits unsolicited notifications) as
//! small binary packets: a fixed four-byte header followed by a
//! command-specific payload. This crate resolves the command identifier
//! against a static command table, classifies the packet, and decodes
//! response payloads into typed values. The colour reading is converted from
//! the device's CIELab triple to an sRGB `#RRGGBB` string.
//!
//! Layering:
//! - `protocol`: command table, packet decoder, colour conversion. Pure, no
//!   I/O, no logging.
//! - `source`: producers of raw buffers (hex capture files, in-memory).
//! - `analysis`: drives a source through the decoder and aggregates a
//!   deterministic session report.
//!
//! Invariants:
//! - Command identifiers are unique; the table never changes at runtime.
//! - `decode` is stateless and reentrant; callers may decode concurrently.
//! - Report outputs are deterministic and stable across runs.
//!
//! # Examples
//! ```
//! use snapshot_core::{DecodeOutcome, DecodedValue, decode};
//!
//! let mut packet = vec![0x7E, 0x20, 64, 0];
//! for value in [53.23f32, 80.11, 67.22] {
//!     packet.extend_from_slice(&value.to_be_bytes());
//! }
//! match decode(&packet)? {
//!     DecodeOutcome::Response { value: DecodedValue::Colour(hex), .. } => {
//!         assert!(hex.starts_with('#') && hex.len() == 7);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod protocol;
mod source;

pub use analysis::{AnalysisError, analyze_capture_file, analyze_source, analyze_source_with};
pub use protocol::colour;
pub use protocol::command::{Command, CommandDescriptor, all as all_commands, lookup, lookup_name};
pub use protocol::packet::{
    DecodeError, DecodeOutcome, DecodedValue, PacketKind, PayloadError, decode,
};
pub use source::{
    FrameEvent, FrameSource, HexFileSource, HexLineError, SourceError, VecFrameSource,
    parse_hex_frame,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated session report with deterministic ordering.
///
/// # Examples
/// ```
/// use snapshot_core::make_stub_report;
///
/// let report = make_stub_report("session.hex", 123);
/// assert_eq!(report.report_version, snapshot_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Optional capture summary (may be empty when unavailable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Per-command counters, sorted by identifier.
    pub commands: Vec<CommandSummary>,
    /// Colour readings in arrival order.
    pub colours: Vec<ColourReading>,
    /// Most recent colour reading, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_colour: Option<String>,
    /// Violations sorted by severity and ID.
    pub violations: Vec<Violation>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "snapshot").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use snapshot_core::InputInfo;
///
/// let input = InputInfo {
///     path: "session.hex".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Basic capture summary (timestamps may be absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Total frames read from the source.
    pub frames_total: u64,
    /// Frames that decoded to an outcome (device errors included).
    pub frames_decoded: u64,
    /// RFC3339 timestamp of the first frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Per-command counters.
///
/// # Examples
/// ```
/// use snapshot_core::CommandSummary;
///
/// let summary = CommandSummary {
///     identifier: 2,
///     name: "CMD_PING".to_string(),
///     notifications: 1,
///     responses: 0,
///     device_errors: Vec::new(),
/// };
/// assert_eq!(summary.identifier, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    /// Wire identifier.
    pub identifier: u8,
    /// Symbolic tag (e.g., "CMD_PING").
    pub name: String,
    /// Notification packets observed.
    pub notifications: u64,
    /// Successfully decoded response packets.
    pub responses: u64,
    /// Device-reported error codes with their counts, sorted by code.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub device_errors: Vec<DeviceErrorCount>,
}

/// Occurrences of one device error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceErrorCount {
    pub code: u8,
    pub count: u64,
}

/// A decoded colour reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColourReading {
    /// One-based frame index within the capture.
    pub frame: u64,
    /// RFC3339 capture time, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    /// `#RRGGBB` colour.
    pub colour: String,
}

/// Single protocol violation record.
///
/// # Examples
/// ```
/// use snapshot_core::Violation;
///
/// let violation = Violation {
///     id: "SNAP-TRUNCATED".to_string(),
///     severity: "error".to_string(),
///     message: "Frame shorter than the packet header".to_string(),
///     count: 1,
///     examples: vec!["frame 3: packet truncated: need 4 bytes, got 2".to_string()],
/// };
/// assert_eq!(violation.count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Stable violation identifier (e.g., `SNAP-UNKNOWN-COMMAND`).
    pub id: String,
    /// Severity label (`error` or `warning`).
    pub severity: String,
    /// Human-readable message explaining the violation.
    pub message: String,
    /// Number of occurrences aggregated into this violation.
    pub count: u64,
    /// At most three example contexts, formatted as `frame N @ ts: detail`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use snapshot_core::make_stub_report;
///
/// let report = make_stub_report("session.hex", 123);
/// assert!(report.commands.is_empty());
/// assert!(report.last_colour.is_none());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> SessionReport {
    SessionReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "snapshot".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        commands: vec![],
        colours: vec![],
        last_colour: None,
        violations: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_optional_fields_when_none() {
        let mut report = make_stub_report("session.hex", 1);
        report.capture_summary = Some(CaptureSummary {
            frames_total: 1,
            frames_decoded: 1,
            time_start: None,
            time_end: None,
        });
        report.commands = vec![CommandSummary {
            identifier: 2,
            name: "CMD_PING".to_string(),
            notifications: 1,
            responses: 0,
            device_errors: vec![],
        }];
        report.colours = vec![ColourReading {
            frame: 1,
            ts: None,
            colour: "#000000".to_string(),
        }];

        let value = serde_json::to_value(&report).expect("report json");
        let capture = value.get("capture_summary").expect("capture_summary");
        assert!(capture.get("time_start").is_none());
        assert!(capture.get("time_end").is_none());
        assert!(value.get("last_colour").is_none());
        assert!(value["commands"][0].get("device_errors").is_none());
        assert!(value["colours"][0].get("ts").is_none());
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut report = make_stub_report("session.hex", 10);
        report.last_colour = Some("#FF0000".to_string());
        let json = serde_json::to_string(&report).expect("serialize");
        let parsed: SessionReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.last_colour.as_deref(), Some("#FF0000"));
        assert_eq!(parsed.tool.name, "snapshot");
    }
}
