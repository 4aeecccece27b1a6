use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocol::packet::layout::HEADER_LEN;
use crate::protocol::packet::{DecodeError, DecodeOutcome, DecodedValue, decode};
use crate::source::{FrameEvent, FrameSource, HexFileSource, SourceError};
use crate::{
    CaptureSummary, ColourReading, DEFAULT_GENERATED_AT, InputInfo, SessionReport,
    make_stub_report,
};

mod commands;
mod violations;

use commands::{CommandStats, build_command_summaries};
use violations::{ViolationKind, ViolationStats, build_violations};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn analyze_capture_file(path: &Path) -> Result<SessionReport, AnalysisError> {
    let source = HexFileSource::open(path)?;
    let input = InputInfo {
        path: path.display().to_string(),
        bytes: path.metadata()?.len(),
    };
    analyze_source(input, source)
}

pub fn analyze_source<S: FrameSource>(
    input: InputInfo,
    source: S,
) -> Result<SessionReport, AnalysisError> {
    analyze_source_with(input, source, |_, _, _| {})
}

/// Like `analyze_source`, calling `on_frame` with the one-based frame index,
/// the frame and its decode result as each frame is processed.
pub fn analyze_source_with<S, F>(
    input: InputInfo,
    mut source: S,
    mut on_frame: F,
) -> Result<SessionReport, AnalysisError>
where
    S: FrameSource,
    F: FnMut(u64, &FrameEvent, &Result<DecodeOutcome, DecodeError>),
{
    let mut frames_total = 0u64;
    let mut frames_decoded = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut command_stats: BTreeMap<u8, CommandStats> = BTreeMap::new();
    let mut violation_stats: BTreeMap<ViolationKind, ViolationStats> = BTreeMap::new();
    let mut colours = Vec::new();

    while let Some(event) = source.next_frame()? {
        frames_total += 1;
        let index = frames_total;
        update_ts_bounds(&mut first_ts, &mut last_ts, event.ts);

        let result = decode(&event.data);
        on_frame(index, &event, &result);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                let kind = ViolationKind::from_decode_error(&err);
                record_violation(&mut violation_stats, kind, index, event.ts, &err.to_string());
                continue;
            }
        };
        frames_decoded += 1;

        let command = *outcome.command();
        let stats = command_stats
            .entry(command.identifier)
            .or_insert_with(|| CommandStats::new(command));
        match outcome {
            DecodeOutcome::Notification(_) => stats.notifications += 1,
            DecodeOutcome::DeviceError { code, .. } => stats.add_device_error(code),
            DecodeOutcome::Response { value, .. } => {
                stats.responses += 1;
                let payload_len = event.data.len() - HEADER_LEN;
                if !command.accepts_payload_len(payload_len) {
                    let detail = format!(
                        "{command} expected {} payload bytes, got {payload_len}",
                        command.expected_response_len
                    );
                    record_violation(
                        &mut violation_stats,
                        ViolationKind::LengthMismatch,
                        index,
                        event.ts,
                        &detail,
                    );
                }
                if let DecodedValue::Colour(colour) = value {
                    colours.push(ColourReading {
                        frame: index,
                        ts: ts_to_rfc3339(event.ts),
                        colour,
                    });
                }
            }
        }
    }

    let mut report = make_stub_report(&input.path, input.bytes);
    report.capture_summary = Some(CaptureSummary {
        frames_total,
        frames_decoded,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.commands = build_command_summaries(command_stats);
    report.last_colour = colours.last().map(|reading| reading.colour.clone());
    report.colours = colours;
    report.violations = build_violations(violation_stats);
    Ok(report)
}

fn record_violation(
    stats: &mut BTreeMap<ViolationKind, ViolationStats>,
    kind: ViolationKind,
    index: u64,
    ts: Option<f64>,
    detail: &str,
) {
    let example = match ts_to_rfc3339(ts) {
        Some(ts) => format!("frame {index} @ {ts}: {detail}"),
        None => format!("frame {index}: {detail}"),
    };
    stats.entry(kind).or_default().add(example);
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    match first {
        None => *first = Some(ts),
        Some(existing) => {
            if ts < *existing {
                *first = Some(ts);
            }
        }
    }
    match last {
        None => *last = Some(ts),
        Some(existing) => {
            if ts > *existing {
                *last = Some(ts);
            }
        }
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
