use std::collections::BTreeMap;

use crate::Violation;
use crate::protocol::packet::DecodeError;

const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ViolationKind {
    InvalidHeader,
    Truncated,
    UnknownCommand,
    PayloadDecode,
    LengthMismatch,
}

impl ViolationKind {
    pub fn from_decode_error(err: &DecodeError) -> Self {
        match err {
            DecodeError::InvalidHeader { .. } => ViolationKind::InvalidHeader,
            DecodeError::Truncated { .. } => ViolationKind::Truncated,
            DecodeError::UnknownCommand(_) => ViolationKind::UnknownCommand,
            DecodeError::PayloadDecode { .. } => ViolationKind::PayloadDecode,
        }
    }

    fn id(self) -> &'static str {
        match self {
            ViolationKind::InvalidHeader => "SNAP-INVALID-HEADER",
            ViolationKind::Truncated => "SNAP-TRUNCATED",
            ViolationKind::UnknownCommand => "SNAP-UNKNOWN-COMMAND",
            ViolationKind::PayloadDecode => "SNAP-PAYLOAD-DECODE",
            ViolationKind::LengthMismatch => "SNAP-LENGTH-MISMATCH",
        }
    }

    // Unknown commands are expected when device firmware is newer than the
    // command table.
    fn severity(self) -> &'static str {
        match self {
            ViolationKind::InvalidHeader
            | ViolationKind::Truncated
            | ViolationKind::PayloadDecode => "error",
            ViolationKind::UnknownCommand | ViolationKind::LengthMismatch => "warning",
        }
    }

    fn message(self) -> &'static str {
        match self {
            ViolationKind::InvalidHeader => "Frame does not start with the 0x7E header marker",
            ViolationKind::Truncated => "Frame shorter than the packet header",
            ViolationKind::UnknownCommand => "Command identifier not in the command table",
            ViolationKind::PayloadDecode => "Response payload could not be decoded",
            ViolationKind::LengthMismatch => {
                "Response payload length differs from the expected response length"
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ViolationStats {
    pub count: u64,
    pub examples: Vec<String>,
}

impl ViolationStats {
    pub fn add(&mut self, example: String) {
        self.count += 1;
        if self.examples.len() < MAX_EXAMPLES {
            self.examples.push(example);
        }
    }
}

pub(crate) fn build_violations(stats: BTreeMap<ViolationKind, ViolationStats>) -> Vec<Violation> {
    let mut violations: Vec<Violation> = stats
        .into_iter()
        .map(|(kind, stats)| Violation {
            id: kind.id().to_string(),
            severity: kind.severity().to_string(),
            message: kind.message().to_string(),
            count: stats.count,
            examples: stats.examples,
        })
        .collect();
    violations.sort_by(|a, b| {
        severity_rank(&a.severity)
            .cmp(&severity_rank(&b.severity))
            .then_with(|| a.id.cmp(&b.id))
    });
    violations
}

fn severity_rank(severity: &str) -> u8 {
    match severity {
        "error" => 0,
        "warning" => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn examples_are_capped() {
        let mut stats = ViolationStats::default();
        for i in 0..5 {
            stats.add(format!("frame {i}"));
        }
        assert_eq!(stats.count, 5);
        assert_eq!(stats.examples.len(), MAX_EXAMPLES);
        assert_eq!(stats.examples[0], "frame 0");
    }

    #[test]
    fn errors_sort_before_warnings() {
        let mut stats = BTreeMap::new();
        stats
            .entry(ViolationKind::LengthMismatch)
            .or_insert_with(ViolationStats::default)
            .add("a".to_string());
        stats
            .entry(ViolationKind::Truncated)
            .or_insert_with(ViolationStats::default)
            .add("b".to_string());
        stats
            .entry(ViolationKind::UnknownCommand)
            .or_insert_with(ViolationStats::default)
            .add("c".to_string());
        let ids: Vec<_> = build_violations(stats).into_iter().map(|v| v.id).collect();
        assert_eq!(
            ids,
            vec![
                "SNAP-TRUNCATED".to_string(),
                "SNAP-LENGTH-MISMATCH".to_string(),
                "SNAP-UNKNOWN-COMMAND".to_string(),
            ]
        );
    }
}
