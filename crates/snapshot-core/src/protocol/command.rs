//! Command registry.
//!
//! The device exposes a fixed command set. Each command is identified on the
//! wire by a single byte and carries the payload size the device is expected
//! to answer with. The table is static and identifiers are unique, so lookup
//! goes through a 256-slot index built at compile time.

use serde::Serialize;

/// Closed set of commands known to this decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    PowerOff,
    Reset,
    Ping,
    SetCalibration,
    GetCalibration,
    GetCalibrationTemperature,
    DoCalibration,
    GetStorageCapacity,
    GetNumberStoredSamples,
    GetStoredSampleN,
    ClearAllStoredSamples,
    GetDataColour,
    GetDataTemperature,
    GetDataLightC,
    GetDataLightR,
    GetDataLightG,
    GetDataLightB,
    GetDataBrightness,
    GetDataLightCrgb,
    GetDataRed,
    GetDataGreen,
    GetDataBlue,
    SetIdleTimer,
    GetIdleTimer,
    SetCalibrationStatus,
    GetCalibrationStatus,
}

/// Static description of one command: wire identifier, symbolic tag and the
/// advisory response payload length.
///
/// # Examples
/// ```
/// use snapshot_core::{Command, lookup};
///
/// let colour = lookup(64).unwrap();
/// assert_eq!(colour.command, Command::GetDataColour);
/// assert_eq!(colour.name, "CMD_GET_DATA_COLOUR");
/// assert_eq!(colour.expected_response_len, 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub identifier: u8,
    pub name: &'static str,
    pub expected_response_len: u8,
    #[serde(skip)]
    pub command: Command,
}

impl CommandDescriptor {
    const fn new(
        identifier: u8,
        name: &'static str,
        expected_response_len: u8,
        command: Command,
    ) -> Self {
        Self {
            identifier,
            name,
            expected_response_len,
            command,
        }
    }

    /// Advisory check of a payload length against the table entry.
    ///
    /// The packet decoder never calls this; callers that want to flag
    /// oversized or short payloads do.
    pub fn accepts_payload_len(&self, len: usize) -> bool {
        len == self.expected_response_len as usize
    }
}

impl std::fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.identifier)
    }
}

const COMMANDS: [CommandDescriptor; 26] = [
    CommandDescriptor::new(0, "CMD_POWER_OFF", 0, Command::PowerOff),
    CommandDescriptor::new(1, "CMD_RESET", 0, Command::Reset),
    CommandDescriptor::new(2, "CMD_PING", 0, Command::Ping),
    CommandDescriptor::new(3, "CMD_SET_CALIBRATION", 5, Command::SetCalibration),
    CommandDescriptor::new(4, "CMD_GET_CALIBRATION", 5, Command::GetCalibration),
    CommandDescriptor::new(
        5,
        "CMD_GET_CALIBRATION_TEMPERATURE",
        5,
        Command::GetCalibrationTemperature,
    ),
    CommandDescriptor::new(7, "CMD_DO_CALIBRATION", 1, Command::DoCalibration),
    CommandDescriptor::new(32, "CMD_GET_STORAGE_CAPACITY", 1, Command::GetStorageCapacity),
    CommandDescriptor::new(
        33,
        "CMD_GET_NUMBER_STORED_SAMPLES",
        1,
        Command::GetNumberStoredSamples,
    ),
    CommandDescriptor::new(34, "CMD_GET_STORED_SAMPLE_N", 13, Command::GetStoredSampleN),
    CommandDescriptor::new(
        35,
        "CMD_CLEAR_ALL_STORED_SAMPLES",
        0,
        Command::ClearAllStoredSamples,
    ),
    CommandDescriptor::new(64, "CMD_GET_DATA_COLOUR", 12, Command::GetDataColour),
    CommandDescriptor::new(65, "CMD_GET_DATA_TEMPERATURE", 4, Command::GetDataTemperature),
    CommandDescriptor::new(66, "CMD_GET_DATA_LIGHT_C", 2, Command::GetDataLightC),
    CommandDescriptor::new(67, "CMD_GET_DATA_LIGHT_R", 2, Command::GetDataLightR),
    CommandDescriptor::new(68, "CMD_GET_DATA_LIGHT_G", 2, Command::GetDataLightG),
    CommandDescriptor::new(69, "CMD_GET_DATA_LIGHT_B", 2, Command::GetDataLightB),
    CommandDescriptor::new(70, "CMD_GET_DATA_BRIGHTNESS", 4, Command::GetDataBrightness),
    CommandDescriptor::new(71, "CMD_GET_DATA_LIGHT_CRGB", 8, Command::GetDataLightCrgb),
    CommandDescriptor::new(72, "CMD_GET_DATA_RED", 8, Command::GetDataRed),
    CommandDescriptor::new(73, "CMD_GET_DATA_GREEN", 8, Command::GetDataGreen),
    CommandDescriptor::new(74, "CMD_GET_DATA_BLUE", 8, Command::GetDataBlue),
    CommandDescriptor::new(80, "CMD_SET_IDLE_TIMER", 2, Command::SetIdleTimer),
    CommandDescriptor::new(81, "CMD_GET_IDLE_TIMER", 2, Command::GetIdleTimer),
    CommandDescriptor::new(
        88,
        "CMD_SET_CALIBRATION_STATUS",
        1,
        Command::SetCalibrationStatus,
    ),
    CommandDescriptor::new(
        89,
        "CMD_GET_CALIBRATION_STATUS",
        1,
        Command::GetCalibrationStatus,
    ),
];

const NO_ENTRY: u8 = u8::MAX;

// Maps a wire identifier to its position in `COMMANDS`. Fails to compile if
// two entries share an identifier.
const INDEX: [u8; 256] = build_index();

const fn build_index() -> [u8; 256] {
    let mut index = [NO_ENTRY; 256];
    let mut i = 0;
    while i < COMMANDS.len() {
        let id = COMMANDS[i].identifier as usize;
        assert!(index[id] == NO_ENTRY, "duplicate command identifier");
        index[id] = i as u8;
        i += 1;
    }
    index
}

/// Resolve a wire identifier. Unknown identifiers yield `None`.
pub fn lookup(identifier: u8) -> Option<CommandDescriptor> {
    match INDEX[identifier as usize] {
        NO_ENTRY => None,
        slot => COMMANDS.get(slot as usize).copied(),
    }
}

/// Resolve a symbolic tag such as `CMD_PING`. Matching ignores ASCII case and
/// accepts the tag without its `CMD_` prefix.
pub fn lookup_name(name: &str) -> Option<CommandDescriptor> {
    let wanted = name.trim();
    COMMANDS.iter().copied().find(|descriptor| {
        descriptor.name.eq_ignore_ascii_case(wanted)
            || descriptor
                .name
                .strip_prefix("CMD_")
                .is_some_and(|short| short.eq_ignore_ascii_case(wanted))
    })
}

/// Every known command, in identifier order.
pub fn all() -> &'static [CommandDescriptor] {
    &COMMANDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_identifiers() {
        let ping = lookup(2).unwrap();
        assert_eq!(ping.command, Command::Ping);
        assert_eq!(ping.name, "CMD_PING");
        assert_eq!(ping.expected_response_len, 0);

        let sample = lookup(34).unwrap();
        assert_eq!(sample.command, Command::GetStoredSampleN);
        assert_eq!(sample.expected_response_len, 13);
    }

    #[test]
    fn lookup_unknown_identifiers() {
        assert!(lookup(6).is_none());
        assert!(lookup(250).is_none());
        assert!(lookup(u8::MAX).is_none());
    }

    #[test]
    fn every_entry_resolves_to_itself() {
        for descriptor in all() {
            assert_eq!(lookup(descriptor.identifier), Some(*descriptor));
        }
    }

    #[test]
    fn table_is_sorted_by_identifier() {
        assert!(
            all()
                .windows(2)
                .all(|pair| pair[0].identifier < pair[1].identifier)
        );
    }

    #[test]
    fn lookup_name_accepts_short_and_full_tags() {
        assert_eq!(lookup_name("CMD_PING").map(|d| d.identifier), Some(2));
        assert_eq!(
            lookup_name("get_data_colour").map(|d| d.identifier),
            Some(64)
        );
        assert!(lookup_name("CMD_MISSING").is_none());
    }

    #[test]
    fn accepts_payload_len_matches_table() {
        let colour = lookup(64).unwrap();
        assert!(colour.accepts_payload_len(12));
        assert!(!colour.accepts_payload_len(11));
        assert!(lookup(0).unwrap().accepts_payload_len(0));
    }
}
