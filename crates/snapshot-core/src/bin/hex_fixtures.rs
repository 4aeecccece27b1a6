use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER_MARKER: u8 = 0x7E;
const FLAG_RESPONSE: u8 = 0x20;
const FLAG_NOTIFICATION: u8 = 0x00;

const CMD_PING: u8 = 2;
const CMD_GET_DATA_COLOUR: u8 = 64;
const CMD_GET_DATA_TEMPERATURE: u8 = 65;
const CMD_GET_IDLE_TIMER: u8 = 81;
const CMD_UNKNOWN: u8 = 250;

const START_TS: f64 = 1_700_000_000.0;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_capture(&root.join("colour_session").join("input.hex"), &colour_session())?;
    write_capture(&root.join("malformed").join("input.hex"), &malformed())?;
    Ok(())
}

fn colour_session() -> Vec<Vec<u8>> {
    vec![
        packet(FLAG_NOTIFICATION, CMD_PING, 0, &[]),
        packet(FLAG_RESPONSE, CMD_PING, 0, &[]),
        colour(53.23, 80.11, 67.22),
        colour(87.74, -86.18, 83.18),
        colour(32.30, 79.19, -107.86),
        packet(FLAG_RESPONSE, CMD_GET_DATA_TEMPERATURE, 0, &23.5f32.to_be_bytes()),
        packet(FLAG_RESPONSE, CMD_GET_DATA_COLOUR, 3, &[]),
        packet(FLAG_RESPONSE, CMD_GET_IDLE_TIMER, 0, &300u16.to_be_bytes()),
        colour(53.39, 0.0, 0.0),
    ]
}

fn malformed() -> Vec<Vec<u8>> {
    vec![
        vec![0x00, FLAG_RESPONSE, CMD_PING, 0],
        vec![HEADER_MARKER, FLAG_RESPONSE],
        packet(FLAG_RESPONSE, CMD_UNKNOWN, 0, &[]),
        packet(FLAG_RESPONSE, CMD_GET_DATA_COLOUR, 0, &[0x42, 0x54]),
        colour(f32::NAN, 0.0, 0.0),
        packet(FLAG_RESPONSE, CMD_GET_DATA_TEMPERATURE, 0, &[0x41, 0xBC]),
        packet(FLAG_NOTIFICATION, CMD_PING, 0, &[]),
    ]
}

fn colour(l: f32, a: f32, b: f32) -> Vec<u8> {
    let mut payload = Vec::with_capacity(12);
    for value in [l, a, b] {
        payload.extend_from_slice(&value.to_be_bytes());
    }
    packet(FLAG_RESPONSE, CMD_GET_DATA_COLOUR, 0, &payload)
}

fn packet(flags: u8, command: u8, error_code: u8, payload: &[u8]) -> Vec<u8> {
    let mut packet = vec![HEADER_MARKER, flags, command, error_code];
    packet.extend_from_slice(payload);
    packet
}

fn write_capture(path: &Path, frames: &[Vec<u8>]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }

    let mut text = String::new();
    for (idx, frame) in frames.iter().enumerate() {
        let ts = START_TS + idx as f64;
        let _ = write!(text, "{ts:.3},");
        for byte in frame {
            let _ = write!(text, " {byte:02X}");
        }
        text.push('\n');
    }

    fs::write(path, text).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
