use std::sync::Arc;
use std::thread;

use snapshot_core::{
    Command, DecodeError, DecodeOutcome, DecodedValue, PayloadError, all_commands, decode, lookup,
};

fn colour_response(l: f32, a: f32, b: f32) -> Vec<u8> {
    let mut packet = vec![0x7E, 0x20, 64, 0];
    for value in [l, a, b] {
        packet.extend_from_slice(&value.to_be_bytes());
    }
    packet
}

fn hex_channels(hex: &str) -> [u8; 3] {
    assert_eq!(hex.len(), 7, "{hex}");
    assert!(hex.starts_with('#'), "{hex}");
    assert!(
        hex[1..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)),
        "{hex}"
    );
    let channel = |i: usize| u8::from_str_radix(&hex[1 + i * 2..3 + i * 2], 16).unwrap();
    [channel(0), channel(1), channel(2)]
}

#[test]
fn any_buffer_without_marker_is_invalid_header() {
    for first in (0u8..=255).filter(|b| *b != 0x7E) {
        for len in 1..8 {
            let mut buffer = vec![first; len];
            if len > 2 {
                buffer[2] = 2;
            }
            assert!(matches!(
                decode(&buffer),
                Err(DecodeError::InvalidHeader { found: Some(b) }) if b == first
            ));
        }
    }
}

#[test]
fn short_buffers_with_marker_are_truncated() {
    for len in 1..4 {
        let buffer = vec![0x7E; len];
        assert!(matches!(
            decode(&buffer),
            Err(DecodeError::Truncated { needed: 4, actual }) if actual == len
        ));
    }
}

#[test]
fn nonzero_error_code_wins_for_every_command() {
    for descriptor in all_commands() {
        for flags in [0x00, 0x20] {
            for code in [1u8, 5, 0xFF] {
                let buffer = [0x7E, flags, descriptor.identifier, code, 0xDE, 0xAD];
                assert_eq!(
                    decode(&buffer).unwrap(),
                    DecodeOutcome::DeviceError {
                        command: *descriptor,
                        code
                    }
                );
            }
        }
    }
}

#[test]
fn clear_response_bit_is_always_a_notification() {
    for descriptor in all_commands() {
        for flags in [0x00, 0x01, 0x10, 0x40, 0xDF] {
            let buffer = [0x7E, flags, descriptor.identifier, 0, 0x01];
            assert_eq!(
                decode(&buffer).unwrap(),
                DecodeOutcome::Notification(*descriptor)
            );
        }
    }
}

#[test]
fn unregistered_identifiers_are_unknown() {
    let known: Vec<u8> = all_commands().iter().map(|d| d.identifier).collect();
    for id in (0u8..=255).filter(|id| !known.contains(id)) {
        assert_eq!(
            decode(&[0x7E, 0x20, id, 0]),
            Err(DecodeError::UnknownCommand(id))
        );
    }
}

#[test]
fn scenario_saturated_red() {
    let outcome = decode(&colour_response(53.23, 80.11, 67.22)).unwrap();
    let DecodeOutcome::Response {
        command,
        value: DecodedValue::Colour(hex),
    } = outcome
    else {
        panic!("expected a colour response");
    };
    assert_eq!(command.command, Command::GetDataColour);
    let [r, g, b] = hex_channels(&hex);
    assert!(r >= 0xFC && g <= 0x03 && b <= 0x03, "{hex}");
}

#[test]
fn scenario_ping_notification() {
    let ping = lookup(2).unwrap();
    assert_eq!(
        decode(&[0x7E, 0x00, 2, 0]).unwrap(),
        DecodeOutcome::Notification(ping)
    );
}

#[test]
fn scenario_ping_device_error() {
    let ping = lookup(2).unwrap();
    assert_eq!(
        decode(&[0x7E, 0x20, 2, 5]).unwrap(),
        DecodeOutcome::DeviceError {
            command: ping,
            code: 5
        }
    );
}

#[test]
fn scenario_unknown_command() {
    assert_eq!(
        decode(&[0x7E, 0x20, 250, 0]),
        Err(DecodeError::UnknownCommand(250))
    );
}

#[test]
fn colour_payload_of_any_wrong_length_is_an_error() {
    for len in (0..32).filter(|len| *len != 12) {
        let mut buffer = vec![0x7E, 0x20, 64, 0];
        buffer.extend(std::iter::repeat_n(0x42, len));
        match decode(&buffer) {
            Err(DecodeError::PayloadDecode {
                command,
                source: PayloadError::LengthMismatch { expected, actual },
            }) => {
                assert_eq!(command.identifier, 64);
                assert_eq!(expected, 12);
                assert_eq!(actual, len);
            }
            other => panic!("unexpected {other:?} for len {len}"),
        }
    }
}

#[test]
fn colour_responses_always_format_as_hex() {
    let mut value = 0.0f32;
    for _ in 0..200 {
        value += 1.37;
        let l = value % 100.0;
        let a = (value * 3.1) % 256.0 - 128.0;
        let b = (value * 7.3) % 256.0 - 128.0;
        match decode(&colour_response(l, a, b)).unwrap() {
            DecodeOutcome::Response {
                value: DecodedValue::Colour(hex),
                ..
            } => {
                hex_channels(&hex);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn decode_is_safe_to_share_across_threads() {
    let packet = Arc::new(colour_response(87.74, -86.18, 83.18));
    let expected = decode(&packet).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let packet = Arc::clone(&packet);
            thread::spawn(move || decode(&packet).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
