use super::error::HexLineError;
use super::layout;

/// A capture line split into its optional timestamp and frame bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct HexLine {
    pub ts: Option<f64>,
    pub data: Vec<u8>,
}

/// Parse one capture line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<HexLine>, HexLineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(layout::COMMENT_PREFIX) {
        return Ok(None);
    }

    let (ts, frame) = match line.split_once(layout::TIMESTAMP_SEPARATOR) {
        Some((ts, frame)) => (Some(parse_timestamp(ts)?), frame),
        None => (None, line),
    };
    let data = parse_hex_frame(frame)?;
    Ok(Some(HexLine { ts, data }))
}

/// Parse a hex string into bytes. Whitespace between digits and a leading
/// `0x` are accepted.
///
/// # Examples
/// ```
/// use snapshot_core::parse_hex_frame;
///
/// assert_eq!(parse_hex_frame("7E 20 02 00").unwrap(), vec![0x7E, 0x20, 0x02, 0x00]);
/// assert_eq!(parse_hex_frame("0x7e200200").unwrap(), vec![0x7E, 0x20, 0x02, 0x00]);
/// assert!(parse_hex_frame("7E2").is_err());
/// ```
///
/// # Errors
/// Returns `HexLineError` for odd digit counts or non-hex characters.
pub fn parse_hex_frame(text: &str) -> Result<Vec<u8>, HexLineError> {
    let text = text.trim();
    let text = text
        .strip_prefix(layout::HEX_PREFIX)
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    let mut digits = Vec::with_capacity(text.len());
    for (position, found) in text.char_indices() {
        if found.is_whitespace() {
            continue;
        }
        let value = found
            .to_digit(16)
            .ok_or(HexLineError::InvalidDigit { found, position })?;
        digits.push(value as u8);
    }
    if digits.len() % 2 != 0 {
        return Err(HexLineError::OddLength {
            digits: digits.len(),
        });
    }

    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

fn parse_timestamp(value: &str) -> Result<f64, HexLineError> {
    let value = value.trim();
    value
        .parse::<f64>()
        .ok()
        .filter(|ts| ts.is_finite() && *ts >= 0.0)
        .ok_or_else(|| HexLineError::InvalidTimestamp {
            value: value.to_string(),
        })
}
