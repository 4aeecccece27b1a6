use super::error::DecodeError;
use super::layout;

pub struct PacketReader<'a> {
    buffer: &'a [u8],
}

impl<'a> PacketReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.buffer.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                actual: self.buffer.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.buffer
            .get(offset)
            .copied()
            .ok_or(DecodeError::Truncated {
                needed: offset + 1,
                actual: self.buffer.len(),
            })
    }

    pub fn read_marker(&self) -> Option<u8> {
        self.buffer.get(layout::MARKER_OFFSET).copied()
    }

    pub fn payload(&self) -> &'a [u8] {
        self.buffer.get(layout::PAYLOAD_OFFSET..).unwrap_or(&[])
    }
}

/// Bounds-checked access to a command payload.
pub struct PayloadReader<'a> {
    payload: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn read_f32_be(&self, range: std::ops::Range<usize>) -> Option<f32> {
        let bytes: [u8; 4] = self.payload.get(range)?.try_into().ok()?;
        Some(f32::from_be_bytes(bytes))
    }
}
