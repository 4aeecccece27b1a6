mod hex;

pub use hex::HexFileSource;
pub use hex::error::HexLineError;
pub use hex::reader::parse_hex_frame;

use thiserror::Error;

/// One buffer as delivered by the transport.
#[derive(Debug, Clone)]
pub struct FrameEvent {
    /// Capture time in seconds since the Unix epoch, when recorded.
    pub ts: Option<f64>,
    pub data: Vec<u8>,
}

/// A producer of raw device buffers.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl From<hex::error::HexSourceError> for SourceError {
    fn from(value: hex::error::HexSourceError) -> Self {
        match value {
            hex::error::HexSourceError::Io(err) => SourceError::Io(err),
            hex::error::HexSourceError::Line { line, source } => SourceError::Parse {
                line,
                message: source.to_string(),
            },
        }
    }
}

/// In-memory source, useful when buffers arrive from somewhere other than a
/// capture file.
///
/// # Examples
/// ```
/// use snapshot_core::{FrameEvent, FrameSource, VecFrameSource};
///
/// let mut source = VecFrameSource::new(vec![FrameEvent { ts: None, data: vec![0x7E] }]);
/// assert!(source.next_frame().unwrap().is_some());
/// assert!(source.next_frame().unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct VecFrameSource {
    frames: std::collections::VecDeque<FrameEvent>,
}

impl VecFrameSource {
    pub fn new(frames: Vec<FrameEvent>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FrameSource for VecFrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError> {
        Ok(self.frames.pop_front())
    }
}
