use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::source::{FrameEvent, FrameSource, SourceError};

use super::error::HexSourceError;
use super::layout;
use super::reader::parse_line;

/// `FrameSource` backed by a hex capture file.
pub struct HexFileSource {
    reader: BufReader<File>,
    line: usize,
    buf: String,
}

impl HexFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        Ok(Self {
            reader: BufReader::with_capacity(layout::READ_BUFFER_SIZE, file),
            line: 0,
            buf: String::new(),
        })
    }

    fn next_event(&mut self) -> Result<Option<FrameEvent>, HexSourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let parsed = parse_line(&self.buf).map_err(|source| HexSourceError::Line {
                line: self.line,
                source,
            })?;
            if let Some(parsed) = parsed {
                return Ok(Some(FrameEvent {
                    ts: parsed.ts,
                    data: parsed.data,
                }));
            }
        }
    }
}

impl FrameSource for HexFileSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError> {
        self.next_event().map_err(SourceError::from)
    }
}
