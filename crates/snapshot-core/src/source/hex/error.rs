use thiserror::Error;

#[derive(Debug, Error)]
pub enum HexSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: HexLineError,
    },
}

/// Errors for a single capture line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexLineError {
    #[error("odd number of hex digits: {digits}")]
    OddLength { digits: usize },
    #[error("invalid hex digit '{found}' at position {position}")]
    InvalidDigit { found: char, position: usize },
    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },
}
