pub const COMMENT_PREFIX: char = '#';
pub const TIMESTAMP_SEPARATOR: char = ',';
pub const HEX_PREFIX: &str = "0x";
pub const READ_BUFFER_SIZE: usize = 64 * 1024;
