pub const HEADER_MARKER: u8 = 0x7E;

pub const MARKER_OFFSET: usize = 0;
pub const FLAGS_OFFSET: usize = 1;
pub const COMMAND_OFFSET: usize = 2;
pub const ERROR_CODE_OFFSET: usize = 3;
pub const PAYLOAD_OFFSET: usize = 4;

pub const HEADER_LEN: usize = PAYLOAD_OFFSET;

pub const FLAG_RESPONSE: u8 = 0b0010_0000;
pub const ERROR_CODE_OK: u8 = 0;

pub const COLOUR_L_RANGE: std::ops::Range<usize> = 0..4;
pub const COLOUR_A_RANGE: std::ops::Range<usize> = 4..8;
pub const COLOUR_B_RANGE: std::ops::Range<usize> = 8..12;
pub const COLOUR_PAYLOAD_LEN: usize = 12;
