use std::ops::Range;

// Root layer
pub const PREAMBLE_SIZE_RANGE: Range<usize> = 0..2;
pub const POSTAMBLE_SIZE_RANGE: Range<usize> = 2..4;
pub const ACN_PID_RANGE: Range<usize> = 4..16;
pub const ROOT_FLAGS_LENGTH_RANGE: Range<usize> = 16..18;
pub const ROOT_VECTOR_RANGE: Range<usize> = 18..22;
pub const CID_RANGE: Range<usize> = 22..38;

// Framing layer
pub const FRAMING_FLAGS_LENGTH_RANGE: Range<usize> = 38..40;
pub const FRAMING_VECTOR_RANGE: Range<usize> = 40..44;
pub const SOURCE_NAME_RANGE: Range<usize> = 44..108;
pub const PRIORITY_OFFSET: usize = 108;
pub const SYNC_ADDRESS_RANGE: Range<usize> = 109..111;
pub const SEQUENCE_OFFSET: usize = 111;
pub const OPTIONS_OFFSET: usize = 112;
pub const UNIVERSE_RANGE: Range<usize> = 113..115;

// DMP layer
pub const DMP_FLAGS_LENGTH_RANGE: Range<usize> = 115..117;
pub const DMP_VECTOR_OFFSET: usize = 117;
pub const ADDRESS_TYPE_OFFSET: usize = 118;
pub const FIRST_PROPERTY_ADDRESS_RANGE: Range<usize> = 119..121;
pub const ADDRESS_INCREMENT_RANGE: Range<usize> = 121..123;
pub const PROPERTY_VALUE_COUNT_RANGE: Range<usize> = 123..125;
pub const PROPERTY_VALUES_OFFSET: usize = 125;

/// Length of the fixed header; everything after it is property values.
pub const HEADER_LEN: usize = PROPERTY_VALUES_OFFSET;
/// Start code plus 512 DMX slots.
pub const MAX_PROPERTY_VALUES: usize = 513;
pub const MAX_PACKET_LEN: usize = HEADER_LEN + MAX_PROPERTY_VALUES;

pub const ACN_PID: &[u8; 12] = b"ASC-E1.17\0\0\0";
pub const PREAMBLE_SIZE: u16 = 0x0010;
pub const POSTAMBLE_SIZE: u16 = 0x0000;
pub const ROOT_VECTOR_DATA: u32 = 0x0000_0004;
pub const FRAMING_VECTOR_DMX: u32 = 0x0000_0002;
pub const DMP_VECTOR_SET_PROPERTY: u8 = 0x02;
pub const DMP_ADDRESS_TYPE: u8 = 0xa1;
pub const DMP_ADDRESS_INCREMENT: u16 = 0x0001;
pub const PDU_FLAGS: u16 = 0x7000;
pub const DEFAULT_PRIORITY: u8 = 100;
pub const DMX_NULL_START_CODE: u8 = 0x00;

/// Well-known sACN UDP port.
pub const DEFAULT_PORT: u16 = 5568;
