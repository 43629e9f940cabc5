use std::ops::Range;

use super::error::E131Error;

pub struct E131Reader<'a> {
    payload: &'a [u8],
}

impl<'a> E131Reader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), E131Error> {
        if self.payload.len() < needed {
            return Err(E131Error::InvalidPacketSize {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, E131Error> {
        self.payload
            .get(offset)
            .copied()
            .ok_or_else(|| E131Error::too_short(self.payload.len()))
    }

    /// Copies a fixed-width field out of the buffer, keeping wire byte order.
    pub fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], E131Error> {
        let bytes = self.read_slice(range)?;
        bytes
            .try_into()
            .map_err(|_| E131Error::too_short(self.payload.len()))
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], E131Error> {
        self.payload
            .get(range)
            .ok_or_else(|| E131Error::too_short(self.payload.len()))
    }

    pub fn read_tail(&self, offset: usize) -> Result<&'a [u8], E131Error> {
        self.payload
            .get(offset..)
            .ok_or_else(|| E131Error::too_short(self.payload.len()))
    }
}

pub(crate) fn be_u16(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

pub(crate) fn be_u32(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

pub(crate) fn ascii_field(bytes: &[u8]) -> Option<String> {
    let raw = String::from_utf8_lossy(bytes);
    let trimmed = raw.trim_end_matches('\0').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn hex_field(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::{E131Reader, ascii_field, hex_field};
    use crate::protocols::e131::error::E131Error;

    #[test]
    fn read_array_keeps_wire_order() {
        let data = [0x12, 0x34, 0x56];
        let reader = E131Reader::new(&data);
        let bytes: [u8; 2] = reader.read_array(1..3).unwrap();
        assert_eq!(bytes, [0x34, 0x56]);
    }

    #[test]
    fn read_past_end_reports_actual_length() {
        let data = [0u8; 4];
        let reader = E131Reader::new(&data);
        let err = reader.read_u8(4).unwrap_err();
        assert!(matches!(err, E131Error::InvalidPacketSize { actual: 4, .. }));
    }

    #[test]
    fn read_tail_at_end_is_empty() {
        let data = [1u8, 2, 3];
        let reader = E131Reader::new(&data);
        assert!(reader.read_tail(3).unwrap().is_empty());
        assert!(reader.read_tail(4).is_err());
    }

    #[test]
    fn ascii_field_trims_padding() {
        let mut name = [0u8; 8];
        name[..4].copy_from_slice(b"desk");
        assert_eq!(ascii_field(&name), Some("desk".to_string()));
        assert_eq!(ascii_field(&[0u8; 8]), None);
    }

    #[test]
    fn hex_field_is_lowercase() {
        assert_eq!(hex_field(&[0xde, 0xad, 0x01]), "dead01");
    }
}
