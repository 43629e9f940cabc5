use super::layout;
use super::reader::{ascii_field, be_u16, be_u32, hex_field};

/// Decoded E1.31 packet.
///
/// Multi-byte fields keep their big-endian wire representation; accessors
/// such as [`E131Packet::universe`] interpret them on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct E131Packet {
    pub root: RootLayer,
    pub frame: FramingLayer,
    pub dmp: DmpLayer,
}

/// ACN root layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLayer {
    pub preamble_size: [u8; 2],
    pub postamble_size: [u8; 2],
    pub packet_identifier: [u8; 12],
    pub flags_length: [u8; 2],
    pub vector: [u8; 4],
    pub cid: [u8; 16],
}

/// E1.31 framing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramingLayer {
    pub flags_length: [u8; 2],
    pub vector: [u8; 4],
    pub source_name: [u8; 64],
    pub priority: u8,
    pub sync_address: [u8; 2],
    pub sequence_number: u8,
    pub options: u8,
    pub universe: [u8; 2],
}

/// DMP layer carrying the DMX payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmpLayer {
    pub flags_length: [u8; 2],
    pub vector: u8,
    pub address_type: u8,
    pub first_property_address: [u8; 2],
    pub address_increment: [u8; 2],
    pub property_value_count: [u8; 2],
    /// Start code at index 0, channel values after it.
    pub property_values: Vec<u8>,
}

impl E131Packet {
    /// Builds a well-formed E1.31 data packet.
    ///
    /// `property_values` includes the start code and is capped at 513 bytes.
    /// Flags/length fields are computed from the resulting size.
    ///
    /// # Examples
    /// ```
    /// use lumenbridge_core::protocols::e131::{E131Packet, decode, encode};
    ///
    /// let packet = E131Packet::data_packet(1, "desk", [7u8; 16], 1, &[0, 255, 128, 64]);
    /// assert_eq!(packet.universe(), 1);
    /// assert!(packet.is_data_packet());
    /// assert_eq!(decode(&encode(&packet)).unwrap(), packet);
    /// ```
    pub fn data_packet(
        universe: u16,
        source_name: &str,
        cid: [u8; 16],
        sequence_number: u8,
        property_values: &[u8],
    ) -> Self {
        let values_len = property_values.len().min(layout::MAX_PROPERTY_VALUES);
        let property_values = property_values[..values_len].to_vec();
        let total_len = layout::HEADER_LEN + values_len;

        let mut name = [0u8; 64];
        // Keep at least one trailing NUL.
        let name_len = source_name.len().min(name.len() - 1);
        name[..name_len].copy_from_slice(&source_name.as_bytes()[..name_len]);

        Self {
            root: RootLayer {
                preamble_size: layout::PREAMBLE_SIZE.to_be_bytes(),
                postamble_size: layout::POSTAMBLE_SIZE.to_be_bytes(),
                packet_identifier: *layout::ACN_PID,
                flags_length: flags_length(total_len - layout::ROOT_FLAGS_LENGTH_RANGE.start),
                vector: layout::ROOT_VECTOR_DATA.to_be_bytes(),
                cid,
            },
            frame: FramingLayer {
                flags_length: flags_length(total_len - layout::FRAMING_FLAGS_LENGTH_RANGE.start),
                vector: layout::FRAMING_VECTOR_DMX.to_be_bytes(),
                source_name: name,
                priority: layout::DEFAULT_PRIORITY,
                sync_address: [0, 0],
                sequence_number,
                options: 0,
                universe: universe.to_be_bytes(),
            },
            dmp: DmpLayer {
                flags_length: flags_length(total_len - layout::DMP_FLAGS_LENGTH_RANGE.start),
                vector: layout::DMP_VECTOR_SET_PROPERTY,
                address_type: layout::DMP_ADDRESS_TYPE,
                first_property_address: [0, 0],
                address_increment: layout::DMP_ADDRESS_INCREMENT.to_be_bytes(),
                property_value_count: (values_len as u16).to_be_bytes(),
                property_values,
            },
        }
    }

    pub fn universe(&self) -> u16 {
        be_u16(self.frame.universe)
    }

    pub fn sync_address(&self) -> u16 {
        be_u16(self.frame.sync_address)
    }

    /// Declared count; not checked against `property_values.len()`.
    pub fn property_value_count(&self) -> u16 {
        be_u16(self.dmp.property_value_count)
    }

    pub fn source_name(&self) -> Option<String> {
        ascii_field(&self.frame.source_name)
    }

    pub fn cid_hex(&self) -> String {
        hex_field(&self.root.cid)
    }

    pub fn start_code(&self) -> Option<u8> {
        self.dmp.property_values.first().copied()
    }

    /// DMX slot values following the start code.
    pub fn channels(&self) -> &[u8] {
        self.dmp.property_values.get(1..).unwrap_or(&[])
    }

    /// Whether the identifier and vectors match an E1.31 data packet.
    pub fn is_data_packet(&self) -> bool {
        be_u16(self.root.preamble_size) == layout::PREAMBLE_SIZE
            && be_u16(self.root.postamble_size) == layout::POSTAMBLE_SIZE
            && &self.root.packet_identifier == layout::ACN_PID
            && be_u32(self.root.vector) == layout::ROOT_VECTOR_DATA
            && be_u32(self.frame.vector) == layout::FRAMING_VECTOR_DMX
            && self.dmp.vector == layout::DMP_VECTOR_SET_PROPERTY
    }
}

fn flags_length(pdu_len: usize) -> [u8; 2] {
    (layout::PDU_FLAGS | (pdu_len as u16 & 0x0fff)).to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::E131Packet;
    use crate::protocols::e131::layout;

    #[test]
    fn data_packet_lengths_cover_each_layer() {
        let packet = E131Packet::data_packet(7, "console", [0u8; 16], 3, &[0u8; 513]);
        assert_eq!(packet.root.flags_length, [0x72, 0x6e]);
        assert_eq!(packet.frame.flags_length, [0x72, 0x58]);
        assert_eq!(packet.dmp.flags_length, [0x72, 0x0b]);
        assert_eq!(packet.property_value_count(), 513);
    }

    #[test]
    fn data_packet_caps_property_values() {
        let packet = E131Packet::data_packet(1, "", [0u8; 16], 0, &[1u8; 600]);
        assert_eq!(packet.dmp.property_values.len(), layout::MAX_PROPERTY_VALUES);
        assert_eq!(packet.channels().len(), 512);
    }

    #[test]
    fn long_source_name_keeps_terminator() {
        let name = "x".repeat(100);
        let packet = E131Packet::data_packet(1, &name, [0u8; 16], 0, &[0]);
        assert_eq!(packet.frame.source_name[63], 0);
        assert_eq!(packet.source_name().map(|n| n.len()), Some(63));
    }

    #[test]
    fn accessors_interpret_big_endian() {
        let mut packet = E131Packet::data_packet(0x0102, "a", [0xab; 16], 0, &[0, 9]);
        packet.frame.sync_address = [0x12, 0x34];
        assert_eq!(packet.universe(), 0x0102);
        assert_eq!(packet.sync_address(), 0x1234);
        assert_eq!(packet.start_code(), Some(0));
        assert_eq!(packet.channels(), &[9]);
        assert_eq!(packet.cid_hex(), "ab".repeat(16));
    }

    #[test]
    fn zeroed_packet_is_not_a_data_packet() {
        let mut packet = E131Packet::data_packet(1, "a", [0u8; 16], 0, &[0]);
        packet.root.packet_identifier = [0u8; 12];
        assert!(!packet.is_data_packet());
    }
}
