use super::error::E131Error;
use super::layout;
use super::packet::{DmpLayer, E131Packet, FramingLayer, RootLayer};
use super::reader::E131Reader;

/// Decodes a datagram into an [`E131Packet`].
///
/// Slicing is purely positional. Everything after the 125-byte header is
/// taken as property values, whatever the declared property value count says.
pub fn decode(payload: &[u8]) -> Result<E131Packet, E131Error> {
    let reader = E131Reader::new(payload);
    reader.require_len(layout::HEADER_LEN)?;

    let root = RootLayer {
        preamble_size: reader.read_array(layout::PREAMBLE_SIZE_RANGE)?,
        postamble_size: reader.read_array(layout::POSTAMBLE_SIZE_RANGE)?,
        packet_identifier: reader.read_array(layout::ACN_PID_RANGE)?,
        flags_length: reader.read_array(layout::ROOT_FLAGS_LENGTH_RANGE)?,
        vector: reader.read_array(layout::ROOT_VECTOR_RANGE)?,
        cid: reader.read_array(layout::CID_RANGE)?,
    };

    let frame = FramingLayer {
        flags_length: reader.read_array(layout::FRAMING_FLAGS_LENGTH_RANGE)?,
        vector: reader.read_array(layout::FRAMING_VECTOR_RANGE)?,
        source_name: reader.read_array(layout::SOURCE_NAME_RANGE)?,
        priority: reader.read_u8(layout::PRIORITY_OFFSET)?,
        sync_address: reader.read_array(layout::SYNC_ADDRESS_RANGE)?,
        sequence_number: reader.read_u8(layout::SEQUENCE_OFFSET)?,
        options: reader.read_u8(layout::OPTIONS_OFFSET)?,
        universe: reader.read_array(layout::UNIVERSE_RANGE)?,
    };

    let dmp = DmpLayer {
        flags_length: reader.read_array(layout::DMP_FLAGS_LENGTH_RANGE)?,
        vector: reader.read_u8(layout::DMP_VECTOR_OFFSET)?,
        address_type: reader.read_u8(layout::ADDRESS_TYPE_OFFSET)?,
        first_property_address: reader.read_array(layout::FIRST_PROPERTY_ADDRESS_RANGE)?,
        address_increment: reader.read_array(layout::ADDRESS_INCREMENT_RANGE)?,
        property_value_count: reader.read_array(layout::PROPERTY_VALUE_COUNT_RANGE)?,
        property_values: reader.read_tail(layout::PROPERTY_VALUES_OFFSET)?.to_vec(),
    };

    Ok(E131Packet { root, frame, dmp })
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::protocols::e131::error::E131Error;
    use crate::protocols::e131::layout;

    #[test]
    fn rejects_every_short_length() {
        for len in 0..layout::HEADER_LEN {
            let err = decode(&vec![0u8; len]).unwrap_err();
            assert_eq!(
                err,
                E131Error::InvalidPacketSize {
                    needed: layout::HEADER_LEN,
                    actual: len,
                }
            );
        }
    }

    #[test]
    fn header_only_has_no_property_values() {
        let packet = decode(&[0u8; layout::HEADER_LEN]).unwrap();
        assert!(packet.dmp.property_values.is_empty());
        assert_eq!(packet.start_code(), None);
    }

    #[test]
    fn fields_are_sliced_at_fixed_offsets() {
        let mut payload: Vec<u8> = (0..=255u8).cycle().take(200).collect();
        payload[layout::UNIVERSE_RANGE].copy_from_slice(&[0x00, 0x02]);

        let packet = decode(&payload).unwrap();
        assert_eq!(packet.root.preamble_size, [0, 1]);
        assert_eq!(packet.root.cid[0], 22);
        assert_eq!(packet.frame.source_name[0], 44);
        assert_eq!(packet.frame.priority, 108);
        assert_eq!(packet.frame.sequence_number, 111);
        assert_eq!(packet.frame.options, 112);
        assert_eq!(packet.universe(), 2);
        assert_eq!(packet.dmp.vector, 117);
        assert_eq!(packet.dmp.address_type, 118);
        assert_eq!(packet.dmp.property_value_count, [123, 124]);
        assert_eq!(packet.dmp.property_values.len(), 75);
        assert_eq!(packet.dmp.property_values[0], 125);
    }

    #[test]
    fn declared_count_is_not_enforced() {
        let mut payload = vec![0u8; layout::HEADER_LEN + 4];
        payload[layout::PROPERTY_VALUE_COUNT_RANGE].copy_from_slice(&513u16.to_be_bytes());

        let packet = decode(&payload).unwrap();
        assert_eq!(packet.property_value_count(), 513);
        assert_eq!(packet.dmp.property_values.len(), 4);
    }

    #[test]
    fn trailing_bytes_beyond_a_full_universe_are_kept() {
        let payload = vec![1u8; 1024];
        let packet = decode(&payload).unwrap();
        assert_eq!(packet.dmp.property_values.len(), 1024 - layout::HEADER_LEN);
    }
}
