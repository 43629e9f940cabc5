use lumenbridge_core::protocols::e131::{E131Error, E131Packet, decode, encode, layout};

fn sample_packets() -> Vec<E131Packet> {
    let full: Vec<u8> = (0..layout::MAX_PROPERTY_VALUES).map(|i| i as u8).collect();
    vec![
        E131Packet::data_packet(1, "console", [1u8; 16], 0, &[]),
        E131Packet::data_packet(1, "console", [1u8; 16], 1, &[0]),
        E131Packet::data_packet(63999, "", [0xff; 16], 255, &[0, 255, 128, 64]),
        E131Packet::data_packet(7, "full universe", [3u8; 16], 42, &full),
    ]
}

#[test]
fn decode_of_encode_reproduces_the_packet() {
    for packet in sample_packets() {
        let bytes = encode(&packet);
        assert_eq!(bytes.len(), layout::HEADER_LEN + packet.dmp.property_values.len());
        assert_eq!(decode(&bytes).unwrap(), packet);
    }
}

#[test]
fn short_buffers_are_invalid() {
    for len in [0, 1, 38, 115, 124] {
        let err = decode(&vec![0xaa; len]).unwrap_err();
        assert_eq!(
            err,
            E131Error::InvalidPacketSize {
                needed: layout::HEADER_LEN,
                actual: len
            }
        );
    }
}

#[test]
fn full_universe_packet_has_the_maximum_size() {
    let packets = sample_packets();
    let full = packets.last().unwrap();
    assert_eq!(encode(full).len(), layout::MAX_PACKET_LEN);
    assert_eq!(full.property_value_count(), 513);
    assert_eq!(full.channels().len(), 512);
}

#[test]
fn universe_is_big_endian_on_the_wire() {
    let bytes = encode(&E131Packet::data_packet(0x0102, "x", [0u8; 16], 0, &[0]));
    assert_eq!(&bytes[layout::UNIVERSE_RANGE], &[0x01, 0x02]);
    assert_eq!(decode(&bytes).unwrap().universe(), 258);
}
