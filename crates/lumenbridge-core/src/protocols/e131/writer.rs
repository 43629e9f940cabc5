use super::packet::E131Packet;

/// Serializes a packet back to its wire form.
///
/// Fields are written in declared order; the fixed-width arrays guarantee
/// the 125-byte header layout, so this cannot fail.
pub fn encode(packet: &E131Packet) -> Vec<u8> {
    let E131Packet { root, frame, dmp } = packet;
    let fields: [&[u8]; 21] = [
        &root.preamble_size,
        &root.postamble_size,
        &root.packet_identifier,
        &root.flags_length,
        &root.vector,
        &root.cid,
        &frame.flags_length,
        &frame.vector,
        &frame.source_name,
        &[frame.priority],
        &frame.sync_address,
        &[frame.sequence_number],
        &[frame.options],
        &frame.universe,
        &dmp.flags_length,
        &[dmp.vector],
        &[dmp.address_type],
        &dmp.first_property_address,
        &dmp.address_increment,
        &dmp.property_value_count,
        &dmp.property_values,
    ];

    let total: usize = fields.iter().map(|field| field.len()).sum();
    let mut out = Vec::with_capacity(total);
    for field in fields {
        out.extend_from_slice(field);
    }
    out
}
