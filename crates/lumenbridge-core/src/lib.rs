//! lumenbridge core: E1.31 (sACN) codec and color dispatch pipeline.
//!
//! A [`source::DatagramSource`] feeds raw datagrams to the
//! [`dispatch::Ingestor`], which decodes them with [`protocols::e131`],
//! keeps only the monitored universe, drops payloads identical to the
//! previous one and turns the rest into one [`dispatch::ColorUpdate`] per
//! output target. Updates go through a bounded queue to output workers that
//! call the target's [`dispatch::ColorActuator`].
//!
//! Invariants:
//! - Enqueueing never blocks; a full queue drops the update.
//! - Per-target updates are applied in the order they were produced.
//! - Decoding is positional and side-effect free.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//!
//! use lumenbridge_core::dispatch::mock::RecordingActuator;
//! use lumenbridge_core::dispatch::{ChannelMap, Ingestor, OutputTarget, Rgb, update_queue};
//! use lumenbridge_core::protocols::e131::{E131Packet, encode};
//!
//! let actuator = Arc::new(RecordingActuator::new());
//! let target = Arc::new(OutputTarget::new("A", ChannelMap::new(1, 2, 3), actuator));
//! let (tx, rx) = update_queue(16);
//! let mut ingestor = Ingestor::new(1, vec![target], tx);
//!
//! let packet = E131Packet::data_packet(1, "desk", [0u8; 16], 1, &[0, 255, 128, 64]);
//! ingestor.process(&encode(&packet))?;
//!
//! let update = rx.try_dequeue().expect("one update");
//! assert_eq!(update.color, Rgb::new(255, 128, 64));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod dispatch;
pub mod protocols;
pub mod source;

pub use dispatch::{
    ActuationError, ChannelMap, ColorActuator, ColorUpdate, Ingest, Ingestor, OutputTarget, Rgb,
};
pub use protocols::e131::{E131Error, E131Packet, decode, encode};
pub use source::{DatagramSource, SourceError, UdpDatagramSource};

/// Human-oriented view of a decoded packet.
///
/// # Examples
/// ```
/// use lumenbridge_core::{E131Packet, PacketSummary};
///
/// let packet = E131Packet::data_packet(3, "desk", [0u8; 16], 9, &[0, 1, 2]);
/// let summary = PacketSummary::from_packet(&packet);
/// assert_eq!(summary.universe, 3);
/// assert_eq!(summary.channels, vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketSummary {
    /// Universe number.
    pub universe: u16,
    /// Whether PID and vectors match an E1.31 data packet.
    pub data_packet: bool,
    /// Sender CID as lowercase hex.
    pub cid: String,
    /// Source name, when not blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    pub priority: u8,
    pub sync_address: u16,
    pub sequence: u8,
    pub options: u8,
    /// DMX start code (absent for header-only packets).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_code: Option<u8>,
    /// Property value count as declared in the DMP layer.
    pub declared_value_count: u16,
    /// Property values actually present, start code included.
    pub value_count: usize,
    /// Channel values after the start code.
    pub channels: Vec<u8>,
}

impl PacketSummary {
    pub fn from_packet(packet: &E131Packet) -> Self {
        Self {
            universe: packet.universe(),
            data_packet: packet.is_data_packet(),
            cid: packet.cid_hex(),
            source_name: packet.source_name(),
            priority: packet.frame.priority,
            sync_address: packet.sync_address(),
            sequence: packet.frame.sequence_number,
            options: packet.frame.options,
            start_code: packet.start_code(),
            declared_value_count: packet.property_value_count(),
            value_count: packet.dmp.property_values.len(),
            channels: packet.channels().to_vec(),
        }
    }
}

/// Decodes `datagram` and summarizes it.
pub fn summarize(datagram: &[u8]) -> Result<PacketSummary, E131Error> {
    decode(datagram).map(|packet| PacketSummary::from_packet(&packet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_omits_optional_fields_when_none() {
        let summary = summarize(&[0u8; protocols::e131::layout::HEADER_LEN]).unwrap();
        let value = serde_json::to_value(&summary).expect("summary json");
        assert!(value.get("source_name").is_none());
        assert!(value.get("start_code").is_none());
        assert_eq!(value["value_count"], 0);
        assert_eq!(value["data_packet"], false);
    }

    #[test]
    fn summary_reports_declared_and_actual_counts() {
        let mut packet = E131Packet::data_packet(1, "desk", [0u8; 16], 1, &[0, 10, 20]);
        packet.dmp.property_value_count = 513u16.to_be_bytes();
        let summary = summarize(&encode(&packet)).unwrap();
        assert_eq!(summary.declared_value_count, 513);
        assert_eq!(summary.value_count, 3);
        assert_eq!(summary.source_name.as_deref(), Some("desk"));
        assert!(summary.data_packet);
    }
}
