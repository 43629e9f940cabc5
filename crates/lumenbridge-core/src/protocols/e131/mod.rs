//! E1.31 (sACN) packet codec.
//!
//! `decode` slices a datagram into root, framing and DMP layers at fixed
//! offsets and `encode` concatenates them back. Neither validates protocol
//! identifiers or vectors; [`E131Packet::is_data_packet`] reports conformance
//! for callers that care.
//!
//! Offsets and protocol constants live in `layout`, bounds-checked access in
//! `reader`.

pub mod error;
pub mod layout;
pub mod packet;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::E131Error;
pub use packet::{DmpLayer, E131Packet, FramingLayer, RootLayer};
pub use parser::decode;
pub use writer::encode;
