mod udp;

pub use udp::{RECV_BUFFER_LEN, UdpDatagramSource, universe_multicast_group};

use std::net::SocketAddr;

use thiserror::Error;

/// A stream of raw datagrams feeding the ingestion stage.
pub trait DatagramSource {
    /// Blocks for the next datagram. `Ok(None)` means the source is exhausted.
    fn next_datagram(&mut self) -> Result<Option<&[u8]>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
