use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

use tracing::{debug, info, trace};

use super::{DatagramSource, SourceError};

/// Receive buffer size; longer datagrams are truncated by the OS.
pub const RECV_BUFFER_LEN: usize = 1024;

/// UDP socket yielding one datagram per call.
pub struct UdpDatagramSource {
    socket: UdpSocket,
    buf: Box<[u8; RECV_BUFFER_LEN]>,
}

impl UdpDatagramSource {
    /// Binds `addr`. A multicast IPv4 address binds the wildcard address on
    /// the same port and joins the group.
    pub fn bind(addr: SocketAddr) -> Result<Self, SourceError> {
        let socket = match addr {
            SocketAddr::V4(v4) if v4.ip().is_multicast() => {
                let wildcard = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, v4.port()));
                let socket = UdpSocket::bind(wildcard)
                    .map_err(|source| SourceError::Bind { addr, source })?;
                socket
                    .join_multicast_v4(v4.ip(), &Ipv4Addr::UNSPECIFIED)
                    .map_err(|source| SourceError::Bind { addr, source })?;
                debug!(group = %v4.ip(), "joined multicast group");
                socket
            }
            _ => UdpSocket::bind(addr).map_err(|source| SourceError::Bind { addr, source })?,
        };
        info!("listening on {addr} for sACN packets");
        Ok(Self::from_socket(socket))
    }

    pub fn from_socket(socket: UdpSocket) -> Self {
        Self {
            socket,
            buf: Box::new([0u8; RECV_BUFFER_LEN]),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SourceError> {
        Ok(self.socket.local_addr()?)
    }
}

impl DatagramSource for UdpDatagramSource {
    fn next_datagram(&mut self) -> Result<Option<&[u8]>, SourceError> {
        let (len, peer) = self.socket.recv_from(&mut self.buf[..])?;
        trace!(%peer, len, "datagram received");
        Ok(Some(&self.buf[..len]))
    }
}

/// Standard sACN multicast group for a universe (239.255.hi.lo).
pub fn universe_multicast_group(universe: u16) -> Ipv4Addr {
    let [hi, lo] = universe.to_be_bytes();
    Ipv4Addr::new(239, 255, hi, lo)
}
