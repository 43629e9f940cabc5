use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ConnectMode;

/// How long a scan keeps probing before giving up.
pub const SCAN_WINDOW: Duration = Duration::from_secs(5);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const PROBE_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("invalid address '{address}' for light[{name}]: {source}")]
    Address {
        name: String,
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to light[{name}] at {addr}: {source}")]
    Connect {
        name: String,
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to find light[{name}] at {address} within {}s", window.as_secs_f32())]
    NotFound {
        name: String,
        address: String,
        window: Duration,
    },
    #[error("light[{name}] i/o error: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Strategy for reaching a light controller over TCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    Direct,
    /// Probe the address until it accepts a connection or `window` elapses.
    ScanThenConnect { window: Duration },
}

impl From<ConnectMode> for Connector {
    fn from(mode: ConnectMode) -> Self {
        match mode {
            ConnectMode::Direct => Connector::Direct,
            ConnectMode::Scan => Connector::ScanThenConnect {
                window: SCAN_WINDOW,
            },
        }
    }
}

impl Connector {
    pub fn connect(&self, name: &str, address: &str) -> Result<TcpStream, DeviceError> {
        let addr = resolve(name, address)?;
        match *self {
            Connector::Direct => {
                debug!(light = name, %addr, "connecting");
                TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(|source| {
                    DeviceError::Connect {
                        name: name.to_string(),
                        addr,
                        source,
                    }
                })
            }
            Connector::ScanThenConnect { window } => scan(name, address, addr, window),
        }
    }
}

fn resolve(name: &str, address: &str) -> Result<SocketAddr, DeviceError> {
    let invalid = |source: io::Error| DeviceError::Address {
        name: name.to_string(),
        address: address.to_string(),
        source,
    };
    address
        .to_socket_addrs()
        .map_err(invalid)?
        .next()
        .ok_or_else(|| {
            invalid(io::Error::new(
                io::ErrorKind::NotFound,
                "address resolved to nothing",
            ))
        })
}

fn scan(
    name: &str,
    address: &str,
    addr: SocketAddr,
    window: Duration,
) -> Result<TcpStream, DeviceError> {
    info!(light = name, %addr, "scanning for light");
    let deadline = Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(DeviceError::NotFound {
                name: name.to_string(),
                address: address.to_string(),
                window,
            });
        }
        match TcpStream::connect_timeout(&addr, remaining.min(CONNECT_TIMEOUT)) {
            Ok(stream) => {
                info!(light = name, %addr, "light found");
                return Ok(stream);
            }
            Err(err) => {
                debug!(light = name, %addr, error = %err, "probe failed");
                let left = deadline.saturating_duration_since(Instant::now());
                thread::sleep(PROBE_INTERVAL.min(left));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    use super::{Connector, DeviceError};
    use crate::config::ConnectMode;

    fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr.to_string()
    }

    #[test]
    fn direct_connects_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let stream = Connector::Direct.connect("a", &address).unwrap();
        assert_eq!(stream.peer_addr().unwrap(), listener.local_addr().unwrap());
    }

    #[test]
    fn direct_reports_refused_connection() {
        let err = Connector::Direct.connect("a", &closed_port()).unwrap_err();
        assert!(matches!(err, DeviceError::Connect { .. }));
        assert!(err.to_string().contains("light[a]"));
    }

    #[test]
    fn scan_gives_up_after_window() {
        let connector = Connector::ScanThenConnect {
            window: Duration::from_millis(300),
        };
        let start = Instant::now();
        let err = connector.connect("hall", &closed_port()).unwrap_err();
        assert!(matches!(err, DeviceError::NotFound { .. }));
        assert!(err.to_string().contains("failed to find light[hall]"));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn scan_finds_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let connector = Connector::ScanThenConnect {
            window: Duration::from_secs(2),
        };
        assert!(connector.connect("a", &address).is_ok());
    }

    #[test]
    fn unparseable_address_is_rejected() {
        let err = Connector::Direct.connect("a", "not an address").unwrap_err();
        assert!(matches!(err, DeviceError::Address { .. }));
    }

    #[test]
    fn connect_mode_maps_to_connector() {
        assert_eq!(Connector::from(ConnectMode::Direct), Connector::Direct);
        assert!(matches!(
            Connector::from(ConnectMode::Scan),
            Connector::ScanThenConnect { .. }
        ));
    }
}
