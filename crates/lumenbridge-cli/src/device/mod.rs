//! Light controllers reachable over TCP, plus a logging stand-in for `--dry-run`.

mod command;
mod connector;

use std::io::{self, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lumenbridge_core::{ActuationError, ColorActuator, OutputTarget, Rgb};
use tracing::{info, warn};

pub use connector::{Connector, DeviceError};

use crate::config::{Config, OutputConfig};

const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// A connected LED controller. Writes are serialized on the stream.
///
/// A failed write may leave part of a frame on the wire, so the stream is
/// shut down and every later write fails with `NotConnected`.
pub struct LedController {
    name: String,
    stream: Mutex<Option<TcpStream>>,
}

impl LedController {
    pub fn connect(name: &str, output: &OutputConfig) -> Result<Self, DeviceError> {
        let stream = Connector::from(output.connect).connect(name, &output.address)?;
        Self::from_stream(name, stream)
    }

    pub fn from_stream(name: &str, stream: TcpStream) -> Result<Self, DeviceError> {
        let io_err = |source: std::io::Error| DeviceError::Io {
            name: name.to_string(),
            source,
        };
        stream.set_nodelay(true).map_err(io_err)?;
        stream
            .set_write_timeout(Some(WRITE_TIMEOUT))
            .map_err(io_err)?;
        Ok(Self {
            name: name.to_string(),
            stream: Mutex::new(Some(stream)),
        })
    }

    pub fn power_on(&self) -> Result<(), DeviceError> {
        self.send(&command::POWER_ON)
            .map_err(|source| DeviceError::Io {
                name: self.name.clone(),
                source,
            })
    }

    fn send(&self, frame: &[u8]) -> io::Result<()> {
        let mut slot = self
            .stream
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(stream) = slot.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                format!("light[{}] connection closed after a failed write", self.name),
            ));
        };
        if let Err(err) = stream.write_all(frame) {
            warn!(light = %self.name, error = %err, "write failed, closing connection");
            if let Some(stream) = slot.take() {
                let _ = stream.shutdown(Shutdown::Both);
            }
            return Err(err);
        }
        Ok(())
    }
}

impl ColorActuator for LedController {
    fn apply(&self, color: Rgb) -> Result<(), ActuationError> {
        self.send(&command::set_color(color))?;
        Ok(())
    }
}

/// Logs colors instead of driving hardware.
pub struct LogActuator {
    name: String,
}

impl LogActuator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ColorActuator for LogActuator {
    fn apply(&self, color: Rgb) -> Result<(), ActuationError> {
        info!(light = %self.name, %color, "color applied (dry run)");
        Ok(())
    }
}

/// Builds one output target per configured light.
///
/// Real lights are connected and powered on in name order; the first failure
/// aborts and drops any connections already made.
pub fn connect_outputs(
    config: &Config,
    dry_run: bool,
) -> Result<Vec<Arc<OutputTarget>>, DeviceError> {
    let mut targets = Vec::with_capacity(config.output.len());
    for (name, output) in &config.output {
        let actuator: Arc<dyn ColorActuator> = if dry_run {
            Arc::new(LogActuator::new(name))
        } else {
            let light = LedController::connect(name, output)?;
            light.power_on()?;
            info!(light = %name, address = %output.address, "light connected");
            Arc::new(light)
        };
        targets.push(Arc::new(OutputTarget::new(
            name.as_str(),
            output.channels(),
            actuator,
        )));
    }
    Ok(targets)
}
