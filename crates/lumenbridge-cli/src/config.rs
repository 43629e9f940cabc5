//! TOML configuration for the bridge.
//!
//! ```toml
//! log_level = "info"
//!
//! [input]
//! ip = "0.0.0.0"
//! port = 5568
//! universe = 1
//! multicast = false
//!
//! [dispatch]
//! queue_capacity = 1000
//! workers = 1
//!
//! [output.kitchen]
//! address = "192.168.1.40:5577"
//! red = 1
//! green = 2
//! blue = 3
//! connect = "scan"
//! ```
//!
//! Channel offsets index the DMX property values, where 0 is the start code.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lumenbridge_core::ChannelMap;
use lumenbridge_core::dispatch::DEFAULT_QUEUE_CAPACITY;
use lumenbridge_core::protocols::e131::layout;
use lumenbridge_core::source::universe_multicast_group;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Highest valid E1.31 universe.
const MAX_UNIVERSE: u16 = 63999;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// `tracing` level used when neither `RUST_LOG` nor `--debug` is set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub input: InputConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Lights keyed by name.
    #[serde(default)]
    pub output: BTreeMap<String, OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    #[serde(default = "default_ip")]
    pub ip: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    pub universe: u16,
    /// Listen on the universe's standard multicast group instead of `ip`.
    #[serde(default)]
    pub multicast: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// `host:port` of the light controller.
    pub address: String,
    pub red: usize,
    pub green: usize,
    pub blue: usize,
    #[serde(default)]
    pub connect: ConnectMode,
}

/// How a light is reached at startup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectMode {
    /// Connect to the configured address straight away.
    #[default]
    Direct,
    /// Probe the address until it answers, then connect.
    Scan,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
fn default_port() -> u16 {
    layout::DEFAULT_PORT
}
fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
fn default_workers() -> usize {
    1
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            workers: default_workers(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// The configured level, normalized for `EnvFilter`.
    pub fn log_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::INFO)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        let ip = if self.input.multicast {
            IpAddr::V4(universe_multicast_group(self.input.universe))
        } else {
            self.input.ip
        };
        SocketAddr::new(ip, self.input.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if LevelFilter::from_str(&self.log_level).is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level '{}' (expected off, error, warn, info, debug or trace)",
                self.log_level
            )));
        }
        let universe = self.input.universe;
        if universe == 0 || universe > MAX_UNIVERSE {
            return Err(ConfigError::Invalid(format!(
                "universe {universe} out of range 1..={MAX_UNIVERSE}"
            )));
        }
        if self.dispatch.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "dispatch.queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.dispatch.workers == 0 {
            return Err(ConfigError::Invalid(
                "dispatch.workers must be at least 1".to_string(),
            ));
        }
        if self.output.is_empty() {
            return Err(ConfigError::Invalid("no outputs configured".to_string()));
        }
        for (name, output) in &self.output {
            for (channel, offset) in [
                ("red", output.red),
                ("green", output.green),
                ("blue", output.blue),
            ] {
                if offset >= layout::MAX_PROPERTY_VALUES {
                    return Err(ConfigError::Invalid(format!(
                        "output[{name}].{channel} = {offset} exceeds the last DMX slot ({})",
                        layout::MAX_PROPERTY_VALUES - 1
                    )));
                }
            }
        }
        Ok(())
    }
}

impl OutputConfig {
    pub fn channels(&self) -> ChannelMap {
        ChannelMap::new(self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::{Config, ConfigError, ConnectMode};

    const MINIMAL: &str = r#"
[input]
universe = 1

[output.a]
address = "127.0.0.1:5577"
red = 1
green = 2
blue = 3
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml(MINIMAL).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.input.ip, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.input.port, 5568);
        assert_eq!(config.dispatch.queue_capacity, 1000);
        assert_eq!(config.dispatch.workers, 1);
        let output = &config.output["a"];
        assert_eq!(output.connect, ConnectMode::Direct);
        assert_eq!(output.channels().blue, 3);
    }

    #[test]
    fn full_config_parses() {
        let text = r#"
log_level = "debug"

[input]
ip = "239.255.0.7"
port = 6000
universe = 7

[dispatch]
queue_capacity = 10
workers = 2

[output.kitchen]
address = "10.0.0.5:5577"
red = 10
green = 11
blue = 12
connect = "scan"

[output.hall]
address = "10.0.0.6:5577"
red = 1
green = 2
blue = 3
"#;
        let config = Config::from_toml(text).unwrap();
        assert_eq!(config.listen_addr().to_string(), "239.255.0.7:6000");
        assert_eq!(config.dispatch.workers, 2);
        assert_eq!(config.output["kitchen"].connect, ConnectMode::Scan);
        let names: Vec<&str> = config.output.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["hall", "kitchen"]);
    }

    #[test]
    fn multicast_listens_on_universe_group() {
        let text = MINIMAL.replace("universe = 1", "universe = 258\nmulticast = true");
        let config = Config::from_toml(&text).unwrap();
        assert_eq!(config.listen_addr().to_string(), "239.255.1.2:5568");
    }

    #[test]
    fn misspelled_log_level_is_rejected() {
        let text = format!("log_level = \"warning\"\n{MINIMAL}");
        let err = Config::from_toml(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("warning"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let text = format!("log_level = \"WARN\"\n{MINIMAL}");
        let config = Config::from_toml(&text).unwrap();
        assert_eq!(config.log_filter().to_string(), "warn");
    }

    #[test]
    fn offset_past_last_slot_is_rejected() {
        let text = MINIMAL.replace("blue = 3", "blue = 513");
        let err = Config::from_toml(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("output[a].blue"));
    }

    #[test]
    fn last_slot_is_accepted() {
        let text = MINIMAL.replace("blue = 3", "blue = 512");
        assert!(Config::from_toml(&text).is_ok());
    }

    #[test]
    fn empty_output_table_is_rejected() {
        let err = Config::from_toml("[input]\nuniverse = 1\n").unwrap_err();
        assert!(err.to_string().contains("no outputs configured"));
    }

    #[test]
    fn universe_zero_is_rejected() {
        let text = MINIMAL.replace("universe = 1", "universe = 0");
        assert!(matches!(
            Config::from_toml(&text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let text = format!("{MINIMAL}\n[dispatch]\nworkers = 0\n");
        assert!(Config::from_toml(&text).is_err());
    }

    #[test]
    fn unknown_connect_mode_is_a_parse_error() {
        let text = format!("{MINIMAL}connect = \"pair\"\n");
        assert!(matches!(
            Config::from_toml(&text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn example_config_is_valid() {
        let config = Config::from_toml(include_str!("../../../config.example.toml")).unwrap();
        assert_eq!(config.output.len(), 2);
        assert_eq!(config.output["kitchen"].connect, ConnectMode::Scan);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load(std::path::Path::new("/nonexistent/lumenbridge.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lumenbridge.toml"));
    }
}
