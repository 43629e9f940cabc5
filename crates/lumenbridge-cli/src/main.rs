mod config;
mod device;
mod logging;

use std::fs;
use std::net::{SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lumenbridge_core::dispatch::{Ingestor, spawn_workers, update_queue};
use lumenbridge_core::protocols::e131::{E131Packet, encode, layout};
use lumenbridge_core::{PacketSummary, UdpDatagramSource};
use tracing::{debug, info};

use crate::config::{Config, DEFAULT_CONFIG_PATH};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LUMENBRIDGE_BUILD_COMMIT"),
    " ",
    env!("LUMENBRIDGE_BUILD_DATE"),
    ")"
);

/// CID used by `send`.
const SEND_CID: [u8; 16] = *b"lumenbridge-send";

#[derive(Parser, Debug)]
#[command(name = "lumenbridge")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Bridge an E1.31 (sACN) universe to network RGB lights.",
    long_about = None,
    after_help = "Examples:\n  lumenbridge run\n  lumenbridge --config lights.toml run --dry-run\n  lumenbridge inspect packet.bin --pretty\n  lumenbridge send --to 127.0.0.1:5568 --universe 1 255,128,0"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Listen for sACN and drive the configured lights.
    Run {
        /// Log colors instead of connecting to lights
        #[arg(long)]
        dry_run: bool,
    },
    /// Decode a raw E1.31 datagram from a file and print it as JSON.
    Inspect {
        /// File holding exactly one datagram
        input: PathBuf,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,
    },
    /// Send one E1.31 data packet, for testing a running bridge.
    Send {
        /// Destination address
        #[arg(long, default_value_t = SocketAddr::from(([127, 0, 0, 1], layout::DEFAULT_PORT)))]
        to: SocketAddr,

        #[arg(long, default_value_t = 1)]
        universe: u16,

        #[arg(long, default_value_t = 0)]
        sequence: u8,

        #[arg(long, default_value = "lumenbridge")]
        source_name: String,

        /// DMX channel values starting at channel 1, comma separated
        #[arg(value_delimiter = ',', required = true)]
        channels: Vec<u8>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { dry_run } => cmd_run(&cli.config, cli.debug, dry_run),
        Commands::Inspect {
            input,
            pretty,
            compact,
        } => {
            init_logging(cli.debug, "warn");
            cmd_inspect(&input, pretty, compact)
        }
        Commands::Send {
            to,
            universe,
            sequence,
            source_name,
            channels,
        } => {
            init_logging(cli.debug, "info");
            cmd_send(to, universe, sequence, &source_name, &channels)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn init_logging(debug: bool, default_level: &str) {
    logging::init(if debug { "debug" } else { default_level });
}

fn cmd_run(config_path: &Path, debug: bool, dry_run: bool) -> Result<(), CliError> {
    let config = Config::load(config_path).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some(format!(
                "pass --config or create {} (see config.example.toml)",
                DEFAULT_CONFIG_PATH
            )),
        )
    })?;
    init_logging(debug, &config.log_filter().to_string());
    debug!(?config, "config loaded");

    let targets = device::connect_outputs(&config, dry_run).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("check the light is powered and reachable, or use --dry-run".to_string()),
        )
    })?;

    let mut source = UdpDatagramSource::bind(config.listen_addr())
        .with_context(|| format!("failed to listen on {}", config.listen_addr()))?;

    let (queue, updates) = update_queue(config.dispatch.queue_capacity);
    let workers = spawn_workers(config.dispatch.workers, updates)
        .context("failed to start output workers")?;
    info!(
        universe = config.input.universe,
        lights = targets.len(),
        workers = workers.len(),
        dry_run,
        "bridge running"
    );

    let mut ingestor = Ingestor::new(config.input.universe, targets, queue);
    ingestor.run(&mut source);
    Ok(())
}

fn cmd_inspect(input: &Path, pretty: bool, compact: bool) -> Result<(), CliError> {
    if !input.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a file containing one raw E1.31 datagram".to_string()),
        ));
    }
    let datagram = fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let summary = lumenbridge_core::summarize(&datagram).map_err(|err| {
        CliError::new(
            format!("{}: {}", input.display(), err),
            Some("the file must start with the 125-byte E1.31 header".to_string()),
        )
    })?;
    let json = serialize_summary(&summary, pretty, compact)?;
    println!("{}", json);
    Ok(())
}

fn serialize_summary(
    summary: &PacketSummary,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(summary)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(summary)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn cmd_send(
    to: SocketAddr,
    universe: u16,
    sequence: u8,
    source_name: &str,
    channels: &[u8],
) -> Result<(), CliError> {
    if channels.len() >= layout::MAX_PROPERTY_VALUES {
        return Err(CliError::new(
            format!("too many channels: {}", channels.len()),
            Some(format!(
                "a universe holds at most {} channels",
                layout::MAX_PROPERTY_VALUES - 1
            )),
        ));
    }
    let mut values = Vec::with_capacity(channels.len() + 1);
    values.push(layout::DMX_NULL_START_CODE);
    values.extend_from_slice(channels);

    let packet = E131Packet::data_packet(universe, source_name, SEND_CID, sequence, &values);
    let bind: SocketAddr = if to.is_ipv4() {
        ([0, 0, 0, 0], 0).into()
    } else {
        (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(bind).context("failed to open UDP socket")?;
    let sent = socket
        .send_to(&encode(&packet), to)
        .with_context(|| format!("failed to send to {}", to))?;
    info!(%to, universe, bytes = sent, "packet sent");
    Ok(())
}
