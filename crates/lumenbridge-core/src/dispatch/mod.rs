//! Bounded dispatch pipeline between packet ingestion and output devices.
//!
//! ```text
//! DatagramSource -> Ingestor -> UpdateQueue (bounded) -> output workers -> ColorActuator
//! ```
//!
//! The ingestor never waits on the queue: when it is full the update is
//! dropped and ingestion moves on. Workers block on the queue and apply each
//! update through the target's actuator; a failing actuator is logged and
//! the worker keeps going.

pub mod ingest;
pub mod mock;
pub mod queue;
pub mod target;
pub mod worker;

use std::io;

use thiserror::Error;

pub use ingest::{Ingest, IngestStats, Ingestor};
pub use queue::{DEFAULT_QUEUE_CAPACITY, Enqueue, UpdateReceiver, UpdateSender, update_queue};
pub use target::{Applied, ChannelMap, ColorUpdate, OutputTarget};
pub use worker::{WorkerStats, apply_update, spawn_workers};

/// An 8-bit red/green/blue triple as carried in the DMX payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Failure reported by a [`ColorActuator`].
#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("device error: {0}")]
    Device(String),
}

/// The device-facing side of an output target.
///
/// Implementations may be slow or fail transiently; callers never retry.
pub trait ColorActuator: Send + Sync {
    fn apply(&self, color: Rgb) -> Result<(), ActuationError>;
}
