use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use super::queue::{Enqueue, UpdateSender};
use super::target::{ColorUpdate, OutputTarget};
use crate::protocols::e131::{E131Error, decode};
use crate::source::DatagramSource;

/// What happened to one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    /// Addressed to a universe other than the monitored one.
    OtherUniverse(u16),
    /// Same property values as the previous packet; nothing to do.
    Unchanged,
    /// New payload. Counts add up to the number of targets.
    Dispatched {
        queued: usize,
        dropped: usize,
        skipped: usize,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub packets: u64,
    pub read_errors: u64,
    pub decode_errors: u64,
    pub other_universe: u64,
    pub unchanged: u64,
    pub queued: u64,
    pub dropped: u64,
    pub skipped: u64,
}

/// Ingestion stage: filters, diffs and fans packets out to the update queue.
///
/// Owns the previous payload of the monitored universe; nothing else reads
/// or writes it.
pub struct Ingestor {
    universe: u16,
    targets: Vec<Arc<OutputTarget>>,
    previous: Vec<u8>,
    queue: UpdateSender,
    next_sequence: u64,
    stats: IngestStats,
}

impl Ingestor {
    pub fn new(universe: u16, targets: Vec<Arc<OutputTarget>>, queue: UpdateSender) -> Self {
        Self {
            universe,
            targets,
            previous: Vec::new(),
            queue,
            next_sequence: 0,
            stats: IngestStats::default(),
        }
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Runs one datagram through decode, universe filter, diff and enqueue.
    pub fn process(&mut self, datagram: &[u8]) -> Result<Ingest, E131Error> {
        self.stats.packets += 1;
        let packet = match decode(datagram) {
            Ok(packet) => packet,
            Err(err) => {
                self.stats.decode_errors += 1;
                return Err(err);
            }
        };

        let universe = packet.universe();
        if universe != self.universe {
            self.stats.other_universe += 1;
            return Ok(Ingest::OtherUniverse(universe));
        }

        debug!(
            universe,
            source_name = packet.source_name().as_deref().unwrap_or(""),
            value_count = packet.property_value_count(),
            "received sACN packet"
        );

        let values = packet.dmp.property_values;
        if values == self.previous {
            self.stats.unchanged += 1;
            return Ok(Ingest::Unchanged);
        }
        self.previous = values;

        let mut queued = 0;
        let mut dropped = 0;
        let mut skipped = 0;
        for target in &self.targets {
            let Some(color) = target.channels().extract(&self.previous) else {
                warn!(
                    target_name = target.name(),
                    channels = ?target.channels(),
                    values = self.previous.len(),
                    "channel offset beyond received payload, target skipped"
                );
                skipped += 1;
                continue;
            };

            trace!(target_name = target.name(), %color, "sending color");
            let update = ColorUpdate {
                target: Arc::clone(target),
                color,
                sequence: self.next_sequence,
            };
            self.next_sequence += 1;
            match self.queue.try_enqueue(update) {
                Enqueue::Queued => queued += 1,
                Enqueue::Dropped => dropped += 1,
            }
        }

        self.stats.queued += queued as u64;
        self.stats.dropped += dropped as u64;
        self.stats.skipped += skipped as u64;
        Ok(Ingest::Dispatched {
            queued,
            dropped,
            skipped,
        })
    }

    /// Pulls datagrams until the source is exhausted.
    ///
    /// Read and decode failures are logged and the loop carries on; a
    /// network source never reports exhaustion, so this only returns for
    /// finite sources.
    pub fn run<S: DatagramSource>(&mut self, source: &mut S) {
        loop {
            match source.next_datagram() {
                Ok(Some(datagram)) => {
                    if let Err(err) = self.process(datagram) {
                        warn!("error parsing packet: {err}");
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    self.stats.read_errors += 1;
                    error!("error reading datagram: {err}");
                }
            }
        }
        debug!(stats = ?self.stats, "datagram source exhausted");
    }
}
