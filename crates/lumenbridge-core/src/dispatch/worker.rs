use std::io;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};

use super::ActuationError;
use super::queue::UpdateReceiver;
use super::target::{Applied, ColorUpdate};

/// Per-worker counters, returned when the worker exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub applied: u64,
    pub superseded: u64,
    pub failed: u64,
}

/// Hands one update to its target's actuator.
pub fn apply_update(update: &ColorUpdate) -> Result<Applied, ActuationError> {
    update.target.apply(update.color, update.sequence)
}

/// Spawns `count` output workers draining `receiver`.
///
/// Each worker blocks on the queue and exits once every sender is dropped.
pub fn spawn_workers(
    count: usize,
    receiver: UpdateReceiver,
) -> io::Result<Vec<JoinHandle<WorkerStats>>> {
    (0..count.max(1))
        .map(|id| {
            let receiver = receiver.clone();
            thread::Builder::new()
                .name(format!("lumenbridge-output-{id}"))
                .spawn(move || worker_loop(id, receiver))
        })
        .collect()
}

fn worker_loop(id: usize, receiver: UpdateReceiver) -> WorkerStats {
    debug!(worker = id, "output worker started");
    let mut stats = WorkerStats::default();

    while let Some(update) = receiver.dequeue() {
        match apply_update(&update) {
            Ok(Applied::Applied) => stats.applied += 1,
            Ok(Applied::Superseded) => {
                debug!(
                    worker = id,
                    target_name = update.target_name(),
                    sequence = update.sequence,
                    "newer color already applied, update skipped"
                );
                stats.superseded += 1;
            }
            Err(err) => {
                error!(
                    worker = id,
                    target_name = update.target_name(),
                    "failed to set color: {err}"
                );
                stats.failed += 1;
            }
        }
    }

    info!(worker = id, ?stats, "output worker stopped");
    stats
}
