//! In-memory actuator for exercising the pipeline without hardware.
//!
//! Every successful `apply` is recorded in order so tests can assert exactly
//! which colors reached a target. `failing()` builds an actuator whose calls
//! all return [`ActuationError::Device`]; `fail_next(n)` fails only the next
//! `n` calls. An optional delay simulates a slow device.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ActuationError, ColorActuator, Rgb};

#[derive(Default)]
pub struct RecordingActuator {
    colors: Mutex<Vec<Rgb>>,
    calls: AtomicUsize,
    failures_left: AtomicUsize,
    always_fail: bool,
    delay: Option<Duration>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Colors applied successfully, oldest first.
    pub fn colors(&self) -> Vec<Rgb> {
        self.colors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of `apply` calls, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ColorActuator for RecordingActuator {
    fn apply(&self, color: Rgb) -> Result<(), ActuationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.always_fail {
            return Err(ActuationError::Device("mock failure".into()));
        }
        let pending = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if pending.is_ok() {
            return Err(ActuationError::Device("mock failure".into()));
        }
        self.colors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(color);
        Ok(())
    }
}
