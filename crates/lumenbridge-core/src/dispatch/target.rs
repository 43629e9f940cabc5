use std::sync::{Arc, Mutex};

use super::{ActuationError, ColorActuator, Rgb};

/// Property-value indices of the red, green and blue channels.
///
/// Index 0 is the DMX start code, so the first channel is index 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMap {
    pub red: usize,
    pub green: usize,
    pub blue: usize,
}

impl ChannelMap {
    pub const fn new(red: usize, green: usize, blue: usize) -> Self {
        Self { red, green, blue }
    }

    /// Reads the color out of a property-value array, `None` if any offset
    /// lies past its end.
    pub fn extract(&self, property_values: &[u8]) -> Option<Rgb> {
        Some(Rgb {
            red: *property_values.get(self.red)?,
            green: *property_values.get(self.green)?,
            blue: *property_values.get(self.blue)?,
        })
    }
}

/// A named fixture fed from fixed channels of the monitored universe.
pub struct OutputTarget {
    name: String,
    channels: ChannelMap,
    actuator: Arc<dyn ColorActuator>,
    // Sequence of the newest update handed to the actuator.
    last_applied: Mutex<Option<u64>>,
}

/// Outcome of [`OutputTarget::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// A newer update for this target was applied first.
    Superseded,
}

impl OutputTarget {
    pub fn new(
        name: impl Into<String>,
        channels: ChannelMap,
        actuator: Arc<dyn ColorActuator>,
    ) -> Self {
        Self {
            name: name.into(),
            channels,
            actuator,
            last_applied: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channels(&self) -> ChannelMap {
        self.channels
    }

    /// Applies `color` unless an update with a higher sequence already went
    /// out. Calls for the same target are serialized.
    pub fn apply(&self, color: Rgb, sequence: u64) -> Result<Applied, ActuationError> {
        let mut last = self
            .last_applied
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if matches!(*last, Some(applied) if applied > sequence) {
            return Ok(Applied::Superseded);
        }
        *last = Some(sequence);
        self.actuator.apply(color)?;
        Ok(Applied::Applied)
    }
}

impl std::fmt::Debug for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputTarget")
            .field("name", &self.name)
            .field("channels", &self.channels)
            .finish_non_exhaustive()
    }
}

/// One pending color change for one target.
#[derive(Debug, Clone)]
pub struct ColorUpdate {
    pub target: Arc<OutputTarget>,
    pub color: Rgb,
    /// Assigned by the ingestor, increasing across all targets.
    pub sequence: u64,
}

impl ColorUpdate {
    pub fn target_name(&self) -> &str {
        self.target.name()
    }
}
