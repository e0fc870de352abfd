use super::{AudioResult, AudioSink, VolumeRange};
use crate::error::AudioError;
use log::debug;

/// Volume held in memory.
///
/// Records every applied write and can be told to fail upcoming reads or
/// writes, which is how transient device errors are exercised.
#[derive(Debug, Clone)]
pub struct SimulatedSink {
    range: VolumeRange,
    volume: f64,
    writes: Vec<f64>,
    failing_reads: usize,
    failing_writes: usize,
}

impl SimulatedSink {
    pub fn new(range: VolumeRange, initial: f64) -> Self {
        Self {
            range,
            volume: range.clamp(initial),
            writes: Vec::new(),
            failing_reads: 0,
            failing_writes: 0,
        }
    }

    /// Volume as last applied
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    /// Every successful write, in order
    pub fn writes(&self) -> &[f64] {
        &self.writes
    }

    /// Make the next `count` calls to `current_volume` fail
    pub fn fail_next_reads(&mut self, count: usize) {
        self.failing_reads = count;
    }

    /// Make the next `count` calls to `set_volume` fail
    pub fn fail_next_writes(&mut self, count: usize) {
        self.failing_writes = count;
    }
}

impl AudioSink for SimulatedSink {
    fn volume_range(&mut self) -> AudioResult<VolumeRange> {
        Ok(self.range)
    }

    fn current_volume(&mut self) -> AudioResult<f64> {
        if self.failing_reads > 0 {
            self.failing_reads -= 1;
            return Err(AudioError::Unavailable("simulated read failure".to_string()));
        }
        Ok(self.volume)
    }

    fn set_volume(&mut self, volume: f64) -> AudioResult<()> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(AudioError::Unavailable("simulated write failure".to_string()));
        }
        self.volume = self.range.clamp(volume);
        self.writes.push(self.volume);
        debug!("Simulated volume set to {:.3}", self.volume);
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
