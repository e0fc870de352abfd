//! Audio sink seam: reading and writing the system output volume.
//!
//! Volumes are plain `f64` values in the device's native units (decibels for
//! a Windows endpoint, percent for PulseAudio, ...). The pipeline treats the
//! range reported by [`AudioSink::volume_range`] as an opaque ordered interval.

/// PulseAudio / PipeWire sink driven through `pactl`
pub mod pulse;

/// In-memory sink for headless runs and tests
pub mod simulated;

use crate::{error::AudioError, Error, Result};
use serde::{Deserialize, Serialize};

pub use pulse::PulseAudioSink;
pub use simulated::SimulatedSink;

/// Result type for sink operations
pub type AudioResult<T> = std::result::Result<T, AudioError>;

/// Native volume interval of an output device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRange {
    min: f64,
    max: f64,
}

impl VolumeRange {
    /// # Errors
    ///
    /// Returns `ConfigError` unless both ends are finite and `max > min`
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(Error::ConfigError(format!(
                "Invalid native volume range [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> f64 {
        self.min
    }

    pub const fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, volume: f64) -> f64 {
        volume.clamp(self.min, self.max)
    }
}

/// Output device whose master volume can be read and set
pub trait AudioSink {
    /// Native range of the device, queried once at startup
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be queried
    fn volume_range(&mut self) -> AudioResult<VolumeRange>;

    /// Current master volume in native units
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be queried
    fn current_volume(&mut self) -> AudioResult<f64>;

    /// Set the master volume; the sink clamps to its own range
    ///
    /// # Errors
    ///
    /// Returns an error if the write was not applied
    fn set_volume(&mut self, volume: f64) -> AudioResult<()>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn volume_range(&mut self) -> AudioResult<VolumeRange> {
        (**self).volume_range()
    }

    fn current_volume(&mut self) -> AudioResult<f64> {
        (**self).current_volume()
    }

    fn set_volume(&mut self, volume: f64) -> AudioResult<()> {
        (**self).set_volume(volume)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
