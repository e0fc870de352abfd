//! Signal filtering for the per-frame pinch measurements.
//!
//! Both the raw pinch distance and the mapped volume are noisy frame to
//! frame; the filters here smooth them before they drive the audio device.

/// Moving average filter over a bounded FIFO window
pub mod moving_average;

/// Trait for scalar signal filters
pub trait SignalFilter: Send + Sync {
    /// Feed one sample and return the filtered value
    fn apply(&mut self, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}
