//! Distance smoothing: a short moving average clamped to the operating range.

use crate::{
    constants::{DEFAULT_DISTANCE_MAX, DEFAULT_DISTANCE_MIN, DEFAULT_DISTANCE_WINDOW},
    filters::{moving_average::MovingAverageFilter, SignalFilter},
    Error, Result,
};

/// Pinch distances (pixels) that map to the ends of the volume range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRange {
    min: f64,
    max: f64,
}

impl DistanceRange {
    /// # Errors
    ///
    /// Returns `ConfigError` unless both ends are finite and `max > min`
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::ConfigError(format!(
                "Distance range must be finite, got [{min}, {max}]"
            )));
        }
        if max <= min {
            return Err(Error::ConfigError(format!(
                "Distance range is degenerate: max ({max}) must exceed min ({min})"
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

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, distance: f64) -> f64 {
        distance.clamp(self.min, self.max)
    }
}

impl Default for DistanceRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_DISTANCE_MIN,
            max: DEFAULT_DISTANCE_MAX,
        }
    }
}

/// Moving average over raw pinch distances, clamped into a [`DistanceRange`]
#[derive(Debug, Clone)]
pub struct DistanceSmoother {
    window: MovingAverageFilter,
    range: DistanceRange,
}

impl Default for DistanceSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_DISTANCE_WINDOW, DistanceRange::default())
    }
}

impl DistanceSmoother {
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize, range: DistanceRange) -> Self {
        Self {
            window: MovingAverageFilter::new(window_size),
            range,
        }
    }

    /// Push a raw distance and return the clamped window mean
    pub fn update(&mut self, raw_distance: f64) -> f64 {
        let mean = self.window.apply(raw_distance);
        // NaN from a bad sample would survive f64::clamp
        if mean.is_nan() {
            return self.range.min();
        }
        self.range.clamp(mean)
    }

    pub const fn range(&self) -> DistanceRange {
        self.range
    }

    pub const fn window(&self) -> &MovingAverageFilter {
        &self.window
    }

    pub fn reset(&mut self) {
        self.window.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_degenerate_range_rejected() {
        assert!(DistanceRange::new(50.0, 50.0).is_err());
        assert!(DistanceRange::new(80.0, 20.0).is_err());
        assert!(DistanceRange::new(0.0, f64::INFINITY).is_err());
        assert!(DistanceRange::new(10.0, 90.0).is_ok());
    }

    #[test]
    fn test_averages_last_three() {
        let mut smoother = DistanceSmoother::default();
        assert_eq!(smoother.update(30.0), 30.0);
        assert_eq!(smoother.update(60.0), 45.0);
        assert_eq!(smoother.update(90.0), 60.0);
        assert_eq!(smoother.update(0.0), 50.0);
        assert_eq!(smoother.window().len(), 3);
    }

    #[test]
    fn test_clamps_to_operating_range() {
        let mut smoother = DistanceSmoother::default();
        assert_eq!(smoother.update(450.0), 100.0);

        let mut smoother = DistanceSmoother::new(3, DistanceRange::new(20.0, 80.0).unwrap());
        assert_eq!(smoother.update(5.0), 20.0);
    }

    #[test]
    fn test_nan_sample_maps_to_min() {
        let mut smoother = DistanceSmoother::default();
        assert_eq!(smoother.update(f64::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn prop_output_within_range(samples in prop::collection::vec(-1.0e6f64..1.0e6, 1..40)) {
            let mut smoother = DistanceSmoother::default();
            for sample in samples {
                let out = smoother.update(sample);
                prop_assert!((0.0..=100.0).contains(&out));
                prop_assert!(smoother.window().len() <= 3);
            }
        }

        #[test]
        fn prop_window_evicts_oldest(samples in prop::collection::vec(0.0f64..500.0, 4..20)) {
            let mut smoother = DistanceSmoother::default();
            for sample in &samples {
                smoother.update(*sample);
            }
            let held: Vec<f64> = smoother.window().samples().collect();
            prop_assert_eq!(held, samples[samples.len() - 3..].to_vec());
        }
    }
}
