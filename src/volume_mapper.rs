//! Mapping a smoothed pinch distance onto the device's native volume range.
//!
//! The distance is normalized to `[0, 1]`, bent by a power curve so that the
//! low end of the pinch covers more of the audible range, and then
//! interpolated linearly into `[native_min, native_max]`.

use crate::{
    audio::VolumeRange,
    constants::DEFAULT_CURVE_EXPONENT,
    smoothing::DistanceRange,
    utils::lerp,
    Error, Result,
};

/// Intermediate values of one mapping, kept for the overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMapping {
    /// Distance normalized to `[0, 1]`
    pub normalized: f64,
    /// Normalized value after the shaping curve, in `[0, 1]`
    pub shaped: f64,
    /// Volume command in native units
    pub volume: f64,
}

impl VolumeMapping {
    /// Shaped value as a percentage of the gesture range
    pub fn gesture_percent(&self) -> f64 {
        self.shaped * 100.0
    }
}

/// Distance to native volume transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMapper {
    distance: DistanceRange,
    native: VolumeRange,
    exponent: f64,
}

impl VolumeMapper {
    /// # Errors
    ///
    /// Returns `ConfigError` if the curve exponent is not a positive finite number
    pub fn new(distance: DistanceRange, native: VolumeRange, exponent: f64) -> Result<Self> {
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(Error::ConfigError(format!(
                "Curve exponent must be positive and finite, got {exponent}"
            )));
        }
        Ok(Self {
            distance,
            native,
            exponent,
        })
    }

    /// Mapper with the default square-root curve
    pub fn with_default_curve(distance: DistanceRange, native: VolumeRange) -> Self {
        Self {
            distance,
            native,
            exponent: DEFAULT_CURVE_EXPONENT,
        }
    }

    pub const fn native_range(&self) -> VolumeRange {
        self.native
    }

    pub const fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Position of `distance` within the operating range, clamped to `[0, 1]`
    pub fn normalize(&self, distance: f64) -> f64 {
        let t = (distance - self.distance.min()) / self.distance.span();
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, 1.0)
        }
    }

    /// Apply the power curve to a normalized value
    pub fn shape(&self, normalized: f64) -> f64 {
        normalized.powf(self.exponent)
    }

    /// Interpolate a shaped value into native units
    pub fn to_native(&self, shaped: f64) -> f64 {
        lerp(shaped, self.native.min(), self.native.max())
    }

    /// Run the full transform for one smoothed distance
    pub fn map(&self, distance: f64) -> VolumeMapping {
        let normalized = self.normalize(distance);
        let shaped = self.shape(normalized);
        VolumeMapping {
            normalized,
            shaped,
            volume: self.to_native(shaped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mapper() -> VolumeMapper {
        VolumeMapper::with_default_curve(
            DistanceRange::default(),
            VolumeRange::new(-65.25, 0.0).unwrap(),
        )
    }

    #[test]
    fn test_boundaries_are_exact() {
        let mapper = mapper();
        assert_eq!(mapper.map(0.0).volume, -65.25);
        assert_eq!(mapper.map(100.0).volume, 0.0);
    }

    #[test]
    fn test_square_root_curve() {
        let mapping = mapper().map(25.0);
        assert_eq!(mapping.normalized, 0.25);
        assert_eq!(mapping.shaped, 0.5);
        assert!((mapping.volume - -32.625).abs() < 1e-12);
        assert_eq!(mapping.gesture_percent(), 50.0);
    }

    #[test]
    fn test_custom_exponent() {
        let mapper = VolumeMapper::new(
            DistanceRange::default(),
            VolumeRange::new(0.0, 100.0).unwrap(),
            1.0,
        )
        .unwrap();
        assert!((mapper.map(40.0).volume - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_exponent_rejected() {
        let native = VolumeRange::new(0.0, 1.0).unwrap();
        assert!(VolumeMapper::new(DistanceRange::default(), native, 0.0).is_err());
        assert!(VolumeMapper::new(DistanceRange::default(), native, -0.5).is_err());
        assert!(VolumeMapper::new(DistanceRange::default(), native, f64::NAN).is_err());
    }

    #[test]
    fn test_out_of_range_distance_is_clamped() {
        let mapper = mapper();
        assert_eq!(mapper.map(-10.0).volume, -65.25);
        assert_eq!(mapper.map(1000.0).volume, 0.0);
    }

    proptest! {
        #[test]
        fn prop_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let (d1, d2) = if a <= b { (a, b) } else { (b, a) };
            let mapper = mapper();
            prop_assert!(mapper.map(d1).volume <= mapper.map(d2).volume);
        }

        #[test]
        fn prop_stays_in_native_range(d in -1.0e4f64..1.0e4) {
            let volume = mapper().map(d).volume;
            prop_assert!((-65.25..=0.0).contains(&volume));
        }
    }
}
