//! Per-frame control pipeline: pinch distance in, volume command out.

use crate::{
    audio::{AudioSink, VolumeRange},
    config::Config,
    gesture::{PinchExtractor, PinchSample},
    landmarks::HandFrame,
    smoothing::DistanceSmoother,
    volume_control::{VolumeController, VolumeDecision},
    volume_mapper::{VolumeMapper, VolumeMapping},
    Result,
};
use log::debug;
use std::time::Instant;

/// Everything the pipeline computed for one frame with a usable hand
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub pinch: PinchSample,
    /// Window mean of the raw distance, clamped to the operating range
    pub smoothed_distance: f64,
    pub mapping: VolumeMapping,
    pub decision: VolumeDecision,
}

/// Owns the smoothing windows and the rate-limit state for one run
#[derive(Debug, Clone)]
pub struct VolumePipeline {
    extractor: PinchExtractor,
    distance: DistanceSmoother,
    mapper: VolumeMapper,
    controller: VolumeController,
}

impl VolumePipeline {
    pub fn new(
        extractor: PinchExtractor,
        distance: DistanceSmoother,
        mapper: VolumeMapper,
        controller: VolumeController,
    ) -> Self {
        Self {
            extractor,
            distance,
            mapper,
            controller,
        }
    }

    /// Build a pipeline for a device with the given native range
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid
    pub fn from_config(config: &Config, native: VolumeRange) -> Result<Self> {
        config.validate()?;

        let range = config.gesture.distance_range()?;
        Ok(Self::new(
            PinchExtractor::new(config.gesture.thumb_landmark, config.gesture.index_landmark),
            DistanceSmoother::new(config.gesture.distance_window, range),
            VolumeMapper::new(range, native, config.volume.curve_exponent)?,
            VolumeController::new(config.volume.volume_window, config.volume.rate_limit_policy()?),
        ))
    }

    /// Pipeline with default settings for a device range
    pub fn with_defaults(native: VolumeRange) -> Self {
        let distance = DistanceSmoother::default();
        let mapper = VolumeMapper::with_default_curve(distance.range(), native);
        Self::new(PinchExtractor::default(), distance, mapper, VolumeController::default())
    }

    /// Run one frame. Returns `None`, touching no state, when there is no usable hand.
    pub fn process<S: AudioSink + ?Sized>(&mut self, frame: &HandFrame, now: Instant, sink: &mut S) -> Option<PipelineOutput> {
        let pinch = self.extractor.extract(frame)?;
        let smoothed_distance = self.distance.update(pinch.distance);
        let mapping = self.mapper.map(smoothed_distance);
        let decision = self.controller.offer(mapping.volume, now, sink);

        debug!(
            "pinch {:.1}px smoothed {:.1}px -> {:.3} (smoothed {:.3}, {:?})",
            pinch.distance, smoothed_distance, mapping.volume, decision.smoothed, decision.outcome
        );

        Some(PipelineOutput {
            pinch,
            smoothed_distance,
            mapping,
            decision,
        })
    }

    pub const fn mapper(&self) -> &VolumeMapper {
        &self.mapper
    }

    pub const fn distance_smoother(&self) -> &DistanceSmoother {
        &self.distance
    }

    pub const fn controller(&self) -> &VolumeController {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::SimulatedSink, landmarks::Hand, volume_control::CommitOutcome};
    use std::time::Duration;

    fn pinch_frame(distance: f64) -> HandFrame {
        let mut points = vec![(200.0, 200.0); 21];
        points[4] = (100.0, 100.0);
        points[8] = (100.0 + distance, 100.0);
        HandFrame::from_detections(vec![Hand::from_points(&points)])
    }

    fn native() -> VolumeRange {
        VolumeRange::new(-65.25, 0.0).unwrap()
    }

    #[test]
    fn test_full_pinch_reaches_max() {
        let mut pipeline = VolumePipeline::with_defaults(native());
        let mut sink = SimulatedSink::new(native(), -65.25);

        let out = pipeline.process(&pinch_frame(150.0), Instant::now(), &mut sink).unwrap();
        assert_eq!(out.smoothed_distance, 100.0);
        assert_eq!(out.mapping.volume, 0.0);
        assert_eq!(out.decision.outcome, CommitOutcome::Committed);
        assert_eq!(sink.volume(), 0.0);
    }

    #[test]
    fn test_no_hand_leaves_state_alone() {
        let mut pipeline = VolumePipeline::with_defaults(native());
        let mut sink = SimulatedSink::new(native(), -20.0);

        assert!(pipeline.process(&HandFrame::empty(), Instant::now(), &mut sink).is_none());
        assert!(pipeline.distance_smoother().window().is_empty());
        assert!(pipeline.controller().window().is_empty());
        assert!(sink.writes().is_empty());
    }

    #[test]
    fn test_from_config_rejects_degenerate_range() {
        let mut config = Config::default();
        config.gesture.distance_min = 40.0;
        config.gesture.distance_max = 40.0;
        assert!(VolumePipeline::from_config(&config, native()).is_err());
    }

    #[test]
    fn test_from_config_honours_custom_landmarks() {
        let mut config = Config::default();
        config.gesture.index_landmark = 12;
        let mut pipeline = VolumePipeline::from_config(&config, native()).unwrap();
        let mut sink = SimulatedSink::new(native(), 0.0);

        // Index tip moved, middle tip (12) still at the default position
        let out = pipeline
            .process(&pinch_frame(30.0), Instant::now() + Duration::from_secs(1), &mut sink)
            .unwrap();
        assert!((out.pinch.distance - 100.0 * 2f64.sqrt()).abs() < 1e-9);
    }
}
