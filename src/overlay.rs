//! What the live preview shows for a frame, independent of how it is drawn.

use crate::{
    audio::VolumeRange,
    constants::{LEVEL_LOW_PERCENT, LEVEL_MEDIUM_PERCENT, VOLUME_BAR_BOTTOM, VOLUME_BAR_TOP},
    gesture::PinchSample,
    landmarks::{HandFrame, Landmark},
    pipeline::PipelineOutput,
    utils::interp,
    volume_control::CommitOutcome,
};

/// Colour band of the volume bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelBand {
    /// Below 30 %
    Low,
    /// 30 % up to 70 %
    Medium,
    /// 70 % and above
    High,
}

impl LevelBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent < LEVEL_LOW_PERCENT {
            Self::Low
        } else if percent < LEVEL_MEDIUM_PERCENT {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Gesture readout for a frame with a usable hand
#[derive(Debug, Clone, PartialEq)]
pub struct GestureView {
    pub pinch: PinchSample,
    pub smoothed_distance: f64,
    /// Shaped gesture position as a percentage
    pub gesture_percent: f64,
    /// Device volume as a percentage of its native range
    pub system_percent: f64,
    /// Top edge of the filled volume bar, in pixels
    pub bar_top: f64,
    pub level: LevelBand,
    pub outcome: CommitOutcome,
}

/// Preview content for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameView {
    /// Landmarks to draw, possibly an incomplete hand
    pub landmarks: Vec<Landmark>,
    /// Present only when the pipeline ran this frame
    pub gesture: Option<GestureView>,
}

impl FrameView {
    /// Assemble the view. `system_volume` is the device reading, `None` if it failed,
    /// in which case the gesture percentage stands in for it.
    pub fn build(
        frame: &HandFrame,
        output: Option<&PipelineOutput>,
        system_volume: Option<f64>,
        native: VolumeRange,
    ) -> Self {
        let gesture = output.map(|out| {
            let gesture_percent = out.mapping.gesture_percent();
            let system_percent = system_volume
                .map_or(gesture_percent, |v| interp(v, (native.min(), native.max()), (0.0, 100.0)));

            GestureView {
                pinch: out.pinch,
                smoothed_distance: out.smoothed_distance,
                gesture_percent,
                system_percent,
                bar_top: interp(out.mapping.shaped, (0.0, 1.0), (VOLUME_BAR_BOTTOM, VOLUME_BAR_TOP)),
                level: LevelBand::from_percent(system_percent),
                outcome: out.decision.outcome.clone(),
            }
        });

        Self {
            landmarks: frame.landmarks().to_vec(),
            gesture,
        }
    }
}
