//! Pinch distance extraction.

use crate::{
    constants::{INDEX_FINGER_TIP, THUMB_TIP},
    landmarks::{HandFrame, Landmark},
};

/// One pinch measurement: the two fingertips and the pixel distance between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSample {
    pub thumb: Landmark,
    pub index: Landmark,
    /// Raw Euclidean distance in pixels, always >= 0
    pub distance: f64,
}

impl PinchSample {
    /// Midpoint between the fingertips, in pixels
    pub fn midpoint(&self) -> (f64, f64) {
        ((self.thumb.x + self.index.x) / 2.0, (self.thumb.y + self.index.y) / 2.0)
    }
}

/// Selects the two designated landmarks and measures the pinch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinchExtractor {
    first: usize,
    second: usize,
}

impl Default for PinchExtractor {
    fn default() -> Self {
        Self::new(THUMB_TIP, INDEX_FINGER_TIP)
    }
}

impl PinchExtractor {
    pub const fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }

    /// Measure the pinch, or `None` when the frame has no usable hand
    pub fn extract(&self, frame: &HandFrame) -> Option<PinchSample> {
        let thumb = *frame.get(self.first)?;
        let index = *frame.get(self.second)?;
        Some(PinchSample {
            thumb,
            index,
            distance: thumb.distance_to(&index),
        })
    }
}
