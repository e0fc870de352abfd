//! Hand landmark types and the detector seam.
//!
//! A detector reports hands as ordered lists of 21 keypoints in frame-pixel
//! coordinates (MediaPipe hand topology: 0 is the wrist, 4 the thumb tip,
//! 8 the index finger tip). Only the first reported hand drives the volume.

use crate::{constants::NUM_HAND_LANDMARKS, Result};
use serde::{Deserialize, Serialize};

/// A single hand keypoint in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Position in the fixed hand topology (0-20)
    pub id: usize,
    /// Horizontal pixel coordinate
    pub x: f64,
    /// Vertical pixel coordinate
    pub y: f64,
}

impl Landmark {
    pub const fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Euclidean pixel distance to another landmark
    pub fn distance_to(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One detected hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    /// Build a hand from pixel points, numbering them in order
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self {
            landmarks: points
                .iter()
                .enumerate()
                .map(|(id, &(x, y))| Landmark::new(id, x, y))
                .collect(),
        }
    }

    /// True when the hand carries the full 21-point skeleton
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == NUM_HAND_LANDMARKS
    }
}

/// Landmarks available to the pipeline for the current frame.
///
/// Holds either the first detected hand or nothing. A hand with any count
/// other than 21 points is kept for drawing but is not usable for the pinch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandFrame {
    landmarks: Vec<Landmark>,
}

impl HandFrame {
    /// Frame with no hand in view
    pub fn empty() -> Self {
        Self::default()
    }

    /// Take the first hand of a detector result
    pub fn from_detections(hands: Vec<Hand>) -> Self {
        hands
            .into_iter()
            .next()
            .map_or_else(Self::empty, |hand| Self {
                landmarks: hand.landmarks,
            })
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Whether the gesture pipeline may run on this frame
    pub fn is_usable(&self) -> bool {
        self.landmarks.len() == NUM_HAND_LANDMARKS
    }

    /// Landmark at a topology position, only for usable frames
    pub fn get(&self, id: usize) -> Option<&Landmark> {
        if self.is_usable() {
            self.landmarks.get(id)
        } else {
            None
        }
    }
}

/// Source of hand landmarks for a frame of type `F`.
pub trait LandmarkSource<F> {
    /// Detect hands in `frame`. An empty list means no hand was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector itself failed for this frame
    fn detect(&mut self, frame: &F) -> Result<Vec<Hand>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_hand() -> Hand {
        let points: Vec<(f64, f64)> = (0..21).map(|i| (f64::from(i), 2.0 * f64::from(i))).collect();
        Hand::from_points(&points)
    }

    #[test]
    fn test_from_points_numbers_landmarks() {
        let hand = full_hand();
        assert!(hand.is_complete());
        assert_eq!(hand.landmarks[8], Landmark::new(8, 8.0, 16.0));
    }

    #[test]
    fn test_frame_uses_first_hand_only() {
        let second = Hand::from_points(&[(1.0, 1.0)]);
        let frame = HandFrame::from_detections(vec![full_hand(), second]);
        assert!(frame.is_usable());
        assert_eq!(frame.landmarks().len(), 21);
    }

    #[test]
    fn test_partial_hand_is_not_usable() {
        let frame = HandFrame::from_detections(vec![Hand::from_points(&[(0.0, 0.0); 20])]);
        assert!(!frame.is_usable());
        assert!(frame.get(4).is_none());
        assert_eq!(frame.landmarks().len(), 20);
    }

    #[test]
    fn test_empty_detection() {
        let frame = HandFrame::from_detections(Vec::new());
        assert_eq!(frame, HandFrame::empty());
        assert!(!frame.is_usable());
    }

    #[test]
    fn test_landmark_distance() {
        let a = Landmark::new(4, 0.0, 0.0);
        let b = Landmark::new(8, 3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }
}
