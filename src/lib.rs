//! Pinch gesture volume control.
//!
//! This library turns the distance between the thumb and index fingertips,
//! as seen by a camera, into the system output volume:
//! - a hand landmark detector reports 21 keypoints per frame
//! - the thumb/index distance is smoothed and clamped to an operating range
//! - a square-root curve maps it onto the device's native volume range
//! - a second moving average plus a rate limiter decide when to write
//!
//! The camera, the detector, the preview and the audio device all sit behind
//! traits, so the pipeline runs the same against a webcam or a recording.
//!
//! # Examples
//!
//! ## Driving the pipeline directly
//!
//! ```
//! use pinch_volume::{
//!     audio::{SimulatedSink, VolumeRange},
//!     landmarks::{Hand, HandFrame},
//!     pipeline::VolumePipeline,
//! };
//! use std::time::Instant;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let range = VolumeRange::new(-65.25, 0.0)?;
//! let mut sink = SimulatedSink::new(range, -65.25);
//! let mut pipeline = VolumePipeline::with_defaults(range);
//!
//! // Thumb tip (4) and index tip (8) 100 pixels apart
//! let mut points = vec![(0.0, 0.0); 21];
//! points[8] = (100.0, 0.0);
//! let frame = HandFrame::from_detections(vec![Hand::from_points(&points)]);
//!
//! let output = pipeline.process(&frame, Instant::now(), &mut sink).expect("hand in view");
//! assert_eq!(output.mapping.volume, 0.0);
//! assert!(output.decision.outcome.is_committed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying a recording
//!
//! ```no_run
//! use pinch_volume::{
//!     audio::{SimulatedSink, VolumeRange},
//!     config::Config,
//!     control_loop::{ControlLoop, FrameClock, HeadlessPresenter},
//!     replay::{ReplayDetector, ReplaySource},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = SimulatedSink::new(VolumeRange::new(-65.25, 0.0)?, -65.25);
//! let mut control = ControlLoop::new(
//!     ReplaySource::from_file("session.jsonl")?,
//!     ReplayDetector,
//!     sink,
//!     HeadlessPresenter::with_ctrlc()?,
//!     &Config::default(),
//! )?
//! .with_clock(FrameClock::from_fps(30.0)?);
//!
//! let report = control.run()?;
//! println!("{} frames, {} volume writes", report.frames, report.commits);
//! # Ok(())
//! # }
//! ```

/// Audio sink trait and backends
pub mod audio;

/// Webcam frame source
#[cfg(feature = "camera")]
pub mod camera;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Frame loop and its seams
pub mod control_loop;

/// Error types and result handling
pub mod error;

/// Scalar smoothing filters
pub mod filters;

/// Pinch distance extraction
pub mod gesture;

/// MediaPipe hand detector subprocess
pub mod hand_tracking;

/// Hand landmark types
pub mod landmarks;

/// Preview view model
pub mod overlay;

/// Per-frame control pipeline
pub mod pipeline;

/// OpenCV preview window
#[cfg(feature = "camera")]
pub mod preview;

/// Recorded landmark streams
pub mod replay;

/// Distance smoothing and clamping
pub mod smoothing;

/// Numeric helpers
pub mod utils;

/// Volume smoothing and rate limiting
pub mod volume_control;

/// Distance to volume mapping
pub mod volume_mapper;

pub use error::{AudioError, Error, Result};
