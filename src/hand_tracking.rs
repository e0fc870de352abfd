//! Hand landmark detection through a MediaPipe subprocess.
//!
//! The helper script (`scripts/hand_detect.py`) prints `READY` once its model
//! is loaded. For each frame it receives a header of three little-endian
//! `u32` values (width, height, channels) followed by the raw BGR bytes, and
//! answers with one JSON line:
//!
//! ```text
//! {"hands": [{"score": 0.93, "landmarks": [{"x": 0.41, "y": 0.52}, ...]}], "error": null}
//! ```
//!
//! Coordinates in the reply are normalized to the image size; they are
//! converted to whole pixels here.

use crate::{
    config::DetectorConfig,
    landmarks::{Hand, Landmark},
    Error, Result,
};
use log::{debug, info, warn};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdout, Command, Stdio};

#[derive(Deserialize, Debug)]
struct PointJson {
    x: f64,
    y: f64,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    score: f32,
    landmarks: Vec<PointJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResponse {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode one reply line into pixel-space hands.
///
/// A reply carrying an `error` field is logged and treated as no hands.
///
/// # Errors
///
/// Returns an error if the line is not valid JSON for the protocol
pub fn parse_response(line: &str, width: u32, height: u32) -> Result<Vec<Hand>> {
    let response: DetectionResponse = serde_json::from_str(line.trim())?;

    if let Some(error) = response.error {
        warn!("Hand detector reported: {}", error);
        return Ok(Vec::new());
    }

    let (w, h) = (f64::from(width), f64::from(height));
    Ok(response
        .hands
        .into_iter()
        .map(|hand| {
            debug!("Hand detected with score {:.2}", hand.score);
            Hand {
                landmarks: hand
                    .landmarks
                    .iter()
                    .enumerate()
                    .map(|(id, p)| Landmark::new(id, (p.x * w).trunc(), (p.y * h).trunc()))
                    .collect(),
            }
        })
        .collect())
}

/// MediaPipe hand landmarker running in a child process
pub struct HandTracker {
    process: Child,
    stdout: BufReader<ChildStdout>,
    line: String,
    /// Set once an exchange failed midway; the pipe no longer lines up with frames
    broken: bool,
}

impl HandTracker {
    /// Start the helper script and wait for it to report ready
    ///
    /// # Errors
    ///
    /// Returns `Detector` if the script is missing, fails to start, or does
    /// not signal readiness
    pub fn spawn(config: &DetectorConfig) -> Result<Self> {
        if !config.script.exists() {
            return Err(Error::Detector(format!(
                "Hand detection script not found: {}",
                config.script.display()
            )));
        }

        info!("Starting MediaPipe hand detector: {}", config.script.display());
        let mut command = Command::new(&config.python);
        command
            .arg(&config.script)
            .arg("--max-hands")
            .arg(config.max_hands.to_string())
            .arg("--min-detection-confidence")
            .arg(config.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(config.min_tracking_confidence.to_string());

        let tracker = Self::start(command)
            .map_err(|e| Error::Detector(format!("Failed to start {}: {e}", config.python.display())))?;
        info!("MediaPipe hand detector ready");
        Ok(tracker)
    }

    /// Run `command` as the detector and wait for its `READY` line
    fn start(mut command: Command) -> Result<Self> {
        let mut process = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::Detector("Detector stdout not captured".to_string()))?;
        let mut tracker = Self {
            process,
            stdout: BufReader::new(stdout),
            line: String::new(),
            broken: false,
        };

        tracker.stdout.read_line(&mut tracker.line)?;
        if tracker.line.trim() != "READY" {
            return Err(Error::Detector(format!(
                "Detector did not signal ready, got: {}",
                tracker.line.trim()
            )));
        }
        Ok(tracker)
    }

    /// Send one raw BGR image and read back the detected hands
    ///
    /// # Errors
    ///
    /// Returns an error if the subprocess pipe breaks or replies with garbage.
    /// After a broken pipe every later call fails with `Detector`.
    pub fn detect_raw(&mut self, width: u32, height: u32, channels: u32, data: &[u8]) -> Result<Vec<Hand>> {
        if self.broken {
            return Err(Error::Detector(
                "Detector pipe is out of sync after an earlier failure".to_string(),
            ));
        }

        if let Err(e) = self.exchange(width, height, channels, data) {
            self.broken = true;
            warn!("Hand detector connection lost: {}", e);
            return Err(e);
        }

        parse_response(&self.line, width, height)
    }

    /// Write one frame and read its reply line into `self.line`
    fn exchange(&mut self, width: u32, height: u32, channels: u32, data: &[u8]) -> Result<()> {
        let stdin = self
            .process
            .stdin
            .as_mut()
            .ok_or_else(|| Error::Detector("Detector stdin not captured".to_string()))?;

        stdin.write_all(&width.to_le_bytes())?;
        stdin.write_all(&height.to_le_bytes())?;
        stdin.write_all(&channels.to_le_bytes())?;
        stdin.write_all(data)?;
        stdin.flush()?;

        self.line.clear();
        if self.stdout.read_line(&mut self.line)? == 0 {
            return Err(Error::Detector("Detector exited unexpectedly".to_string()));
        }
        Ok(())
    }
}

#[cfg(feature = "camera")]
impl crate::landmarks::LandmarkSource<opencv::core::Mat> for HandTracker {
    fn detect(&mut self, frame: &opencv::core::Mat) -> Result<Vec<Hand>> {
        use opencv::prelude::*;

        if frame.empty() {
            return Ok(Vec::new());
        }

        let to_u32 = |v: i32| u32::try_from(v).map_err(|_| Error::InvalidInput(format!("Invalid frame dimension {v}")));
        let (width, height, channels) = (to_u32(frame.cols())?, to_u32(frame.rows())?, to_u32(frame.channels())?);

        self.detect_raw(width, height, channels, frame.data_bytes()?)
    }
}

impl Drop for HandTracker {
    fn drop(&mut self) {
        // Closing stdin lets the script exit on its own; kill covers a hung model
        drop(self.process.stdin.take());
        if let Err(e) = self.process.kill() {
            debug!("Detector already stopped: {}", e);
        }
        let _ = self.process.wait();
        info!("Hand detector stopped");
    }
}
