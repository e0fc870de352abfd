//! Configuration management for the pinch volume controller

use crate::{
    audio::VolumeRange,
    constants::{
        DEFAULT_CURVE_EXPONENT, DEFAULT_DISTANCE_MAX, DEFAULT_DISTANCE_MIN, DEFAULT_DISTANCE_WINDOW,
        DEFAULT_MAX_HANDS, DEFAULT_MIN_DETECTION_CONFIDENCE, DEFAULT_MIN_TRACKING_CONFIDENCE,
        DEFAULT_MIN_UPDATE_INTERVAL_MS, DEFAULT_MIN_VOLUME_CHANGE, DEFAULT_VOLUME_WINDOW,
        DEFAULT_WINDOW_TITLE, INDEX_FINGER_TIP, NUM_HAND_LANDMARKS, SIMULATED_VOLUME_MAX,
        SIMULATED_VOLUME_MIN, THUMB_TIP,
    },
    smoothing::DistanceRange,
    volume_control::RateLimitPolicy,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pinch measurement and distance smoothing
    pub gesture: GestureConfig,

    /// Volume curve, smoothing and rate limiting
    pub volume: VolumeConfig,

    /// Hand landmark detector
    pub detector: DetectorConfig,

    /// Preview window
    pub display: DisplayConfig,

    /// Output device
    pub audio: AudioConfig,
}

/// Pinch measurement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Distance (pixels) mapped to minimum volume
    pub distance_min: f64,

    /// Distance (pixels) mapped to maximum volume
    pub distance_max: f64,

    /// Moving average window over raw distances
    pub distance_window: usize,

    /// Landmark id of the first pinch finger
    pub thumb_landmark: usize,

    /// Landmark id of the second pinch finger
    pub index_landmark: usize,
}

/// Volume mapping and write policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Exponent of the shaping curve applied to the normalized distance
    pub curve_exponent: f64,

    /// Moving average window over mapped volumes
    pub volume_window: usize,

    /// Minimum time between two writes to the device
    pub min_update_interval_ms: u64,

    /// Change in native units that must be exceeded before writing
    pub min_volume_change: f64,
}

/// MediaPipe subprocess settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Python interpreter with mediapipe installed
    pub python: PathBuf,

    /// Hand detection script speaking the JSON-lines protocol
    pub script: PathBuf,

    /// Maximum number of hands reported per frame
    pub max_hands: usize,

    /// Minimum detection confidence (0.0-1.0)
    pub min_detection_confidence: f32,

    /// Minimum tracking confidence (0.0-1.0)
    pub min_tracking_confidence: f32,
}

/// Preview configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the preview window
    pub gui: bool,

    /// Mirror the camera image before detection
    pub flip_horizontal: bool,

    /// Preview window title
    pub window_title: String,
}

/// Output device backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioBackend {
    /// In-memory volume, nothing audible changes
    Simulated,
    /// PulseAudio or PipeWire through `pactl`
    Pactl,
}

/// Output device configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Which backend drives the volume
    pub backend: AudioBackend,

    /// `pactl` sink name
    pub pactl_sink: String,

    /// Native range and starting level of the simulated sink
    pub simulated_min: f64,
    pub simulated_max: f64,
    pub simulated_initial: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            distance_min: DEFAULT_DISTANCE_MIN,
            distance_max: DEFAULT_DISTANCE_MAX,
            distance_window: DEFAULT_DISTANCE_WINDOW,
            thumb_landmark: THUMB_TIP,
            index_landmark: INDEX_FINGER_TIP,
        }
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            curve_exponent: DEFAULT_CURVE_EXPONENT,
            volume_window: DEFAULT_VOLUME_WINDOW,
            min_update_interval_ms: DEFAULT_MIN_UPDATE_INTERVAL_MS,
            min_volume_change: DEFAULT_MIN_VOLUME_CHANGE,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from(".venv/bin/python"),
            script: PathBuf::from("scripts/hand_detect.py"),
            max_hands: DEFAULT_MAX_HANDS,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: DEFAULT_MIN_TRACKING_CONFIDENCE,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            gui: true,
            flip_horizontal: true,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}

impl Default for AudioBackend {
    fn default() -> Self {
        Self::Simulated
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            backend: AudioBackend::default(),
            pactl_sink: crate::audio::pulse::DEFAULT_SINK.to_string(),
            simulated_min: SIMULATED_VOLUME_MIN,
            simulated_max: SIMULATED_VOLUME_MAX,
            simulated_initial: SIMULATED_VOLUME_MIN,
        }
    }
}

impl GestureConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` for a degenerate or non-finite range
    pub fn distance_range(&self) -> Result<DistanceRange> {
        DistanceRange::new(self.distance_min, self.distance_max)
    }
}

impl VolumeConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` for a negative change threshold
    pub fn rate_limit_policy(&self) -> Result<RateLimitPolicy> {
        RateLimitPolicy::new(
            Duration::from_millis(self.min_update_interval_ms),
            self.min_volume_change,
        )
    }
}

impl AudioConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty or non-finite range
    pub fn simulated_range(&self) -> Result<VolumeRange> {
        VolumeRange::new(self.simulated_min, self.simulated_max)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        self.gesture.distance_range()?;

        if self.gesture.distance_window == 0 {
            return Err(Error::ConfigError(
                "Distance window size must be greater than 0".to_string(),
            ));
        }
        for id in [self.gesture.thumb_landmark, self.gesture.index_landmark] {
            if id >= NUM_HAND_LANDMARKS {
                return Err(Error::ConfigError(format!(
                    "Landmark id {id} is outside the 21-point hand skeleton"
                )));
            }
        }
        if self.gesture.thumb_landmark == self.gesture.index_landmark {
            return Err(Error::ConfigError(
                "Pinch landmarks must be two different points".to_string(),
            ));
        }

        if !self.volume.curve_exponent.is_finite() || self.volume.curve_exponent <= 0.0 {
            return Err(Error::ConfigError(
                "Curve exponent must be greater than 0".to_string(),
            ));
        }
        if self.volume.volume_window == 0 {
            return Err(Error::ConfigError(
                "Volume window size must be greater than 0".to_string(),
            ));
        }
        self.volume.rate_limit_policy()?;

        if self.detector.max_hands == 0 {
            return Err(Error::ConfigError("Detector must report at least one hand".to_string()));
        }
        for (name, value) in [
            ("Detection confidence", self.detector.min_detection_confidence),
            ("Tracking confidence", self.detector.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ConfigError(format!("{name} must be between 0.0 and 1.0")));
            }
        }

        if self.audio.backend == AudioBackend::Simulated {
            self.audio.simulated_range()?;
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Pinch Volume Configuration

# Pinch measurement
gesture:
  distance_min: 0.0
  distance_max: 100.0
  distance_window: 3
  thumb_landmark: 4
  index_landmark: 8

# Volume curve and write policy
volume:
  curve_exponent: 0.5
  volume_window: 5
  min_update_interval_ms: 100
  min_volume_change: 0.03

# MediaPipe hand detector subprocess
detector:
  python: ".venv/bin/python"
  script: "scripts/hand_detect.py"
  max_hands: 1
  min_detection_confidence: 0.7
  min_tracking_confidence: 0.5

# Preview window
display:
  gui: true
  flip_horizontal: true
  window_title: "Hand Gesture Volume Control"

# Output device (simulated or pactl)
audio:
  backend: "simulated"
  pactl_sink: "@DEFAULT_SINK@"
  simulated_min: -65.25
  simulated_max: 0.0
  simulated_initial: -65.25
"#;
