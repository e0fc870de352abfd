//! Error types for the pinch volume library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[cfg(feature = "camera")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failed (replay files, detector protocol)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration could not be parsed or serialized
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error, raised before the control loop starts
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Hand landmark detector failed
    #[error("Detector error: {0}")]
    Detector(String),

    /// Camera could not be opened or read
    #[error("Camera error: {0}")]
    Camera(String),

    /// Audio sink operation failed
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
}

/// Failures reported by an audio sink.
///
/// These are transient from the control loop's point of view: a failed read
/// or write drops that frame's volume update and nothing else.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// External mixer command could not be run or exited non-zero
    #[error("mixer command failed: {0}")]
    Command(String),

    /// Mixer output could not be understood
    #[error("unexpected mixer output: {0}")]
    Parse(String),

    /// Device is not reachable right now
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
