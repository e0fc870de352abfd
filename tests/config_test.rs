//! Loading, saving and validating configuration files

use pinch_volume::{
    config::{AudioBackend, Config, EXAMPLE_CONFIG},
    pipeline::VolumePipeline,
    Error,
};
use std::io::Write;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_example_config_loads_as_defaults() {
    let file = write_config(EXAMPLE_CONFIG);
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config, Config::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pinch.yaml");

    let mut config = Config::default();
    config.gesture.distance_min = 20.0;
    config.gesture.distance_max = 180.0;
    config.volume.min_update_interval_ms = 250;
    config.audio.backend = AudioBackend::Pactl;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let file = write_config("volume:\n  min_volume_change: 0.5\naudio:\n  backend: simulated\n");
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.volume.min_volume_change, 0.5);
    assert_eq!(config.gesture, Config::default().gesture);
    assert_eq!(config.volume.volume_window, 5);

    let policy = config.volume.rate_limit_policy().unwrap();
    assert_eq!(policy.min_interval, Duration::from_millis(100));
    assert_eq!(policy.min_change, 0.5);
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let file = write_config("gesture: [this is not a mapping\n");
    assert!(matches!(Config::from_file(file.path()), Err(Error::ConfigError(_))));
}

#[test]
fn test_unknown_backend_is_rejected() {
    let file = write_config("audio:\n  backend: alsa\n");
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Config::from_file(dir.path().join("absent.yaml")),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_inverted_distance_range_fails_validation() {
    let file = write_config("gesture:\n  distance_min: 120.0\n  distance_max: 30.0\n");
    let config = Config::from_file(file.path()).unwrap();
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
}

#[test]
fn test_loaded_config_drives_pipeline() {
    let file = write_config("gesture:\n  distance_min: 20.0\n  distance_max: 220.0\nvolume:\n  curve_exponent: 1.0\n");
    let config = Config::from_file(file.path()).unwrap();
    let native = config.audio.simulated_range().unwrap();
    let pipeline = VolumePipeline::from_config(&config, native).unwrap();

    let mapper = pipeline.mapper();
    assert_eq!(mapper.map(20.0).volume, native.min());
    assert_eq!(mapper.map(220.0).volume, native.max());
    assert!((mapper.map(120.0).shaped - 0.5).abs() < 1e-12);
}
