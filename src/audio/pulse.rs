use super::{AudioResult, AudioSink, VolumeRange};
use crate::error::AudioError;
use log::{debug, info};
use std::process::Command;

/// Sink name understood by `pactl` for the current default output
pub const DEFAULT_SINK: &str = "@DEFAULT_SINK@";

/// Default output of a PulseAudio or PipeWire server, driven through `pactl`.
///
/// Native units are percent of nominal volume, range 0 to 100.
#[derive(Debug, Clone)]
pub struct PulseAudioSink {
    sink: String,
    range: VolumeRange,
}

impl PulseAudioSink {
    /// Control the default sink
    pub fn new() -> Self {
        Self::with_sink(DEFAULT_SINK)
    }

    /// Control a named sink
    pub fn with_sink(sink: impl Into<String>) -> Self {
        let sink = sink.into();
        info!("Using pactl sink {}", sink);
        Self {
            sink,
            range: VolumeRange { min: 0.0, max: 100.0 },
        }
    }

    fn pactl(&self, args: &[&str]) -> AudioResult<String> {
        let output = Command::new("pactl")
            .args(args)
            .output()
            .map_err(|e| AudioError::Command(format!("failed to run pactl: {e}")))?;

        if !output.status.success() {
            return Err(AudioError::Command(format!(
                "pactl {} exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for PulseAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the first channel's percentage from `pactl get-sink-volume` output.
///
/// Expected shape:
/// `Volume: front-left: 42597 /  65% / -11.23 dB,   front-right: ...`
pub fn parse_volume_percent(output: &str) -> AudioResult<f64> {
    output
        .split_whitespace()
        .find_map(|token| token.strip_suffix('%'))
        .and_then(|number| number.parse::<f64>().ok())
        .ok_or_else(|| AudioError::Parse(output.trim().to_string()))
}

impl AudioSink for PulseAudioSink {
    fn volume_range(&mut self) -> AudioResult<VolumeRange> {
        Ok(self.range)
    }

    fn current_volume(&mut self) -> AudioResult<f64> {
        let output = self.pactl(&["get-sink-volume", &self.sink])?;
        parse_volume_percent(&output)
    }

    fn set_volume(&mut self, volume: f64) -> AudioResult<()> {
        let percent = format!("{:.2}%", self.range.clamp(volume));
        debug!("pactl set-sink-volume {} {}", self.sink, percent);
        self.pactl(&["set-sink-volume", &self.sink, &percent])?;
        Ok(())
    }

    fn name(&self) -> &str {
        "pactl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stereo_output() {
        let output = "Volume: front-left: 42597 /  65% / -11.23 dB,   front-right: 42597 /  65% / -11.23 dB\n        balance 0.00\n";
        assert_eq!(parse_volume_percent(output).unwrap(), 65.0);
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_volume_percent("No such entity").unwrap_err();
        assert!(matches!(err, AudioError::Parse(_)));
    }

    #[test]
    fn test_range_is_percent() {
        let mut sink = PulseAudioSink::with_sink("test");
        let range = sink.volume_range().unwrap();
        assert_eq!((range.min(), range.max()), (0.0, 100.0));
    }

    #[test]
    #[ignore = "Requires a running PulseAudio or PipeWire server"]
    fn test_reads_default_sink() {
        let mut sink = PulseAudioSink::new();
        let volume = sink.current_volume().unwrap();
        assert!(volume >= 0.0);
    }
}
