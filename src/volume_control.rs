//! Volume smoothing and rate-limited commits to the audio sink.
//!
//! Every frame's mapped volume goes through a moving average. The smoothed
//! value is only written to the device when enough time has passed since the
//! previous write and it differs from the last committed volume by more
//! than a small threshold. Before the first write the device's own reading
//! is the reference. Sink errors drop the update for that frame and
//! leave the rate-limit state untouched, so the next frame simply tries again.

use crate::{
    audio::{AudioResult, AudioSink},
    constants::{DEFAULT_MIN_UPDATE_INTERVAL_MS, DEFAULT_MIN_VOLUME_CHANGE, DEFAULT_VOLUME_WINDOW},
    error::AudioError,
    filters::{moving_average::MovingAverageFilter, SignalFilter},
    Error, Result,
};
use log::{debug, info};
use std::time::{Duration, Instant};

/// When a smoothed volume may be written to the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitPolicy {
    /// Minimum time between two writes
    pub min_interval: Duration,
    /// Change (native units) that must be exceeded before writing
    pub min_change: f64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(DEFAULT_MIN_UPDATE_INTERVAL_MS),
            min_change: DEFAULT_MIN_VOLUME_CHANGE,
        }
    }
}

impl RateLimitPolicy {
    /// # Errors
    ///
    /// Returns `ConfigError` if `min_change` is negative or not finite
    pub fn new(min_interval: Duration, min_change: f64) -> Result<Self> {
        if !min_change.is_finite() || min_change < 0.0 {
            return Err(Error::ConfigError(format!(
                "Minimum volume change must be a non-negative number, got {min_change}"
            )));
        }
        Ok(Self {
            min_interval,
            min_change,
        })
    }
}

/// Record of the last successful write
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateLimitState {
    /// When the last write happened, `None` before the first one
    pub last_commit: Option<Instant>,
    /// Value of the last write in native units
    pub last_volume: Option<f64>,
}

/// What happened to a frame's smoothed volume
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Written to the device
    Committed,
    /// Too soon after the previous write
    RateLimited,
    /// Within the change threshold of the last committed volume
    BelowThreshold,
    /// Device read or write failed, update dropped for this frame
    SinkUnavailable(AudioError),
}

impl CommitOutcome {
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Result of offering one candidate volume
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeDecision {
    /// Moving average including this frame's candidate
    pub smoothed: f64,
    pub outcome: CommitOutcome,
}

/// Moving average over mapped volumes plus the commit gate
#[derive(Debug, Clone)]
pub struct VolumeController {
    window: MovingAverageFilter,
    policy: RateLimitPolicy,
    state: RateLimitState,
}

impl Default for VolumeController {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME_WINDOW, RateLimitPolicy::default())
    }
}

impl VolumeController {
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize, policy: RateLimitPolicy) -> Self {
        Self {
            window: MovingAverageFilter::new(window_size),
            policy,
            state: RateLimitState::default(),
        }
    }

    pub const fn state(&self) -> &RateLimitState {
        &self.state
    }

    pub const fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    pub const fn window(&self) -> &MovingAverageFilter {
        &self.window
    }

    /// Smooth `candidate` and write it to `sink` if the policy allows
    pub fn offer<S: AudioSink + ?Sized>(&mut self, candidate: f64, now: Instant, sink: &mut S) -> VolumeDecision {
        let smoothed = self.window.apply(candidate);

        if !self.interval_elapsed(now) {
            return VolumeDecision {
                smoothed,
                outcome: CommitOutcome::RateLimited,
            };
        }

        let outcome = match self.try_commit(smoothed, now, sink) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("Dropping volume update for this frame: {}", e);
                CommitOutcome::SinkUnavailable(e)
            }
        };

        VolumeDecision { smoothed, outcome }
    }

    fn interval_elapsed(&self, now: Instant) -> bool {
        self.state
            .last_commit
            .map_or(true, |last| now.saturating_duration_since(last) >= self.policy.min_interval)
    }

    fn try_commit<S: AudioSink + ?Sized>(&mut self, smoothed: f64, now: Instant, sink: &mut S) -> AudioResult<CommitOutcome> {
        // Devices may read back quantized values, so only the first write compares against a reading
        let reference = match self.state.last_volume {
            Some(volume) => volume,
            None => sink.current_volume()?,
        };
        if (smoothed - reference).abs() <= self.policy.min_change {
            return Ok(CommitOutcome::BelowThreshold);
        }

        sink.set_volume(smoothed)?;
        self.state = RateLimitState {
            last_commit: Some(now),
            last_volume: Some(smoothed),
        };
        info!("Volume set to {:.2} (was {:.2}) on {}", smoothed, reference, sink.name());
        Ok(CommitOutcome::Committed)
    }

    /// Forget smoothing history and the last commit
    pub fn reset(&mut self) {
        self.window.reset();
        self.state = RateLimitState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{SimulatedSink, VolumeRange};

    fn sink(initial: f64) -> SimulatedSink {
        SimulatedSink::new(VolumeRange::new(-65.25, 0.0).unwrap(), initial)
    }

    #[test]
    fn test_first_offer_commits() {
        let mut controller = VolumeController::default();
        let mut sink = sink(0.0);
        let now = Instant::now();

        let decision = controller.offer(-30.0, now, &mut sink);
        assert_eq!(decision.smoothed, -30.0);
        assert_eq!(decision.outcome, CommitOutcome::Committed);
        assert_eq!(sink.volume(), -30.0);
        assert_eq!(controller.state().last_commit, Some(now));
        assert_eq!(controller.state().last_volume, Some(-30.0));
    }

    #[test]
    fn test_rate_limited_within_interval() {
        let mut controller = VolumeController::default();
        let mut sink = sink(0.0);
        let start = Instant::now();

        assert!(controller.offer(-30.0, start, &mut sink).outcome.is_committed());
        let decision = controller.offer(-60.0, start + Duration::from_millis(99), &mut sink);
        assert_eq!(decision.outcome, CommitOutcome::RateLimited);
        assert_eq!(decision.smoothed, -45.0);
        assert_eq!(sink.writes().len(), 1);

        let decision = controller.offer(-60.0, start + Duration::from_millis(100), &mut sink);
        assert!(decision.outcome.is_committed());
        assert_eq!(sink.writes().len(), 2);
    }

    #[test]
    fn test_small_change_is_suppressed() {
        let mut controller = VolumeController::new(1, RateLimitPolicy::default());
        let mut sink = sink(-10.0);

        let decision = controller.offer(-10.02, Instant::now(), &mut sink);
        assert_eq!(decision.outcome, CommitOutcome::BelowThreshold);
        assert!(sink.writes().is_empty());
        assert_eq!(*controller.state(), RateLimitState::default());
    }

    #[test]
    fn test_change_equal_to_threshold_is_suppressed() {
        let mut controller = VolumeController::new(1, RateLimitPolicy::default());
        let mut sink = sink(-10.0);
        let start = Instant::now();

        assert!(controller.offer(0.0, start, &mut sink).outcome.is_committed());

        let decision = controller.offer(-0.03, start + Duration::from_millis(100), &mut sink);
        assert_eq!(decision.outcome, CommitOutcome::BelowThreshold);
        assert_eq!(sink.writes(), &[0.0]);

        let decision = controller.offer(-0.031, start + Duration::from_millis(200), &mut sink);
        assert!(decision.outcome.is_committed());
        assert_eq!(sink.writes(), &[0.0, -0.031]);
    }

    /// Sink that applies writes exactly but reports whole units, like `pactl`
    struct RoundingSink(SimulatedSink);

    impl AudioSink for RoundingSink {
        fn volume_range(&mut self) -> AudioResult<VolumeRange> {
            self.0.volume_range()
        }

        fn current_volume(&mut self) -> AudioResult<f64> {
            Ok(self.0.current_volume()?.round())
        }

        fn set_volume(&mut self, volume: f64) -> AudioResult<()> {
            self.0.set_volume(volume)
        }

        fn name(&self) -> &str {
            "rounding"
        }
    }

    #[test]
    fn test_steady_volume_settles_on_rounding_sink() {
        let mut controller = VolumeController::default();
        let mut sink = RoundingSink(SimulatedSink::new(VolumeRange::new(0.0, 100.0).unwrap(), 0.0));
        let start = Instant::now();

        let commits = (0..40u32)
            .filter(|&i| {
                controller
                    .offer(44.72, start + Duration::from_millis(110) * i, &mut sink)
                    .outcome
                    .is_committed()
            })
            .count();

        assert_eq!(commits, 1);
        assert_eq!(sink.0.writes(), &[44.72]);
    }

    #[test]
    fn test_reference_is_last_commit_not_device_reading() {
        let mut controller = VolumeController::new(1, RateLimitPolicy::default());
        let mut sink = sink(-60.0);
        let start = Instant::now();

        assert!(controller.offer(-20.0, start, &mut sink).outcome.is_committed());
        sink.fail_next_reads(1);

        // No read needed once a commit exists
        let decision = controller.offer(-20.01, start + Duration::from_millis(150), &mut sink);
        assert_eq!(decision.outcome, CommitOutcome::BelowThreshold);
        let decision = controller.offer(-25.0, start + Duration::from_millis(300), &mut sink);
        assert!(decision.outcome.is_committed());
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let mut controller = VolumeController::default();
        let mut sink = sink(0.0);
        let now = Instant::now();

        sink.fail_next_writes(1);
        let decision = controller.offer(-40.0, now, &mut sink);
        assert!(matches!(decision.outcome, CommitOutcome::SinkUnavailable(_)));
        assert_eq!(*controller.state(), RateLimitState::default());

        // Next frame retries from scratch, no interval wait owed
        let decision = controller.offer(-40.0, now + Duration::from_millis(1), &mut sink);
        assert!(decision.outcome.is_committed());
    }

    #[test]
    fn test_failed_read_keeps_state() {
        let mut controller = VolumeController::default();
        let mut sink = sink(0.0);

        sink.fail_next_reads(1);
        let decision = controller.offer(-40.0, Instant::now(), &mut sink);
        assert!(matches!(decision.outcome, CommitOutcome::SinkUnavailable(AudioError::Unavailable(_))));
        assert!(sink.writes().is_empty());
        assert_eq!(controller.state().last_commit, None);
    }

    #[test]
    fn test_negative_min_change_rejected() {
        assert!(RateLimitPolicy::new(Duration::from_millis(100), -0.1).is_err());
        assert!(RateLimitPolicy::new(Duration::ZERO, 0.0).is_ok());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut controller = VolumeController::default();
        let mut sink = sink(0.0);
        controller.offer(-20.0, Instant::now(), &mut sink);
        controller.reset();
        assert!(controller.window().is_empty());
        assert_eq!(controller.state().last_commit, None);
    }
}
