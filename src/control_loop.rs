//! The synchronous frame loop: read, detect, control, present.
//!
//! One thread drives everything. Each iteration reads a frame, asks the
//! detector for hands, runs the [`VolumePipeline`], hands the resulting
//! [`FrameView`] to the presenter and checks whether the presenter asked to
//! stop. Camera, detector, sink and presenter are owned by the loop and are
//! released when it is dropped.

use crate::{
    audio::{AudioSink, VolumeRange},
    config::Config,
    landmarks::{HandFrame, LandmarkSource},
    overlay::FrameView,
    pipeline::VolumePipeline,
    Error, Result,
};
use log::{debug, info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// Source of frames. `Ok(None)` is the end of the stream.
pub trait FrameSource {
    type Frame;

    /// # Errors
    ///
    /// Returns an error if the device failed to deliver a frame
    fn read_frame(&mut self) -> Result<Option<Self::Frame>>;
}

/// Whether the loop should keep going after presenting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Shows a frame and its overlay, and reports user interrupts
pub trait Presenter<F> {
    /// # Errors
    ///
    /// Returns an error if drawing or displaying failed
    fn present(&mut self, frame: &mut F, view: &FrameView) -> Result<LoopControl>;
}

/// Time source for the rate limiter
pub trait Clock {
    fn now(&mut self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

/// Clock advancing by a fixed period on every reading, for replays at a nominal frame rate
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
    period: Duration,
    ticks: u32,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        Self {
            start: Instant::now(),
            period,
            ticks: 0,
        }
    }

    /// Clock ticking at `fps` frames per second
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless `fps` is positive, finite and yields a
    /// representable frame period
    pub fn from_fps(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(Error::InvalidInput(format!("Frame rate must be positive, got {fps}")));
        }
        let period = Duration::try_from_secs_f64(1.0 / fps)
            .map_err(|e| Error::InvalidInput(format!("Frame rate {fps} is out of range: {e}")))?;
        Ok(Self::new(period))
    }
}

impl Clock for FrameClock {
    fn now(&mut self) -> Instant {
        let now = self.start + self.period * self.ticks;
        self.ticks = self.ticks.saturating_add(1);
        now
    }
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Frame source ran out
    EndOfStream,
    /// Presenter reported an interrupt
    Interrupted,
}

/// Counters gathered over a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    pub frames: u64,
    /// Frames in which the pipeline ran
    pub gesture_frames: u64,
    /// Volume writes that reached the device
    pub commits: u64,
    pub exit: LoopExit,
}

/// Frame loop over a camera, a detector, an audio sink and a presenter
pub struct ControlLoop<C, D, S, P, K = SystemClock> {
    camera: C,
    detector: D,
    sink: S,
    presenter: P,
    clock: K,
    pipeline: VolumePipeline,
    native: VolumeRange,
}

impl<C, D, S, P> ControlLoop<C, D, S, P, SystemClock>
where
    C: FrameSource,
    D: LandmarkSource<C::Frame>,
    S: AudioSink,
    P: Presenter<C::Frame>,
{
    /// Query the sink's range once and build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the sink cannot
    /// report its range; both are fatal before the loop starts.
    pub fn new(camera: C, detector: D, mut sink: S, presenter: P, config: &Config) -> Result<Self> {
        let native = sink.volume_range()?;
        info!(
            "Audio sink {} range [{:.2}, {:.2}]",
            sink.name(),
            native.min(),
            native.max()
        );
        let pipeline = VolumePipeline::from_config(config, native)?;

        Ok(Self {
            camera,
            detector,
            sink,
            presenter,
            clock: SystemClock,
            pipeline,
            native,
        })
    }
}

impl<C, D, S, P, K> ControlLoop<C, D, S, P, K>
where
    C: FrameSource,
    D: LandmarkSource<C::Frame>,
    S: AudioSink,
    P: Presenter<C::Frame>,
    K: Clock,
{
    /// Replace the time source
    pub fn with_clock<K2: Clock>(self, clock: K2) -> ControlLoop<C, D, S, P, K2> {
        ControlLoop {
            camera: self.camera,
            detector: self.detector,
            sink: self.sink,
            presenter: self.presenter,
            clock,
            pipeline: self.pipeline,
            native: self.native,
        }
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn pipeline(&self) -> &VolumePipeline {
        &self.pipeline
    }

    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Run until the stream ends or the presenter asks to stop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading a frame or presenting it fails
    pub fn run(&mut self) -> Result<LoopReport> {
        info!("Entering control loop");
        let mut frames = 0u64;
        let mut gesture_frames = 0u64;
        let mut commits = 0u64;

        let exit = loop {
            let Some(mut frame) = self.camera.read_frame()? else {
                info!("End of stream reached");
                break LoopExit::EndOfStream;
            };
            frames += 1;

            let hands = match self.detector.detect(&frame) {
                Ok(hands) => hands,
                Err(e) => {
                    warn!("Hand detection failed on frame {}: {}", frames, e);
                    Vec::new()
                }
            };
            let hand_frame = HandFrame::from_detections(hands);

            let now = self.clock.now();
            let output = self.pipeline.process(&hand_frame, now, &mut self.sink);
            let system_volume = match &output {
                Some(out) => {
                    gesture_frames += 1;
                    if out.decision.outcome.is_committed() {
                        commits += 1;
                    }
                    self.sink.current_volume().ok()
                }
                None => {
                    debug!("Frame {}: no usable hand", frames);
                    None
                }
            };

            let view = FrameView::build(&hand_frame, output.as_ref(), system_volume, self.native);
            if self.presenter.present(&mut frame, &view)? == LoopControl::Stop {
                info!("Exit requested by user");
                break LoopExit::Interrupted;
            }
        };

        info!(
            "Control loop finished after {} frames ({} with a hand, {} volume writes)",
            frames, gesture_frames, commits
        );
        Ok(LoopReport {
            frames,
            gesture_frames,
            commits,
            exit,
        })
    }
}

/// Presenter for runs without a window: logs the readout and stops on Ctrl-C
#[derive(Debug, Clone)]
pub struct HeadlessPresenter {
    stop: Arc<AtomicBool>,
}

impl HeadlessPresenter {
    /// Presenter that stops once `stop` is set
    pub fn new(stop: Arc<AtomicBool>) -> Self {
        Self { stop }
    }

    /// Presenter wired to a process-wide Ctrl-C handler
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handler cannot be installed
    pub fn with_ctrlc() -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .map_err(|e| Error::InvalidInput(format!("Failed to install Ctrl-C handler: {e}")))?;
        Ok(Self::new(stop))
    }
}

impl<F> Presenter<F> for HeadlessPresenter {
    fn present(&mut self, _frame: &mut F, view: &FrameView) -> Result<LoopControl> {
        if let Some(gesture) = &view.gesture {
            debug!(
                "distance {:.0}px gesture {:.0}% system {:.0}% {:?}",
                gesture.smoothed_distance, gesture.gesture_percent, gesture.system_percent, gesture.outcome
            );
        }
        if self.stop.load(Ordering::SeqCst) {
            Ok(LoopControl::Stop)
        } else {
            Ok(LoopControl::Continue)
        }
    }
}
