//! Pinch gesture volume control from a webcam or a landmark recording.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use pinch_volume::{
    audio::{AudioSink, PulseAudioSink, SimulatedSink},
    config::{AudioBackend, Config, EXAMPLE_CONFIG},
    control_loop::{Clock, ControlLoop, FrameClock, FrameSource, HeadlessPresenter, LoopReport, Presenter},
    landmarks::LandmarkSource,
    replay::{ReplayDetector, ReplaySource},
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Replay a JSON-lines landmark recording instead of using the camera
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Nominal frame rate of the recording
    #[arg(long, default_value = "30")]
    replay_fps: f64,

    /// Record detected landmarks to a JSON-lines file (camera mode)
    #[arg(long)]
    record: Option<PathBuf>,

    /// Audio backend (simulated, pactl)
    #[arg(short, long)]
    audio: Option<String>,

    /// Run without a preview window; stop with Ctrl-C
    #[arg(long)]
    no_gui: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Pinch Volume Control");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(backend) = &args.audio {
        config.audio.backend = match backend.as_str() {
            "simulated" => AudioBackend::Simulated,
            "pactl" => AudioBackend::Pactl,
            other => bail!("Unknown audio backend: {other}"),
        };
    }
    if args.no_gui {
        config.display.gui = false;
    }
    config.validate()?;

    let sink = open_sink(&config)?;

    let report = if let Some(path) = &args.replay {
        if args.record.is_some() {
            bail!("--record only applies to camera input");
        }
        let source = ReplaySource::from_file(path)?;
        let clock = FrameClock::from_fps(args.replay_fps)?;
        run(source, ReplayDetector, sink, HeadlessPresenter::with_ctrlc()?, clock, &config)?
    } else {
        run_camera(&args, sink, &config)?
    };

    info!("Finished: {:?}", report);
    Ok(())
}

fn open_sink(config: &Config) -> Result<Box<dyn AudioSink>> {
    Ok(match config.audio.backend {
        AudioBackend::Simulated => Box::new(SimulatedSink::new(
            config.audio.simulated_range()?,
            config.audio.simulated_initial,
        )),
        AudioBackend::Pactl => Box::new(PulseAudioSink::with_sink(config.audio.pactl_sink.clone())),
    })
}

/// Build the loop, run it, and drop every resource before returning
fn run<C, D, P, K>(camera: C, detector: D, sink: Box<dyn AudioSink>, presenter: P, clock: K, config: &Config) -> Result<LoopReport>
where
    C: FrameSource,
    D: LandmarkSource<C::Frame>,
    P: Presenter<C::Frame>,
    K: Clock,
{
    let mut control = ControlLoop::new(camera, detector, sink, presenter, config)?.with_clock(clock);
    let report = control.run()?;
    drop(control);
    Ok(report)
}

#[cfg(feature = "camera")]
fn run_camera(args: &Args, sink: Box<dyn AudioSink>, config: &Config) -> Result<LoopReport> {
    use pinch_volume::{
        camera::CameraSource, control_loop::SystemClock, hand_tracking::HandTracker,
        preview::OpenCvPresenter, replay::RecordingDetector,
    };
    use std::{fs::File, io::BufWriter};

    let camera = CameraSource::open(args.cam, config.display.flip_horizontal)?;
    let tracker = HandTracker::spawn(&config.detector)?;

    match (&args.record, config.display.gui) {
        (Some(path), gui) => {
            info!("Recording landmarks to {}", path.display());
            let detector = RecordingDetector::new(tracker, BufWriter::new(File::create(path)?));
            if gui {
                let presenter = OpenCvPresenter::new(&config.display.window_title)?;
                run(camera, detector, sink, presenter, SystemClock, config)
            } else {
                run(camera, detector, sink, HeadlessPresenter::with_ctrlc()?, SystemClock, config)
            }
        }
        (None, true) => {
            let presenter = OpenCvPresenter::new(&config.display.window_title)?;
            run(camera, tracker, sink, presenter, SystemClock, config)
        }
        (None, false) => run(camera, tracker, sink, HeadlessPresenter::with_ctrlc()?, SystemClock, config),
    }
}

#[cfg(not(feature = "camera"))]
fn run_camera(args: &Args, _sink: Box<dyn AudioSink>, _config: &Config) -> Result<LoopReport> {
    bail!(
        "camera {} requested but this build has no camera support; use --replay or rebuild with --features camera",
        args.cam
    )
}
