//! Webcam frame source backed by `OpenCV`.

use crate::{control_loop::FrameSource, Error, Result};
use log::{info, warn};
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};

/// Camera capture, optionally mirrored so the preview behaves like a mirror
pub struct CameraSource {
    capture: VideoCapture,
    flip_horizontal: bool,
}

impl CameraSource {
    /// Open a camera by index
    ///
    /// # Errors
    ///
    /// Returns `Camera` if the device cannot be opened
    pub fn open(index: i32, flip_horizontal: bool) -> Result<Self> {
        info!("Opening camera {}", index);
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::Camera(format!("Could not open camera {index}")));
        }

        // Reduce buffer size for lower latency
        if !capture.set(CAP_PROP_BUFFERSIZE, 1.0)? {
            warn!("Camera ignored buffer size request");
        }

        Ok(Self {
            capture,
            flip_horizontal,
        })
    }
}

impl FrameSource for CameraSource {
    type Frame = Mat;

    fn read_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            warn!("Camera returned no frame");
            return Ok(None);
        }

        if self.flip_horizontal {
            let mut mirrored = Mat::default();
            core::flip(&frame, &mut mirrored, 1)?;
            return Ok(Some(mirrored));
        }

        Ok(Some(frame))
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        match self.capture.release() {
            Ok(()) => info!("Camera released"),
            Err(e) => warn!("Failed to release camera: {}", e),
        }
    }
}
