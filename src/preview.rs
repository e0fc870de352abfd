//! Live preview window drawn with `OpenCV`.

use crate::{
    constants::{
        HAND_CONNECTIONS, KEY_ESCAPE, KEY_QUIT, VOLUME_BAR_BOTTOM, VOLUME_BAR_LEFT, VOLUME_BAR_RIGHT,
        VOLUME_BAR_TOP,
    },
    control_loop::{LoopControl, Presenter},
    landmarks::Landmark,
    overlay::{FrameView, GestureView, LevelBand},
    utils::safe_cast::f64_to_i32_clamp,
    Result,
};
use log::{info, warn};
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    highgui::{self, WINDOW_AUTOSIZE},
    imgproc::{self, FILLED, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

const WHITE: (f64, f64, f64) = (255.0, 255.0, 255.0);
const BLUE: (f64, f64, f64) = (255.0, 0.0, 0.0);
const GREEN: (f64, f64, f64) = (0.0, 255.0, 0.0);
const RED: (f64, f64, f64) = (0.0, 0.0, 255.0);
const YELLOW: (f64, f64, f64) = (0.0, 255.0, 255.0);
const MAGENTA: (f64, f64, f64) = (255.0, 0.0, 255.0);

fn bgr((b, g, r): (f64, f64, f64)) -> Scalar {
    Scalar::new(b, g, r, 0.0)
}

fn point(x: f64, y: f64) -> Point {
    Point::new(f64_to_i32_clamp(x, 0, i32::MAX), f64_to_i32_clamp(y, 0, i32::MAX))
}

fn landmark_point(landmark: &Landmark) -> Point {
    point(landmark.x, landmark.y)
}

const fn band_color(level: LevelBand) -> (f64, f64, f64) {
    match level {
        LevelBand::Low => GREEN,
        LevelBand::Medium => YELLOW,
        LevelBand::High => RED,
    }
}

/// Preview window that stops the loop on ESC or `q`
pub struct OpenCvPresenter {
    title: String,
}

impl OpenCvPresenter {
    /// # Errors
    ///
    /// Returns an error if the window cannot be created
    pub fn new(title: &str) -> Result<Self> {
        highgui::named_window(title, WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: title.to_string(),
        })
    }

    fn text(frame: &mut Mat, text: &str, x: i32, y: i32, scale: f64, color: (f64, f64, f64), thickness: i32) -> Result<()> {
        imgproc::put_text(
            frame,
            text,
            Point::new(x, y),
            FONT_HERSHEY_SIMPLEX,
            scale,
            bgr(color),
            thickness,
            LINE_8,
            false,
        )?;
        Ok(())
    }

    fn draw_skeleton(frame: &mut Mat, landmarks: &[Landmark]) -> Result<()> {
        for &(a, b) in &HAND_CONNECTIONS {
            if let (Some(start), Some(end)) = (landmarks.get(a), landmarks.get(b)) {
                imgproc::line(frame, landmark_point(start), landmark_point(end), bgr(WHITE), 2, LINE_8, 0)?;
            }
        }
        for landmark in landmarks {
            imgproc::circle(frame, landmark_point(landmark), 4, bgr(RED), FILLED, LINE_8, 0)?;
        }
        Ok(())
    }

    fn draw_gesture(frame: &mut Mat, gesture: &GestureView) -> Result<()> {
        let thumb = landmark_point(&gesture.pinch.thumb);
        let index = landmark_point(&gesture.pinch.index);
        let (mx, my) = gesture.pinch.midpoint();

        imgproc::circle(frame, thumb, 10, bgr(BLUE), FILLED, LINE_8, 0)?;
        imgproc::circle(frame, index, 10, bgr(BLUE), FILLED, LINE_8, 0)?;
        imgproc::line(frame, thumb, index, bgr(MAGENTA), 2, LINE_8, 0)?;
        imgproc::circle(frame, point(mx, my), 8, bgr(GREEN), FILLED, LINE_8, 0)?;

        Self::text(frame, &format!("Distance: {:.0}", gesture.pinch.distance), thumb.x, thumb.y - 20, 0.6, WHITE, 2)?;
        Self::text(frame, &format!("Smoothed: {:.0}", gesture.smoothed_distance), thumb.x, thumb.y - 50, 0.5, YELLOW, 2)?;

        // Volume bar
        let top = f64_to_i32_clamp(VOLUME_BAR_TOP, 0, i32::MAX);
        let bottom = f64_to_i32_clamp(VOLUME_BAR_BOTTOM, 0, i32::MAX);
        let width = VOLUME_BAR_RIGHT - VOLUME_BAR_LEFT;
        let fill_top = f64_to_i32_clamp(gesture.bar_top, top, bottom);
        let color = band_color(gesture.level);

        imgproc::rectangle(frame, Rect::new(VOLUME_BAR_LEFT, top, width, bottom - top), bgr(WHITE), 2, LINE_8, 0)?;
        imgproc::rectangle(
            frame,
            Rect::new(VOLUME_BAR_LEFT, fill_top, width, bottom - fill_top),
            bgr(color),
            FILLED,
            LINE_8,
            0,
        )?;

        Self::text(frame, &format!("Gesture: {:.0}%", gesture.gesture_percent.trunc()), 40, bottom + 30, 0.6, WHITE, 2)?;
        Self::text(frame, &format!("System: {:.0}%", gesture.system_percent.trunc()), 40, bottom + 60, 0.6, color, 2)?;
        Self::text(frame, "MIN", VOLUME_BAR_RIGHT + 10, bottom, 0.5, WHITE, 1)?;
        Self::text(frame, "MAX", VOLUME_BAR_RIGHT + 10, top + 10, 0.5, WHITE, 1)?;

        Self::text(frame, "Pinch to control volume", 120, 50, 0.7, WHITE, 2)?;
        Self::text(frame, "Close fingers = Low volume", 120, 80, 0.5, GREEN, 1)?;
        Self::text(frame, "Far fingers = High volume", 120, 100, 0.5, RED, 1)?;
        Ok(())
    }
}

impl Presenter<Mat> for OpenCvPresenter {
    fn present(&mut self, frame: &mut Mat, view: &FrameView) -> Result<LoopControl> {
        Self::draw_skeleton(frame, &view.landmarks)?;
        if let Some(gesture) = &view.gesture {
            Self::draw_gesture(frame, gesture)?;
        }

        highgui::imshow(&self.title, &*frame)?;

        let key = highgui::wait_key(1)? & 0xFF;
        if key == KEY_ESCAPE || key == KEY_QUIT {
            return Ok(LoopControl::Stop);
        }
        Ok(LoopControl::Continue)
    }
}

impl Drop for OpenCvPresenter {
    fn drop(&mut self) {
        match highgui::destroy_all_windows() {
            Ok(()) => info!("Preview window closed"),
            Err(e) => warn!("Failed to close preview window: {}", e),
        }
    }
}
