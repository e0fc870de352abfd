//! Recorded landmark streams.
//!
//! A replay file holds one JSON object per line, each a frame with zero or
//! more hands given as lists of `[x, y]` pixel points:
//!
//! ```text
//! {"hands": [[[312.0, 240.0], [330.5, 228.0], ...]]}
//! {"hands": []}
//! ```
//!
//! Blank lines are skipped. Feeding a replay through the control loop runs
//! the exact same pipeline as the camera, without a camera.

use crate::{
    control_loop::FrameSource,
    landmarks::{Hand, LandmarkSource},
    Result,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ReplayRecord {
    #[serde(default)]
    hands: Vec<Vec<(f64, f64)>>,
}

/// One recorded frame
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    /// Zero-based position in the recording
    pub index: usize,
    pub hands: Vec<Hand>,
}

/// Frame source reading a JSON-lines recording
pub struct ReplaySource<R> {
    reader: R,
    line: String,
    index: usize,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::info!("Opening landmark replay: {}", path.as_ref().display());
        Ok(Self::from_reader(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            index: 0,
        }
    }
}

impl<R: BufRead> FrameSource for ReplaySource<R> {
    type Frame = ReplayFrame;

    fn read_frame(&mut self) -> Result<Option<ReplayFrame>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            if self.line.trim().is_empty() {
                continue;
            }

            let record: ReplayRecord = serde_json::from_str(self.line.trim())?;
            let frame = ReplayFrame {
                index: self.index,
                hands: record.hands.iter().map(|points| Hand::from_points(points)).collect(),
            };
            self.index += 1;
            return Ok(Some(frame));
        }
    }
}

/// Detector for replayed frames: the hands were recorded with the frame
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayDetector;

impl LandmarkSource<ReplayFrame> for ReplayDetector {
    fn detect(&mut self, frame: &ReplayFrame) -> Result<Vec<Hand>> {
        Ok(frame.hands.clone())
    }
}

/// Append one frame to a recording
///
/// # Errors
///
/// Returns an error if serialization or the write fails
pub fn write_frame<W: Write>(writer: &mut W, hands: &[Hand]) -> Result<()> {
    let record = ReplayRecord {
        hands: hands
            .iter()
            .map(|hand| hand.landmarks.iter().map(|lm| (lm.x, lm.y)).collect())
            .collect(),
    };
    serde_json::to_writer(&mut *writer, &record)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Detector wrapper that records every detection to a replay file
pub struct RecordingDetector<D, W: Write> {
    inner: D,
    writer: W,
}

impl<D, W: Write> RecordingDetector<D, W> {
    pub fn new(inner: D, writer: W) -> Self {
        Self { inner, writer }
    }
}

impl<F, D, W> LandmarkSource<F> for RecordingDetector<D, W>
where
    D: LandmarkSource<F>,
    W: Write,
{
    fn detect(&mut self, frame: &F) -> Result<Vec<Hand>> {
        let hands = self.inner.detect(frame)?;
        write_frame(&mut self.writer, &hands)?;
        Ok(hands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_recording_detector_round_trips_through_replay() {
        let data = "{\"hands\": [[[7.0, 8.0]]]}\n{\"hands\": []}\n";
        let mut source = ReplaySource::from_reader(Cursor::new(data));
        let mut recorder = RecordingDetector::new(ReplayDetector, Vec::new());

        while let Some(frame) = source.read_frame().unwrap() {
            recorder.detect(&frame).unwrap();
        }

        let mut again = ReplaySource::from_reader(Cursor::new(recorder.writer));
        assert_eq!(again.read_frame().unwrap().unwrap().hands, vec![Hand::from_points(&[(7.0, 8.0)])]);
        assert!(again.read_frame().unwrap().unwrap().hands.is_empty());
        assert!(again.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_reads_frames_and_skips_blank_lines() {
        let data = "{\"hands\": [[[1.0, 2.0], [3.0, 4.0]]]}\n\n{\"hands\": []}\n{}\n";
        let mut source = ReplaySource::from_reader(Cursor::new(data));

        let first = source.read_frame().unwrap().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.hands[0], Hand::from_points(&[(1.0, 2.0), (3.0, 4.0)]));

        let second = source.read_frame().unwrap().unwrap();
        assert_eq!(second.index, 1);
        assert!(second.hands.is_empty());

        assert!(source.read_frame().unwrap().unwrap().hands.is_empty());
        assert!(source.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let mut source = ReplaySource::from_reader(Cursor::new("{\"hands\": [[1.0]]}\n"));
        assert!(matches!(source.read_frame(), Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_written_frames_read_back() {
        let hand = Hand::from_points(&[(5.0, 6.0); 21]);
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &[hand.clone()]).unwrap();
        write_frame(&mut buffer, &[]).unwrap();

        let mut source = ReplaySource::from_reader(Cursor::new(buffer));
        let frame = source.read_frame().unwrap().unwrap();
        assert_eq!(ReplayDetector.detect(&frame).unwrap(), vec![hand]);
        assert!(source.read_frame().unwrap().unwrap().hands.is_empty());
    }
}
