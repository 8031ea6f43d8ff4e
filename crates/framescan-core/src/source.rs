use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Decoded video frame with raw pixel data.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// RGB pixel data, row-major, 3 bytes per pixel.
    pub data: Vec<u8>,
    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

/// Static metadata of an opened source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub frame_count: u64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Four character codec tag, e.g. `avc1`.
    pub codec_tag: String,
    pub duration_secs: f64,
}

impl SourceInfo {
    /// Index of the final frame, `frame_count - 1`, or 0 for an empty source.
    pub fn last_frame(&self) -> u64 {
        self.frame_count.saturating_sub(1)
    }
}

/// Where to place the playhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Absolute frame index.
    Frame(u64),
    /// Normalized position in `[0, 1]` of the whole source.
    Ratio(f64),
}

/// Size policy applied to a frame before it is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FrameScale {
    #[default]
    Full,
    /// Multiply both dimensions by this factor.
    Factor(f64),
    /// Shrink so the longer side is at most this many pixels.
    MaxDimension(u32),
}

impl FrameScale {
    /// Output dimensions for a `width` x `height` input. Never returns a zero dimension
    /// for a non-empty input.
    pub fn dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (width, height);
        }
        match self {
            FrameScale::Full => (width, height),
            FrameScale::Factor(f) => {
                let w = ((width as f64 * f).round() as u32).max(1);
                let h = ((height as f64 * f).round() as u32).max(1);
                (w, h)
            }
            FrameScale::MaxDimension(max) => {
                let longest = width.max(height);
                if max == 0 || longest <= max {
                    return (width, height);
                }
                let scale = max as f64 / longest as f64;
                let w = ((width as f64 * scale).round() as u32).max(1);
                let h = ((height as f64 * scale).round() as u32).max(1);
                (w, h)
            }
        }
    }
}

/// The decode capability every job drives.
///
/// `read_frame` returns `Ok(None)` for a frame that could not be decoded (including reads
/// past the end); the playhead still advances. `Err` is reserved for faults that leave the
/// source in an unknown state.
pub trait FrameSource: Send {
    fn info(&self) -> &SourceInfo;

    fn seek(&mut self, target: SeekTarget) -> Result<()>;

    fn read_frame(&mut self, scale: FrameScale) -> Result<Option<VideoFrame>>;

    /// Index of the frame the next `read_frame` will produce.
    fn position(&self) -> u64;

    /// Playhead position in milliseconds.
    fn position_ms(&self) -> f64 {
        let fps = self.info().fps;
        if fps > 0.0 {
            self.position() as f64 * 1000.0 / fps
        } else {
            0.0
        }
    }
}

/// Opens sources by path. Lets a session be driven by FFmpeg or by a synthetic decoder.
pub trait SourceOpener: Send + Sync {
    type Source: FrameSource;

    fn open(&self, path: &Path) -> Result<Self::Source>;
}

/// Render a FOURCC code, least significant byte first.
pub fn fourcc_to_string(fourcc: u32) -> String {
    fourcc
        .to_le_bytes()
        .iter()
        .map(|&b| b as char)
        .collect()
}
