use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

use framescan_core::source::SourceInfo;

use crate::synthetic::{ColorFn, SeekLog, SyntheticSource};

/// Builder for synthetic sources with sensible defaults: 64x36 pixels, 25 fps, black.
#[derive(Clone)]
pub struct SyntheticSourceBuilder {
    frame_count: u64,
    width: u32,
    height: u32,
    fps: f64,
    codec_tag: String,
    color: ColorFn,
    empty: Vec<RangeInclusive<u64>>,
    drift: i64,
    fault_at: Option<u64>,
    seeks: SeekLog,
    reads: Arc<Mutex<Vec<u64>>>,
}

impl SyntheticSourceBuilder {
    pub fn new(frame_count: u64) -> Self {
        Self {
            frame_count,
            width: 64,
            height: 36,
            fps: 25.0,
            codec_tag: "avc1".into(),
            color: Arc::new(|_| [0, 0, 0]),
            empty: Vec::new(),
            drift: 0,
            fault_at: None,
            seeks: SeekLog::default(),
            reads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn resolution(mut self, w: u32, h: u32) -> Self {
        self.width = w;
        self.height = h;
        self
    }

    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn codec(mut self, tag: &str) -> Self {
        self.codec_tag = tag.into();
        self
    }

    /// Gray frames whose V channel follows `f`.
    pub fn brightness(mut self, f: impl Fn(u64) -> u8 + Send + Sync + 'static) -> Self {
        self.color = Arc::new(move |frame| {
            let v = f(frame);
            [v, v, v]
        });
        self
    }

    pub fn color(mut self, f: impl Fn(u64) -> [u8; 3] + Send + Sync + 'static) -> Self {
        self.color = Arc::new(f);
        self
    }

    /// Frames in `range` fail to decode.
    pub fn empty_frames(mut self, range: RangeInclusive<u64>) -> Self {
        self.empty.push(range);
        self
    }

    /// Offset added to every frame-index seek.
    pub fn drift(mut self, frames: i64) -> Self {
        self.drift = frames;
        self
    }

    /// Reading this frame returns a decoder error instead of a frame.
    pub fn fault_at(mut self, frame: u64) -> Self {
        self.fault_at = Some(frame);
        self
    }

    pub fn seek_log(&self) -> SeekLog {
        self.seeks.clone()
    }

    /// Every frame read so far, including empty ones, across all built sources.
    pub fn read_log(&self) -> Vec<u64> {
        self.reads.lock().unwrap().clone()
    }

    pub fn build(&self) -> SyntheticSource {
        SyntheticSource {
            info: SourceInfo {
                frame_count: self.frame_count,
                width: self.width,
                height: self.height,
                fps: self.fps,
                codec_tag: self.codec_tag.clone(),
                duration_secs: self.frame_count as f64 / self.fps,
            },
            color: Arc::clone(&self.color),
            empty: self.empty.clone(),
            drift: self.drift,
            fault_at: self.fault_at,
            position: 0,
            seeks: self.seeks.clone(),
            reads: Arc::clone(&self.reads),
        }
    }
}
