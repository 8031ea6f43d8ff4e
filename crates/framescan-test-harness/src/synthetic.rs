use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use framescan_core::error::{CoreError, Result};
use framescan_core::seek::ratio_to_frame;
use framescan_core::source::{
    FrameScale, FrameSource, SeekTarget, SourceInfo, SourceOpener, VideoFrame,
};

/// RGB color of a frame given its index.
pub type ColorFn = Arc<dyn Fn(u64) -> [u8; 3] + Send + Sync>;

/// Every seek issued against a synthetic source, in order. Shared between all sources
/// opened from the same builder so it survives reopen.
#[derive(Clone, Default)]
pub struct SeekLog(Arc<Mutex<Vec<SeekTarget>>>);

impl SeekLog {
    pub fn push(&self, target: SeekTarget) {
        self.0.lock().unwrap().push(target);
    }

    pub fn calls(&self) -> Vec<SeekTarget> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deterministic in-memory decoder.
///
/// Frames are uniform color fields. Frames listed as empty decode to nothing, as do reads
/// past the end. Reading the `fault_at` frame fails outright. A non-zero `drift` shifts
/// every frame-index seek, mimicking containers whose index cannot be trusted; ratio
/// seeks always land exactly.
pub struct SyntheticSource {
    pub(crate) info: SourceInfo,
    pub(crate) color: ColorFn,
    pub(crate) empty: Vec<RangeInclusive<u64>>,
    pub(crate) drift: i64,
    pub(crate) fault_at: Option<u64>,
    pub(crate) position: u64,
    pub(crate) seeks: SeekLog,
    pub(crate) reads: Arc<Mutex<Vec<u64>>>,
}

impl SyntheticSource {
    pub fn seek_log(&self) -> SeekLog {
        self.seeks.clone()
    }

    fn is_empty_frame(&self, frame: u64) -> bool {
        self.empty.iter().any(|r| r.contains(&frame))
    }
}

impl FrameSource for SyntheticSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn seek(&mut self, target: SeekTarget) -> Result<()> {
        self.seeks.push(target);
        let last = self.info.frame_count.saturating_sub(1) as i64;
        self.position = match target {
            SeekTarget::Frame(frame) => (frame as i64 + self.drift).clamp(0, last) as u64,
            SeekTarget::Ratio(ratio) => ratio_to_frame(ratio, self.info.frame_count),
        };
        Ok(())
    }

    fn read_frame(&mut self, scale: FrameScale) -> Result<Option<VideoFrame>> {
        if self.position >= self.info.frame_count {
            return Ok(None);
        }
        let frame = self.position;
        if self.fault_at == Some(frame) {
            return Err(CoreError::Decode(format!("synthetic fault at frame {frame}")));
        }
        self.position += 1;
        self.reads.lock().unwrap().push(frame);

        if self.is_empty_frame(frame) {
            return Ok(None);
        }

        let (width, height) = scale.dimensions(self.info.width, self.info.height);
        let rgb = (self.color)(frame);
        let data = rgb.repeat(width as usize * height as usize);
        Ok(Some(VideoFrame {
            width,
            height,
            data,
            pts_secs: frame as f64 / self.info.fps,
        }))
    }

    fn position(&self) -> u64 {
        self.position
    }
}

/// Opens synthetic sources registered by path; anything else fails to open.
#[derive(Default, Clone)]
pub struct SyntheticOpener {
    sources: HashMap<PathBuf, crate::builders::SyntheticSourceBuilder>,
}

impl SyntheticOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(
        mut self,
        path: impl Into<PathBuf>,
        builder: crate::builders::SyntheticSourceBuilder,
    ) -> Self {
        self.sources.insert(path.into(), builder);
        self
    }

    pub fn seek_log(&self, path: &Path) -> Option<SeekLog> {
        self.sources.get(path).map(|b| b.seek_log())
    }

    pub fn read_log(&self, path: &Path) -> Option<Vec<u64>> {
        self.sources.get(path).map(|b| b.read_log())
    }
}

impl SourceOpener for SyntheticOpener {
    type Source = SyntheticSource;

    fn open(&self, path: &Path) -> Result<SyntheticSource> {
        self.sources
            .get(path)
            .map(|b| b.build())
            .ok_or_else(|| CoreError::OpenFailed(format!("{}: no such file", path.display())))
    }
}
