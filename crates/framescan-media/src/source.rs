use std::path::{Path, PathBuf};

use framescan_core::seek::{has_drifted, SeekMode};
use framescan_core::source::{FrameScale, FrameSource, SourceInfo, VideoFrame};
use tracing::{debug, info};

use crate::error::Result;

/// An opened file plus the per-file seek state shared by every job run against it.
///
/// `uses_ratio_seek` starts false and flips to true at most once, when a frame-index seek
/// lands somewhere other than requested. It never flips back.
pub struct VideoSource<S> {
    source: S,
    path: PathBuf,
    info: SourceInfo,
    uses_ratio_seek: bool,
}

impl<S: FrameSource> VideoSource<S> {
    pub fn new(path: impl Into<PathBuf>, source: S) -> Self {
        let info = source.info().clone();
        Self {
            source,
            path: path.into(),
            info,
            uses_ratio_seek: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self) -> &SourceInfo {
        &self.info
    }

    pub fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    pub fn uses_ratio_seek(&self) -> bool {
        self.uses_ratio_seek
    }

    /// Seek mode for a job: ratio if the caller asked for it or the file proved unreliable.
    pub fn seek_mode(&self, requested_ratio: bool) -> SeekMode {
        SeekMode::from_ratio_flag(requested_ratio || self.uses_ratio_seek)
    }

    pub fn seek_frame(&mut self, frame: u64, mode: SeekMode) -> Result<()> {
        let target = mode.target(frame, self.info.frame_count);
        debug!(path = %self.path.display(), frame, ?target, "seek");
        self.source.seek(target)?;
        Ok(())
    }

    /// Decode the frame under the playhead. `None` marks an undecodable frame.
    pub fn read(&mut self, scale: FrameScale) -> Result<Option<VideoFrame>> {
        Ok(self.source.read_frame(scale)?)
    }

    /// Index of the frame most recently read.
    pub fn last_read_frame(&self) -> u64 {
        self.source.position().saturating_sub(1)
    }

    pub fn position_ms(&self) -> f64 {
        self.source.position_ms()
    }

    /// Compare where the decoder landed with where it was sent, right after the first read
    /// following a frame-index seek to `requested`. Returns the resulting ratio flag.
    pub fn check_drift(&mut self, requested: u64) -> bool {
        if !self.uses_ratio_seek && has_drifted(requested, self.source.position()) {
            info!(
                path = %self.path.display(),
                requested,
                landed = self.last_read_frame(),
                "playhead not at requested frame, switching to ratio seeking"
            );
            self.uses_ratio_seek = true;
        }
        self.uses_ratio_seek
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
