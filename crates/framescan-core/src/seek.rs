use serde::{Deserialize, Serialize};

use crate::source::SeekTarget;

/// How a frame number is turned into a decoder seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeekMode {
    #[default]
    ByFrameIndex,
    /// Seek by normalized position; used once frame-index seeking proved unreliable.
    ByRatio,
}

impl SeekMode {
    pub fn from_ratio_flag(use_ratio: bool) -> Self {
        if use_ratio {
            SeekMode::ByRatio
        } else {
            SeekMode::ByFrameIndex
        }
    }

    /// Build the decoder seek for `frame`, clamped into the source.
    pub fn target(self, frame: u64, frame_count: u64) -> SeekTarget {
        let last = frame_count.saturating_sub(1);
        let frame = frame.min(last);
        match self {
            SeekMode::ByFrameIndex => SeekTarget::Frame(frame),
            SeekMode::ByRatio => {
                if last == 0 {
                    SeekTarget::Ratio(0.0)
                } else {
                    SeekTarget::Ratio(frame as f64 / last as f64)
                }
            }
        }
    }
}

/// Frame a ratio seek lands on: 0.0 is the first frame and 1.0 the last one.
pub fn ratio_to_frame(ratio: f64, frame_count: u64) -> u64 {
    let last = frame_count.saturating_sub(1);
    (ratio.clamp(0.0, 1.0) * last as f64).round() as u64
}

/// Clamp a possibly negative frame number into `[lower, upper]`.
pub fn limit_range(value: i64, lower: u64, upper: u64) -> u64 {
    if value < lower as i64 {
        lower
    } else {
        (value as u64).min(upper)
    }
}

/// After reading one frame following a seek to `requested`, the decoder should report
/// `requested + 1` as its next position. Anything else means the index seek is unreliable.
pub fn has_drifted(requested: u64, position_after_read: u64) -> bool {
    position_after_read.checked_sub(1) != Some(requested)
}
