use framescan_core::color::mean_hsv;
use framescan_core::sample::FrameSample;
use framescan_core::source::{FrameScale, FrameSource};
use tracing::warn;

use crate::error::Result;
use crate::source::VideoSource;

/// Decode the frame under the playhead and measure its mean HSV color.
///
/// A frame that fails to decode yields an empty sample attributed to `expected_frame`;
/// retrying elsewhere is up to the caller.
pub fn sample<S: FrameSource>(
    source: &mut VideoSource<S>,
    expected_frame: u64,
    scale: FrameScale,
) -> Result<FrameSample> {
    match source.read(scale)? {
        Some(frame) => {
            let index = source.last_read_frame();
            Ok(match mean_hsv(&frame.data, frame.width, frame.height) {
                Some(mean) => FrameSample::new(index, mean),
                None => FrameSample::empty(index),
            })
        }
        None => {
            warn!(
                frame = expected_frame,
                position_ms = source.position_ms(),
                of = source.frame_count(),
                "empty frame"
            );
            Ok(FrameSample::empty(expected_frame))
        }
    }
}
