use framescan_core::config::RetrievalConfig;
use framescan_core::retrieval::RetrySearch;
use framescan_core::source::{FrameScale, FrameSource};
use tracing::{debug, warn};

use crate::error::Result;
use crate::source::VideoSource;
use crate::thumbnail::encode_jpeg;

#[derive(Debug, Clone)]
pub struct PosterFrame {
    /// JPEG bytes, empty if no frame near the middle could be decoded.
    pub image: Vec<u8>,
    pub frame: u64,
    /// Ratio flag of the source after the drift check.
    pub uses_ratio: bool,
}

/// Grab the middle frame of the source.
///
/// The first read doubles as the drift check: it is issued by frame index and if the
/// decoder lands elsewhere the source switches to ratio seeking for good. Undecodable
/// frames are retried the same way thumbnails are.
pub fn poster_frame<S: FrameSource>(
    source: &mut VideoSource<S>,
    config: &RetrievalConfig,
) -> Result<PosterFrame> {
    let target = source.frame_count() / 2;
    let mut first_read = true;

    for probe in RetrySearch::new(target, source.frame_count(), config.search_limit) {
        let mode = source.seek_mode(false);
        source.seek_frame(probe.frame, mode)?;
        let frame = source.read(FrameScale::Full)?;

        if first_read {
            first_read = false;
            source.check_drift(probe.frame);
        }

        debug!(
            target,
            offset = probe.offset,
            landed = source.last_read_frame(),
            position_ms = source.position_ms(),
            of = source.frame_count(),
            "poster frame read"
        );

        if let Some(frame) = frame {
            return Ok(PosterFrame {
                image: encode_jpeg(&frame, config.jpeg_quality)?,
                frame: source.last_read_frame(),
                uses_ratio: source.uses_ratio_seek(),
            });
        }
    }

    warn!(target, "no decodable poster frame within search limit");
    Ok(PosterFrame {
        image: Vec::new(),
        frame: source.last_read_frame(),
        uses_ratio: source.uses_ratio_seek(),
    })
}
