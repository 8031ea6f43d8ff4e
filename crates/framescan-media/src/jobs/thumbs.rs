use framescan_core::config::RetrievalConfig;
use framescan_core::retrieval::{RetrievalMode, RetrySearch, ThumbRequest, ThumbResult};
use framescan_core::seek::SeekMode;
use framescan_core::source::{FrameScale, FrameSource};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::source::VideoSource;
use crate::thumbnail::encode_jpeg;

/// Image bytes plus the frame they came from.
struct Grab {
    image: Vec<u8>,
    actual_frame: u64,
}

fn grab_direct<S: FrameSource>(
    source: &mut VideoSource<S>,
    target: u64,
    mode: SeekMode,
    config: &RetrievalConfig,
) -> Result<Grab> {
    source.seek_frame(target, mode)?;
    let image = match source.read(FrameScale::Full)? {
        Some(frame) => encode_jpeg(&frame, config.jpeg_quality)?,
        None => {
            info!(target, "frame is empty");
            Vec::new()
        }
    };
    Ok(Grab {
        image,
        actual_frame: source.last_read_frame(),
    })
}

fn grab_with_retry<S: FrameSource>(
    source: &mut VideoSource<S>,
    target: u64,
    mode: SeekMode,
    config: &RetrievalConfig,
) -> Result<Grab> {
    for probe in RetrySearch::new(target, source.frame_count(), config.search_limit) {
        source.seek_frame(probe.frame, mode)?;
        if let Some(frame) = source.read(FrameScale::Full)? {
            debug!(
                target,
                offset = probe.offset,
                landed = source.last_read_frame(),
                "thumb decoded"
            );
            return Ok(Grab {
                image: encode_jpeg(&frame, config.jpeg_quality)?,
                actual_frame: source.last_read_frame(),
            });
        }
        debug!(target, offset = probe.offset, "frame is empty, trying next");
    }

    warn!(
        target,
        limit = config.search_limit,
        "still empty after search, sending an empty frame"
    );
    Ok(Grab {
        image: Vec::new(),
        actual_frame: source.last_read_frame(),
    })
}

/// Decode each requested frame in order, handing every result to `on_result` as soon as
/// it is ready. The final result carries `is_last`.
pub fn retrieve_thumbs<S: FrameSource>(
    source: &mut VideoSource<S>,
    requests: &[ThumbRequest],
    use_ratio: bool,
    mode: RetrievalMode,
    config: &RetrievalConfig,
    mut on_result: impl FnMut(ThumbResult),
) -> Result<()> {
    let seek_mode = source.seek_mode(use_ratio);
    debug!(count = requests.len(), ?seek_mode, ?mode, "retrieving thumbs");

    for (i, request) in requests.iter().enumerate() {
        let grab = match mode {
            RetrievalMode::Direct => {
                grab_direct(source, request.target_frame, seek_mode, config)?
            }
            RetrievalMode::RetrySearch => {
                grab_with_retry(source, request.target_frame, seek_mode, config)?
            }
        };
        on_result(ThumbResult {
            thumb_id: request.thumb_id,
            frame_id: request.frame_id,
            image: grab.image,
            actual_frame: grab.actual_frame,
            is_last: i == requests.len() - 1,
        });
    }
    Ok(())
}
