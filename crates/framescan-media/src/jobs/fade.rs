use std::time::Instant;

use framescan_core::config::FadeConfig;
use framescan_core::fade::{FadeBoundary, FadeScan, FadeStep};
use framescan_core::source::FrameSource;
use tracing::debug;

use crate::error::Result;
use crate::reporter::Reporter;
use crate::sampler::sample;
use crate::source::VideoSource;

/// Find the fade-in and fade-out frames of a source.
///
/// With `detect` off this returns the whole source without touching the decoder.
pub fn fade_boundary<S: FrameSource>(
    source: &mut VideoSource<S>,
    use_ratio: bool,
    detect: bool,
    threshold: f64,
    config: &FadeConfig,
    reporter: &Reporter<'_>,
) -> Result<FadeBoundary> {
    if !detect {
        debug!("in/out point detection disabled");
        return Ok(FadeBoundary::full(source.frame_count()));
    }

    let started = Instant::now();
    reporter.info("Detecting in and outpoint", None);

    let mut scan = FadeScan::new(source.frame_count(), config.search_length, threshold);
    let mode = source.seek_mode(use_ratio);
    let scale = config.frame_scale();

    let mut expected = scan.start_frame();
    if !scan.is_finished() {
        source.seek_frame(expected, mode)?;
    }

    while !scan.is_finished() {
        let sample = sample(source, expected, scale)?;
        debug!(
            frame = sample.frame_index,
            brightness = ?sample.brightness(),
            "fade sample"
        );
        let step = scan.record(sample);

        // Every other frame is enough for a progress bar.
        if scan.frames_scanned() % 2 == 0 {
            reporter.progress(scan.progress_percent());
        }

        match step {
            FadeStep::Continue => expected += 1,
            FadeStep::Reposition(frame) => {
                debug!(frame, "head scan done, resetting playhead");
                source.seek_frame(frame, mode)?;
                expected = frame;
            }
            FadeStep::Finished => break,
        }
    }

    let boundary = scan.boundary();
    debug!(
        in_frame = boundary.in_frame,
        out_frame = boundary.out_frame,
        "fade boundary resolved"
    );

    reporter.progress(100.0);
    reporter.info(
        format!(
            "In and Outpoint detection finished - {}ms",
            started.elapsed().as_millis()
        ),
        Some(3000),
    );
    Ok(boundary)
}
