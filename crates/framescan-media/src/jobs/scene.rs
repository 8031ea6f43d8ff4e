use std::time::Instant;

use framescan_core::config::SceneConfig;
use framescan_core::scene::{CutDetector, SceneScan};
use framescan_core::source::FrameSource;
use tracing::debug;

use crate::error::Result;
use crate::reporter::Reporter;
use crate::sampler::sample;
use crate::source::VideoSource;

/// Scan every frame in order and collect hard cuts plus a per-frame brightness list.
pub fn scene_scan<S: FrameSource>(
    source: &mut VideoSource<S>,
    use_ratio: bool,
    threshold: f64,
    config: &SceneConfig,
    reporter: &Reporter<'_>,
) -> Result<SceneScan> {
    let started = Instant::now();
    let frame_count = source.frame_count();
    let scale = config.frame_scale();
    let interval = config.progress_interval.max(1);
    let mut detector = CutDetector::new(threshold, config.min_scene_length);

    let mode = source.seek_mode(use_ratio);
    source.seek_frame(0, mode)?;

    for frame in 0..frame_count {
        if frame % interval == 0 {
            reporter.progress(frame as f64 / frame_count as f64 * 100.0);
            debug!(frame, position_ms = source.position_ms(), of = frame_count, "scanning");
        }
        let sample = sample(source, frame, scale)?;
        if let Some(cut) = detector.observe(sample) {
            debug!(frame = cut.frame, "scene cut");
        }
    }

    let elapsed = started.elapsed();
    let per_frame_ms = if frame_count > 0 {
        elapsed.as_secs_f64() * 1000.0 / frame_count as f64
    } else {
        0.0
    };
    let scan = detector.finish();

    reporter.progress(100.0);
    reporter.info(
        format!(
            "File scanning finished - {:.3}s - speed: {:.3}ms/frame - {} cuts",
            elapsed.as_secs_f64(),
            per_frame_ms,
            scan.cuts.len()
        ),
        Some(6000),
    );
    Ok(scan)
}
