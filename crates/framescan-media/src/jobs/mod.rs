//! The five job kinds. Every job drives one `VideoSource` strictly sequentially: seek, read,
//! measure, decide, and only then issue the next seek.

pub mod details;
pub mod fade;
pub mod poster;
pub mod scene;
pub mod thumbs;

use framescan_core::config::AnalysisConfig;
use framescan_core::job::{EventSink, JobEvent, JobKind, JobRequest};
use framescan_core::source::FrameSource;
use tracing::{debug, error};

use crate::error::Result;
use crate::reporter::Reporter;
use crate::source::VideoSource;

/// Run one job against an already opened source, reporting through `sink`.
///
/// Undecodable frames never fail a job. Any other error is reported as a failure message
/// plus a `JobFailed` event and returned.
pub fn run_job<S: FrameSource>(
    source: &mut VideoSource<S>,
    request: &JobRequest,
    config: &AnalysisConfig,
    sink: &dyn EventSink,
) -> Result<()> {
    let reporter = Reporter::new(request.source_id, sink);
    debug!(
        job = request.kind.name(),
        source_id = %request.source_id,
        path = %request.path.display(),
        "starting job"
    );

    let result = dispatch(source, request, config, &reporter);
    if let Err(e) = &result {
        error!(job = request.kind.name(), source_id = %request.source_id, "job failed: {e}");
        reporter.job_failed(request.kind.name(), e.to_string());
    }
    result
}

fn dispatch<S: FrameSource>(
    source: &mut VideoSource<S>,
    request: &JobRequest,
    config: &AnalysisConfig,
    reporter: &Reporter<'_>,
) -> Result<()> {
    let source_id = request.source_id;
    match &request.kind {
        JobKind::FileDetails { poster_frame_id } => {
            reporter.emit(JobEvent::FileDetails {
                source_id,
                path: request.path.clone(),
                poster_frame_id: *poster_frame_id,
                details: details::file_details(source),
            });
        }
        JobKind::PosterFrame { poster_frame_id } => {
            let poster = poster::poster_frame(source, &config.retrieval)?;
            reporter.emit(JobEvent::PosterFrame {
                source_id,
                path: request.path.clone(),
                poster_frame_id: *poster_frame_id,
                image: poster.image,
                frame: poster.frame,
                uses_ratio: poster.uses_ratio,
            });
        }
        JobKind::FadeBoundary {
            use_ratio,
            detect,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(config.fade.threshold);
            let boundary =
                fade::fade_boundary(source, *use_ratio, *detect, threshold, &config.fade, reporter)?;
            reporter.emit(JobEvent::FadeBoundary {
                source_id,
                boundary,
            });
        }
        JobKind::SceneScan {
            use_ratio,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(config.scene.threshold);
            let scan = scene::scene_scan(source, *use_ratio, threshold, &config.scene, reporter)?;
            reporter.emit(JobEvent::SceneScan { source_id, scan });
        }
        JobKind::Thumbs {
            requests,
            use_ratio,
            mode,
        } => {
            if requests.is_empty() {
                reporter.warning("No frames requested", Some(3000));
                return Ok(());
            }
            thumbs::retrieve_thumbs(
                source,
                requests,
                *use_ratio,
                *mode,
                &config.retrieval,
                |result| reporter.emit(JobEvent::Thumb { source_id, result }),
            )?;
        }
    }
    Ok(())
}
