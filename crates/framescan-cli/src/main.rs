mod args;
mod output;

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use framescan_core::config::AnalysisConfig;
use framescan_core::job::{JobKind, JobRequest};
use framescan_core::retrieval::ThumbRequest;
use framescan_media::decoder::FfmpegOpener;
use framescan_media::session::Session;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::args::{Args, Command};
use crate::output::JsonLineSink;

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    debug!(?config, "analysis settings");

    let requests = requests_for(args.command)?;
    let session = Session::new(FfmpegOpener, config);
    let sink = JsonLineSink::new(io::stdout(), args.output_dir);

    let outcomes = if requests.len() == 1 {
        vec![session.run(&requests[0], &sink)]
    } else {
        session.run_all(&requests, &sink)
    };

    let failed = outcomes.iter().filter(|r| r.is_err()).count();
    let output_failures = sink.failures();
    info!(jobs = outcomes.len(), failed, output_failures, "done");
    if failed > 0 {
        bail!("{failed} of {} jobs failed", outcomes.len());
    }
    if output_failures > 0 {
        bail!("{output_failures} events could not be written in full");
    }
    Ok(())
}

/// Logs go to stderr; stdout is reserved for events.
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn requests_for(command: Command) -> Result<Vec<JobRequest>> {
    let single = |path: PathBuf, kind: JobKind| -> Result<Vec<JobRequest>> {
        Ok(vec![JobRequest::new(Uuid::new_v4(), path, kind)])
    };
    match command {
        Command::Details { input } => single(
            input,
            JobKind::FileDetails {
                poster_frame_id: Uuid::new_v4(),
            },
        ),
        Command::Poster { input } => single(
            input,
            JobKind::PosterFrame {
                poster_frame_id: Uuid::new_v4(),
            },
        ),
        Command::Fade {
            input,
            ratio,
            threshold,
        } => single(
            input,
            JobKind::FadeBoundary {
                use_ratio: ratio,
                detect: true,
                threshold,
            },
        ),
        Command::Scenes {
            input,
            ratio,
            threshold,
        } => single(
            input,
            JobKind::SceneScan {
                use_ratio: ratio,
                threshold,
            },
        ),
        Command::Thumbs {
            input,
            frames,
            ratio,
            mode,
        } => single(
            input,
            JobKind::Thumbs {
                requests: frames.into_iter().map(ThumbRequest::new).collect(),
                use_ratio: ratio,
                mode: mode.into(),
            },
        ),
        Command::Batch { jobs } => {
            let json = fs::read_to_string(&jobs)
                .with_context(|| format!("failed to read {}", jobs.display()))?;
            let requests: Vec<JobRequest> = serde_json::from_str(&json)
                .with_context(|| format!("invalid job list in {}", jobs.display()))?;
            if requests.is_empty() {
                bail!("{} contains no jobs", jobs.display());
            }
            Ok(requests)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_command_builds_one_request() {
        let requests = requests_for(Command::Fade {
            input: PathBuf::from("clip.mp4"),
            ratio: true,
            threshold: None,
        })
        .unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, PathBuf::from("clip.mp4"));
        assert_eq!(
            requests[0].kind,
            JobKind::FadeBoundary {
                use_ratio: true,
                detect: true,
                threshold: None
            }
        );
    }

    #[test]
    fn test_batch_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let jobs = dir.path().join("jobs.json");
        let batch = vec![
            JobRequest::new(
                Uuid::new_v4(),
                "a.mp4",
                JobKind::SceneScan {
                    use_ratio: false,
                    threshold: None,
                },
            ),
            JobRequest::new(
                Uuid::new_v4(),
                "b.mp4",
                JobKind::PosterFrame {
                    poster_frame_id: Uuid::new_v4(),
                },
            ),
        ];
        fs::write(&jobs, serde_json::to_string(&batch).unwrap()).unwrap();

        let requests = requests_for(Command::Batch { jobs }).unwrap();
        assert_eq!(requests, batch);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let jobs = dir.path().join("jobs.json");
        fs::write(&jobs, "[]").unwrap();
        assert!(requests_for(Command::Batch { jobs }).is_err());
    }
}
