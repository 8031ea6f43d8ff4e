use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fade::FadeBoundary;
use crate::retrieval::{RetrievalMode, ThumbRequest, ThumbResult};
use crate::scene::SceneScan;

fn default_true() -> bool {
    true
}

/// A unit of work against one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub source_id: Uuid,
    pub path: PathBuf,
    #[serde(flatten)]
    pub kind: JobKind,
}

impl JobRequest {
    pub fn new(source_id: Uuid, path: impl Into<PathBuf>, kind: JobKind) -> Self {
        Self {
            source_id,
            path: path.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobKind {
    /// Report frame count, dimensions, frame rate and codec.
    FileDetails { poster_frame_id: Uuid },
    /// Grab the middle frame and check whether frame-index seeking can be trusted.
    PosterFrame { poster_frame_id: Uuid },
    /// Locate fade-in and fade-out frames.
    FadeBoundary {
        #[serde(default)]
        use_ratio: bool,
        #[serde(default = "default_true")]
        detect: bool,
        #[serde(default)]
        threshold: Option<f64>,
    },
    /// Scan every frame for hard cuts.
    SceneScan {
        #[serde(default)]
        use_ratio: bool,
        #[serde(default)]
        threshold: Option<f64>,
    },
    /// Decode a list of frames into images.
    Thumbs {
        requests: Vec<ThumbRequest>,
        #[serde(default)]
        use_ratio: bool,
        #[serde(default)]
        mode: RetrievalMode,
    },
}

impl JobKind {
    pub fn name(&self) -> &'static str {
        match self {
            JobKind::FileDetails { .. } => "file-details",
            JobKind::PosterFrame { .. } => "poster-frame",
            JobKind::FadeBoundary { .. } => "fade-boundary",
            JobKind::SceneScan { .. } => "scene-scan",
            JobKind::Thumbs { .. } => "thumbs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDetails {
    pub frame_count: u64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec_tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Everything a job reports back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JobEvent {
    Progress {
        source_id: Uuid,
        percent: f64,
    },
    Message {
        source_id: Uuid,
        level: MessageLevel,
        text: String,
        /// How long a UI should keep the message up.
        duration_ms: Option<u64>,
    },
    OpenFailed {
        source_id: Uuid,
    },
    JobFailed {
        source_id: Uuid,
        reason: String,
    },
    FileDetails {
        source_id: Uuid,
        path: PathBuf,
        poster_frame_id: Uuid,
        details: FileDetails,
    },
    PosterFrame {
        source_id: Uuid,
        path: PathBuf,
        poster_frame_id: Uuid,
        image: Vec<u8>,
        frame: u64,
        uses_ratio: bool,
    },
    FadeBoundary {
        source_id: Uuid,
        boundary: FadeBoundary,
    },
    SceneScan {
        source_id: Uuid,
        scan: SceneScan,
    },
    Thumb {
        source_id: Uuid,
        result: ThumbResult,
    },
}

impl JobEvent {
    pub fn source_id(&self) -> Uuid {
        match self {
            JobEvent::Progress { source_id, .. }
            | JobEvent::Message { source_id, .. }
            | JobEvent::OpenFailed { source_id }
            | JobEvent::JobFailed { source_id, .. }
            | JobEvent::FileDetails { source_id, .. }
            | JobEvent::PosterFrame { source_id, .. }
            | JobEvent::FadeBoundary { source_id, .. }
            | JobEvent::SceneScan { source_id, .. }
            | JobEvent::Thumb { source_id, .. } => *source_id,
        }
    }

    /// True for the last event a job emits.
    pub fn is_terminal(&self) -> bool {
        match self {
            JobEvent::Progress { .. } | JobEvent::Message { .. } => false,
            JobEvent::Thumb { result, .. } => result.is_last,
            _ => true,
        }
    }
}

/// Receives progress, messages and results. Passed into every job.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: JobEvent);
}

impl<F> EventSink for F
where
    F: Fn(JobEvent) + Send + Sync,
{
    fn emit(&self, event: JobEvent) {
        self(event)
    }
}
