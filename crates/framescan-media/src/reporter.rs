use framescan_core::job::{EventSink, JobEvent, MessageLevel};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Thin wrapper that tags every event with the job's source id.
pub struct Reporter<'a> {
    source_id: Uuid,
    sink: &'a dyn EventSink,
}

impl<'a> Reporter<'a> {
    pub fn new(source_id: Uuid, sink: &'a dyn EventSink) -> Self {
        Self { source_id, sink }
    }

    pub fn source_id(&self) -> Uuid {
        self.source_id
    }

    pub fn emit(&self, event: JobEvent) {
        self.sink.emit(event);
    }

    pub fn progress(&self, percent: f64) {
        self.emit(JobEvent::Progress {
            source_id: self.source_id,
            percent: percent.clamp(0.0, 100.0),
        });
    }

    pub fn message(&self, level: MessageLevel, text: impl Into<String>, duration_ms: Option<u64>) {
        let text = text.into();
        match level {
            MessageLevel::Info => info!(source_id = %self.source_id, "{text}"),
            MessageLevel::Warning => warn!(source_id = %self.source_id, "{text}"),
            MessageLevel::Error => error!(source_id = %self.source_id, "{text}"),
        }
        self.emit(JobEvent::Message {
            source_id: self.source_id,
            level,
            text,
            duration_ms,
        });
    }

    pub fn info(&self, text: impl Into<String>, duration_ms: Option<u64>) {
        self.message(MessageLevel::Info, text, duration_ms);
    }

    pub fn warning(&self, text: impl Into<String>, duration_ms: Option<u64>) {
        self.message(MessageLevel::Warning, text, duration_ms);
    }

    pub fn open_failed(&self, path: &std::path::Path) {
        self.message(
            MessageLevel::Error,
            format!("Failed to open {}", path.display()),
            Some(3000),
        );
        self.emit(JobEvent::OpenFailed {
            source_id: self.source_id,
        });
    }

    pub fn job_failed(&self, job: &str, reason: impl Into<String>) {
        let reason = reason.into();
        self.message(MessageLevel::Error, format!("{job} failed: {reason}"), Some(3000));
        self.emit(JobEvent::JobFailed {
            source_id: self.source_id,
            reason,
        });
    }
}
