use std::sync::Mutex;

use framescan_core::fade::FadeBoundary;
use framescan_core::job::{EventSink, FileDetails, JobEvent, MessageLevel};
use framescan_core::retrieval::ThumbResult;
use framescan_core::scene::SceneScan;

/// Event sink that keeps everything it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<JobEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<JobEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn progress(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                JobEvent::Progress { percent, .. } => Some(percent),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self, level: MessageLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                JobEvent::Message { level: l, text, .. } if l == level => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn thumbs(&self) -> Vec<ThumbResult> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                JobEvent::Thumb { result, .. } => Some(result),
                _ => None,
            })
            .collect()
    }

    pub fn fade_boundary(&self) -> Option<FadeBoundary> {
        self.events().into_iter().find_map(|e| match e {
            JobEvent::FadeBoundary { boundary, .. } => Some(boundary),
            _ => None,
        })
    }

    pub fn scene_scan(&self) -> Option<SceneScan> {
        self.events().into_iter().find_map(|e| match e {
            JobEvent::SceneScan { scan, .. } => Some(scan),
            _ => None,
        })
    }

    pub fn file_details(&self) -> Option<FileDetails> {
        self.events().into_iter().find_map(|e| match e {
            JobEvent::FileDetails { details, .. } => Some(details),
            _ => None,
        })
    }

    /// Image, frame and ratio flag of the first poster frame event.
    pub fn poster_frame(&self) -> Option<(Vec<u8>, u64, bool)> {
        self.events().into_iter().find_map(|e| match e {
            JobEvent::PosterFrame {
                image,
                frame,
                uses_ratio,
                ..
            } => Some((image, frame, uses_ratio)),
            _ => None,
        })
    }

    pub fn terminal_events(&self) -> Vec<JobEvent> {
        self.events().into_iter().filter(|e| e.is_terminal()).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: JobEvent) {
        self.events.lock().unwrap().push(event);
    }
}
