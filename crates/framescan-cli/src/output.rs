use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use framescan_core::job::{EventSink, JobEvent};
use serde_json::{Value, json};
use tracing::error;

/// Writes every event as one JSON line.
///
/// Image bytes never reach the output: with an image directory they are stored as JPEG
/// files and the event carries the file path instead, otherwise the field is dropped.
/// An image that cannot be stored is reported as `image_error` on the same event.
pub struct JsonLineSink<W> {
    out: Mutex<W>,
    image_dir: Option<PathBuf>,
    failures: AtomicUsize,
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(out: W, image_dir: Option<PathBuf>) -> Self {
        Self {
            out: Mutex::new(out),
            image_dir,
            failures: AtomicUsize::new(0),
        }
    }

    /// Events whose image could not be stored or that could not be rendered in full.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn render(&self, event: &JobEvent) -> anyhow::Result<Value> {
        let mut value = serde_json::to_value(event)?;
        let (holder, bytes, name) = match event {
            JobEvent::PosterFrame {
                source_id,
                image,
                poster_frame_id,
                ..
            } => (
                value.as_object_mut(),
                image,
                format!("{source_id}-poster-{poster_frame_id}.jpg"),
            ),
            JobEvent::Thumb { source_id, result } => (
                value.get_mut("result").and_then(Value::as_object_mut),
                &result.image,
                format!("{source_id}-thumb-{}.jpg", result.thumb_id),
            ),
            _ => return Ok(value),
        };

        if let Some(object) = holder {
            object.remove("image");
            match &self.image_dir {
                Some(dir) if !bytes.is_empty() => match store_image(dir, &name, bytes) {
                    Ok(path) => {
                        object.insert("image_path".into(), Value::String(path.display().to_string()));
                    }
                    Err(e) => {
                        error!(source_id = %event.source_id(), "failed to store {name}: {e}");
                        self.failures.fetch_add(1, Ordering::Relaxed);
                        object.insert("image_error".into(), Value::String(e.to_string()));
                    }
                },
                _ => {}
            }
        }
        Ok(value)
    }
}

fn store_image(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    Ok(path)
}

impl<W: Write + Send> EventSink for JsonLineSink<W> {
    fn emit(&self, event: JobEvent) {
        let line = match self.render(&event) {
            Ok(value) => value.to_string(),
            Err(e) => {
                error!(source_id = %event.source_id(), "failed to render event: {e}");
                self.failures.fetch_add(1, Ordering::Relaxed);
                json!({
                    "event": "render_failed",
                    "source_id": event.source_id(),
                    "terminal": event.is_terminal(),
                    "reason": e.to_string(),
                })
                .to_string()
            }
        };
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            error!("failed to write event: {e}");
        }
    }
}
