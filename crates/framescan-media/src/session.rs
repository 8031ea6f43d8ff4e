use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use framescan_core::config::AnalysisConfig;
use framescan_core::job::{EventSink, JobRequest};
use framescan_core::source::SourceOpener;
use rayon::prelude::*;
use tracing::{debug, error};

use crate::error::{MediaError, Result};
use crate::jobs::run_job;
use crate::reporter::Reporter;
use crate::source::VideoSource;

type SharedSource<S> = Arc<Mutex<VideoSource<S>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry key for `path`: the canonical path when the file exists, the path as given
/// otherwise.
fn source_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Keeps sources open between jobs and serializes access per path.
///
/// Each file maps to one `VideoSource` behind its own lock, keyed by canonical path, so two
/// jobs on the same file never decode at the same time while jobs on different files run
/// independently. The source (and with it the ratio seek flag) lives until `close` is
/// called.
pub struct Session<O: SourceOpener> {
    opener: O,
    config: AnalysisConfig,
    sources: Mutex<HashMap<PathBuf, SharedSource<O::Source>>>,
}

impl<O: SourceOpener> Session<O> {
    pub fn new(opener: O, config: AnalysisConfig) -> Self {
        Self {
            opener,
            config,
            sources: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn acquire(&self, path: &Path) -> Result<SharedSource<O::Source>> {
        let key = source_key(path);
        if let Some(existing) = lock(&self.sources).get(&key) {
            return Ok(Arc::clone(existing));
        }

        // Open outside the registry lock; a concurrent opener of the same file loses.
        let opened = self.opener.open(path).map_err(MediaError::from)?;
        let shared = Arc::new(Mutex::new(VideoSource::new(path, opened)));
        let mut sources = lock(&self.sources);
        let entry = sources.entry(key).or_insert(shared);
        Ok(Arc::clone(entry))
    }

    /// Run one job. Failures are reported through `sink` and also returned.
    pub fn run(&self, request: &JobRequest, sink: &dyn EventSink) -> Result<()> {
        let source = match self.acquire(&request.path) {
            Ok(source) => source,
            Err(e) => {
                error!(path = %request.path.display(), "open failed: {e}");
                Reporter::new(request.source_id, sink).open_failed(&request.path);
                return Err(e);
            }
        };

        let mut guard = lock(&source);
        run_job(&mut *guard, request, &self.config, sink)
    }

    /// Run a batch. Requests on the same path run in submission order; different paths
    /// run in parallel.
    pub fn run_all(&self, requests: &[JobRequest], sink: &dyn EventSink) -> Vec<Result<()>>
    where
        O: Sync,
    {
        let mut groups: Vec<(PathBuf, Vec<usize>)> = Vec::new();
        for (i, request) in requests.iter().enumerate() {
            let key = source_key(&request.path);
            match groups.iter_mut().find(|(path, _)| *path == key) {
                Some((_, indices)) => indices.push(i),
                None => groups.push((key, vec![i])),
            }
        }
        debug!(jobs = requests.len(), files = groups.len(), "running batch");

        let mut outcomes: Vec<(usize, Result<()>)> = groups
            .par_iter()
            .flat_map_iter(|(_, indices)| {
                indices
                    .iter()
                    .map(|&i| (i, self.run(&requests[i], sink)))
                    .collect::<Vec<_>>()
            })
            .collect();
        outcomes.sort_by_key(|(i, _)| *i);
        outcomes.into_iter().map(|(_, r)| r).collect()
    }

    /// Ratio seek flag of an open source, `None` if the path is not open.
    pub fn uses_ratio_seek(&self, path: &Path) -> Option<bool> {
        let source = lock(&self.sources).get(&source_key(path)).cloned()?;
        let flag = lock(&source).uses_ratio_seek();
        Some(flag)
    }

    pub fn is_open(&self, path: &Path) -> bool {
        lock(&self.sources).contains_key(&source_key(path))
    }

    pub fn open_count(&self) -> usize {
        lock(&self.sources).len()
    }

    /// Drop the source for `path`. A job still holding it finishes first.
    pub fn close(&self, path: &Path) -> bool {
        lock(&self.sources).remove(&source_key(path)).is_some()
    }
}
