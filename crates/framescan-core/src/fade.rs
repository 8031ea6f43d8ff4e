use serde::{Deserialize, Serialize};

use crate::sample::FrameSample;

/// Where the content starts and ends once fades are trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeBoundary {
    pub in_frame: u64,
    pub out_frame: u64,
}

impl FadeBoundary {
    /// Builds a boundary, swapping the ends if they arrive reversed.
    pub fn new(in_frame: u64, out_frame: u64) -> Self {
        Self {
            in_frame: in_frame.min(out_frame),
            out_frame: in_frame.max(out_frame),
        }
    }

    /// The whole source, used when detection is switched off.
    pub fn full(frame_count: u64) -> Self {
        Self::new(0, frame_count.saturating_sub(1))
    }
}

/// Number of frames scanned at each end: the configured length, capped at half the source.
pub fn search_length(configured: u64, frame_count: u64) -> u64 {
    configured.min(frame_count / 2)
}

/// Walk `samples` in the given order, returning the first frame brighter than `threshold`,
/// or the brightest frame if none crosses it. Ties on brightness go to the later entry.
fn resolve<'a>(
    samples: impl Iterator<Item = &'a FrameSample>,
    threshold: f64,
    fallback_frame: u64,
) -> u64 {
    let mut brightest = (fallback_frame, 0.0);
    for sample in samples {
        let Some(value) = sample.brightness() else {
            continue;
        };
        if value > threshold {
            return sample.frame_index;
        }
        if value >= brightest.1 {
            brightest = (sample.frame_index, value);
        }
    }
    brightest.0
}

/// Resolve the fade-in frame from samples taken at the head of the source.
pub fn resolve_in_point(samples: &[FrameSample], threshold: f64) -> u64 {
    resolve(samples.iter(), threshold, 0)
}

/// Resolve the fade-out frame from samples taken at the tail, scanning right to left.
pub fn resolve_out_point(samples: &[FrameSample], threshold: f64, last_frame: u64) -> u64 {
    resolve(samples.iter().rev(), threshold, last_frame)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Inpoint,
    Outpoint,
    Done,
}

/// What the scan driver should do after a sample was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStep {
    /// Read the next frame in sequence.
    Continue,
    /// The head scan is over; seek to this frame and continue reading.
    Reposition(u64),
    /// Both ends have been scanned.
    Finished,
}

/// Accumulates the two sub-scans of fade detection over a single decode stream.
///
/// The head scan stops once a frame reaches the threshold or `search_length` frames have
/// been read. The tail scan covers `frame_count - 1 - search_length ..= frame_count - 1`.
#[derive(Debug, Clone)]
pub struct FadeScan {
    frame_count: u64,
    search_length: u64,
    threshold: f64,
    phase: Phase,
    head: Vec<FrameSample>,
    tail: Vec<FrameSample>,
    scanned: u64,
}

impl FadeScan {
    pub fn new(frame_count: u64, configured_search_length: u64, threshold: f64) -> Self {
        let search_length = search_length(configured_search_length, frame_count);
        let phase = if frame_count == 0 {
            Phase::Done
        } else if search_length == 0 {
            Phase::Outpoint
        } else {
            Phase::Inpoint
        };
        Self {
            frame_count,
            search_length,
            threshold,
            phase,
            head: Vec::new(),
            tail: Vec::new(),
            scanned: 0,
        }
    }

    pub fn search_length(&self) -> u64 {
        self.search_length
    }

    /// First frame of the tail scan.
    pub fn outpoint_start(&self) -> u64 {
        self.frame_count
            .saturating_sub(1)
            .saturating_sub(self.search_length)
    }

    fn outpoint_len(&self) -> u64 {
        self.frame_count - self.outpoint_start()
    }

    /// Frame the driver must seek to before the first read.
    pub fn start_frame(&self) -> u64 {
        match self.phase {
            Phase::Inpoint => 0,
            _ => self.outpoint_start(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Frames recorded so far across both sub-scans.
    pub fn frames_scanned(&self) -> u64 {
        self.scanned
    }

    /// Progress in percent, relative to two full search windows.
    pub fn progress_percent(&self) -> f64 {
        if self.search_length == 0 {
            return 0.0;
        }
        (self.scanned as f64 / (self.search_length * 2) as f64 * 100.0).min(100.0)
    }

    pub fn record(&mut self, sample: FrameSample) -> FadeStep {
        match self.phase {
            Phase::Inpoint => {
                self.scanned += 1;
                let bright_enough = sample.brightness().is_some_and(|v| v >= self.threshold);
                self.head.push(sample);
                if bright_enough || self.head.len() as u64 >= self.search_length {
                    self.phase = Phase::Outpoint;
                    FadeStep::Reposition(self.outpoint_start())
                } else {
                    FadeStep::Continue
                }
            }
            Phase::Outpoint => {
                self.scanned += 1;
                self.tail.push(sample);
                if self.tail.len() as u64 >= self.outpoint_len() {
                    self.phase = Phase::Done;
                    FadeStep::Finished
                } else {
                    FadeStep::Continue
                }
            }
            Phase::Done => FadeStep::Finished,
        }
    }

    pub fn head_samples(&self) -> &[FrameSample] {
        &self.head
    }

    pub fn tail_samples(&self) -> &[FrameSample] {
        &self.tail
    }

    /// Resolve both ends from whatever has been recorded.
    pub fn boundary(&self) -> FadeBoundary {
        let last = self.frame_count.saturating_sub(1);
        FadeBoundary::new(
            resolve_in_point(&self.head, self.threshold),
            resolve_out_point(&self.tail, self.threshold, last),
        )
    }
}
