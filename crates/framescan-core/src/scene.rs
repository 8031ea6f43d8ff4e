use serde::{Deserialize, Serialize};

use crate::color::ColorVector;
use crate::sample::FrameSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneCut {
    pub frame: u64,
}

/// Cuts in strictly increasing frame order, spaced at least `min_scene_length` apart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneCutList {
    cuts: Vec<SceneCut>,
}

impl SceneCutList {
    pub fn new() -> Self {
        Self { cuts: Vec::new() }
    }

    pub fn cuts(&self) -> &[SceneCut] {
        &self.cuts
    }

    pub fn frames(&self) -> Vec<u64> {
        self.cuts.iter().map(|c| c.frame).collect()
    }

    pub fn last(&self) -> Option<SceneCut> {
        self.cuts.last().copied()
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

/// Brightness of one scanned frame, kept for timeline visualization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMetric {
    pub frame: u64,
    pub brightness: Option<f64>,
}

/// Terminal output of a scene scan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneScan {
    pub cuts: SceneCutList,
    pub metrics: Vec<FrameMetric>,
}

/// Streaming hard-cut detector fed one frame at a time in ascending order.
///
/// The delta between consecutive frames is the average of the absolute H, S and V
/// differences. The comparison baseline starts at black, so a bright first frame can
/// register a cut at frame 0. Undecodable frames are recorded as gaps and leave the
/// baseline untouched.
#[derive(Debug, Clone)]
pub struct CutDetector {
    threshold: f64,
    min_scene_length: u64,
    previous: ColorVector,
    result: SceneScan,
}

impl CutDetector {
    pub fn new(threshold: f64, min_scene_length: u64) -> Self {
        Self {
            threshold,
            min_scene_length,
            previous: ColorVector::ZERO,
            result: SceneScan::default(),
        }
    }

    /// Feed the next frame. Returns the cut if one was registered at this frame.
    pub fn observe(&mut self, sample: FrameSample) -> Option<SceneCut> {
        self.result.metrics.push(FrameMetric {
            frame: sample.frame_index,
            brightness: sample.brightness(),
        });

        let mean = sample.mean?;
        let delta = mean.abs_diff(&self.previous).channel_average();
        self.previous = mean;

        if delta < self.threshold {
            return None;
        }
        let spaced = match self.result.cuts.last() {
            None => true,
            Some(last) => sample.frame_index >= last.frame + self.min_scene_length,
        };
        if !spaced {
            return None;
        }

        let cut = SceneCut {
            frame: sample.frame_index,
        };
        self.result.cuts.cuts.push(cut);
        Some(cut)
    }

    pub fn cuts(&self) -> &SceneCutList {
        &self.result.cuts
    }

    pub fn frames_observed(&self) -> usize {
        self.result.metrics.len()
    }

    pub fn finish(self) -> SceneScan {
        self.result
    }
}

/// Run the detector over an already collected sample sequence.
pub fn detect_cuts(samples: &[FrameSample], threshold: f64, min_scene_length: u64) -> SceneScan {
    let mut detector = CutDetector::new(threshold, min_scene_length);
    for sample in samples {
        detector.observe(*sample);
    }
    detector.finish()
}
