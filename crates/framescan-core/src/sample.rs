use serde::{Deserialize, Serialize};

use crate::color::ColorVector;

/// One measured frame. A `None` mean marks a frame that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    pub frame_index: u64,
    pub mean: Option<ColorVector>,
}

impl FrameSample {
    pub fn new(frame_index: u64, mean: ColorVector) -> Self {
        Self {
            frame_index,
            mean: Some(mean),
        }
    }

    pub fn empty(frame_index: u64) -> Self {
        Self {
            frame_index,
            mean: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_none()
    }

    pub fn brightness(&self) -> Option<f64> {
        self.mean.map(|m| m.brightness())
    }
}
