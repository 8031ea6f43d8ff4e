use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::seek::limit_range;

/// One frame the caller wants as an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbRequest {
    pub thumb_id: Uuid,
    pub frame_id: Uuid,
    pub target_frame: u64,
}

impl ThumbRequest {
    pub fn new(target_frame: u64) -> Self {
        Self {
            thumb_id: Uuid::new_v4(),
            frame_id: Uuid::new_v4(),
            target_frame,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbResult {
    pub thumb_id: Uuid,
    pub frame_id: Uuid,
    /// Encoded image; empty when no frame could be decoded for this slot.
    pub image: Vec<u8>,
    /// Frame the decoder actually delivered, which may differ from the target.
    pub actual_frame: u64,
    pub is_last: bool,
}

impl ThumbResult {
    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RetrievalMode {
    /// One read per target, empty slots stay empty.
    Direct,
    /// Probe neighbouring frames when a target fails to decode.
    #[default]
    RetrySearch,
}

/// A single read attempt of a retry search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub offset: i64,
    pub frame: u64,
}

/// The frames to try for one target: the target itself, then one step further per
/// attempt up to `search_limit`. The walk runs forward unless the target sits within
/// `search_limit` frames of the end, in which case it runs backward. Probes are clamped
/// into the source and clamped repeats are skipped.
#[derive(Debug, Clone)]
pub struct RetrySearch {
    target: u64,
    last_frame: u64,
    search_limit: u64,
    step: i64,
    next_offset: u64,
    previous_frame: Option<u64>,
}

impl RetrySearch {
    pub fn new(target: u64, frame_count: u64, search_limit: u64) -> Self {
        let step = if target < frame_count.saturating_sub(search_limit) {
            1
        } else {
            -1
        };
        Self {
            target,
            last_frame: frame_count.saturating_sub(1),
            search_limit,
            step,
            next_offset: 0,
            previous_frame: None,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.step > 0
    }
}

impl Iterator for RetrySearch {
    type Item = Probe;

    fn next(&mut self) -> Option<Probe> {
        while self.next_offset <= self.search_limit {
            let offset = self.next_offset as i64 * self.step;
            self.next_offset += 1;
            let frame = limit_range(self.target as i64 + offset, 0, self.last_frame);
            if self.previous_frame == Some(frame) {
                continue;
            }
            self.previous_frame = Some(frame);
            return Some(Probe { offset, frame });
        }
        None
    }
}
