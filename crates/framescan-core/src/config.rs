use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::source::FrameScale;

/// Fade (in/out point) detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Frames scanned at each end, capped at half the source.
    pub search_length: u64,
    /// V-channel mean a frame must reach to count as content.
    pub threshold: f64,
    /// Downscale factor applied before measuring.
    pub scale_factor: f64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            search_length: 120,
            threshold: 20.0,
            scale_factor: 0.25,
        }
    }
}

impl FadeConfig {
    pub fn frame_scale(&self) -> FrameScale {
        FrameScale::Factor(self.scale_factor)
    }
}

/// Scene cut detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub threshold: f64,
    pub min_scene_length: u64,
    /// Longest side of the frame after downscaling.
    pub max_dimension: u32,
    /// Emit a progress event every this many frames.
    pub progress_interval: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            min_scene_length: 15,
            max_dimension: 240,
            progress_interval: 100,
        }
    }
}

impl SceneConfig {
    pub fn frame_scale(&self) -> FrameScale {
        FrameScale::MaxDimension(self.max_dimension)
    }
}

/// Thumbnail and poster frame retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// How far to step away from an undecodable target before giving up.
    pub search_limit: u64,
    pub jpeg_quality: u8,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            search_limit: 25,
            jpeg_quality: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub fade: FadeConfig,
    pub scene: SceneConfig,
    pub retrieval: RetrievalConfig,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fade.scale_factor > 0.0 && self.fade.scale_factor <= 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "fade.scale_factor must be in (0, 1], got {}",
                self.fade.scale_factor
            )));
        }
        if self.scene.max_dimension == 0 {
            return Err(CoreError::InvalidConfig(
                "scene.max_dimension must be positive".into(),
            ));
        }
        if self.scene.min_scene_length == 0 {
            return Err(CoreError::InvalidConfig(
                "scene.min_scene_length must be positive".into(),
            ));
        }
        if self.scene.progress_interval == 0 {
            return Err(CoreError::InvalidConfig(
                "scene.progress_interval must be positive".into(),
            ));
        }
        if !(1..=100).contains(&self.retrieval.jpeg_quality) {
            return Err(CoreError::InvalidConfig(format!(
                "retrieval.jpeg_quality must be in 1..=100, got {}",
                self.retrieval.jpeg_quality
            )));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
