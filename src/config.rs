use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub gesture: GestureConfig,
    pub gaze: GazeConfig,
    pub expression: ExpressionConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Fraction of the torso length above the hip line a left wrist has to reach.
    pub hip_bias: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { hip_bias: 0.2 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// Half-angle of the field-of-view cone, in degrees.
    pub cone_half_angle_deg: f32,
}

impl GazeConfig {
    pub fn cone_half_angle(&self) -> f32 {
        self.cone_half_angle_deg.to_radians()
    }
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            cone_half_angle_deg: 30.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    /// Lip gap over mouth width above which the mouth counts as open.
    pub mouth_open_ratio: f32,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            mouth_open_ratio: 0.4,
        }
    }
}

impl FusionConfig {
    /// Loads a JSON config file; missing sections and fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: FusionConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        log::info!("loaded fusion config from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
