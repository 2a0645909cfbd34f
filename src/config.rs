//! Plugin configuration
//!
//! Which extraction strategy and placement policy a deployment uses is a
//! configuration choice, never a runtime fallback. Values resolve in order:
//! defaults, then an optional JSON file, then `STROKE_OUTLINE_*` env vars.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OutlineError, Result};
use crate::extract::ExtractionStrategy;
use crate::placement::PlacementMode;

pub const ENV_EXTRACTION: &str = "STROKE_OUTLINE_EXTRACTION";
pub const ENV_PLACEMENT: &str = "STROKE_OUTLINE_PLACEMENT";
pub const ENV_EXPORT_SCALE: &str = "STROKE_OUTLINE_EXPORT_SCALE";

/// Super-sampling factor used when rasterizing a layer
pub const DEFAULT_EXPORT_SCALE: f64 = 4.0;

/// Horizontal gap between the original layer and a contained result
pub const DEFAULT_RESULT_GAP: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub extraction: ExtractionStrategy,
    pub placement: PlacementMode,
    pub export_scale: f64,
    pub result_gap: f64,
    pub result_name: String,
    pub success_message: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionStrategy::Fill,
            placement: PlacementMode::Contain,
            export_scale: DEFAULT_EXPORT_SCALE,
            result_gap: DEFAULT_RESULT_GAP,
            result_name: "Stroked Image".to_string(),
            success_message: "Outline added!".to_string(),
        }
    }
}

impl PluginConfig {
    /// Rasterize the layer as rendered and overlay the result exactly on it
    pub fn rendered_overlay() -> Self {
        Self {
            extraction: ExtractionStrategy::Export,
            placement: PlacementMode::Overlay,
            ..Self::default()
        }
    }

    /// Resolve the effective configuration
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process env in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_EXTRACTION) {
            self.extraction =
                ExtractionStrategy::from_str(&value).ok_or_else(|| OutlineError::InvalidConfig {
                    reason: format!("{} must be 'fill' or 'export', got '{}'", ENV_EXTRACTION, value),
                })?;
        }

        if let Some(value) = lookup(ENV_PLACEMENT) {
            self.placement =
                PlacementMode::from_str(&value).ok_or_else(|| OutlineError::InvalidConfig {
                    reason: format!(
                        "{} must be 'contain' or 'overlay', got '{}'",
                        ENV_PLACEMENT, value
                    ),
                })?;
        }

        if let Some(value) = lookup(ENV_EXPORT_SCALE) {
            self.export_scale = value.trim().parse().map_err(|_| OutlineError::InvalidConfig {
                reason: format!("{} must be a number, got '{}'", ENV_EXPORT_SCALE, value),
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.export_scale.is_finite() || self.export_scale <= 0.0 {
            return Err(OutlineError::InvalidConfig {
                reason: format!("export_scale must be positive, got {}", self.export_scale),
            });
        }
        if !self.result_gap.is_finite() || self.result_gap < 0.0 {
            return Err(OutlineError::InvalidConfig {
                reason: format!("result_gap must not be negative, got {}", self.result_gap),
            });
        }
        if self.result_name.trim().is_empty() {
            return Err(OutlineError::InvalidConfig {
                reason: "result_name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
