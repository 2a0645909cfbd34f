//! Export-based extraction
//!
//! Rasterizes the layer exactly as rendered on canvas, including crop, mask
//! and visual adjustments, at a fixed super-sampling factor.

use super::{AssetExtractor, ExtractionStrategy, ImageAsset};
use crate::config::DEFAULT_EXPORT_SCALE;
use crate::error::{OutlineError, Result};
use crate::host::{Document, ExportFormat, ExportSettings, Layer};

/// Exports the selected layer through the host renderer
#[derive(Debug, Clone, Copy)]
pub struct NodeExporter {
    settings: ExportSettings,
}

impl NodeExporter {
    pub fn new() -> Self {
        Self::with_scale(DEFAULT_EXPORT_SCALE)
    }

    pub fn with_scale(scale: f64) -> Self {
        Self {
            settings: ExportSettings {
                format: ExportFormat::Png,
                scale,
            },
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }
}

impl Default for NodeExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetExtractor for NodeExporter {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Export
    }

    fn extract(&self, layer: &Layer, document: &dyn Document) -> Result<ImageAsset> {
        if !layer.exportable {
            return Err(OutlineError::ExportUnsupported);
        }

        let bytes = document
            .export_layer(&layer.id, &self.settings)
            .map_err(|e| OutlineError::ExportFailed {
                reason: e.to_string(),
            })?;

        if bytes.is_empty() {
            return Err(OutlineError::ExportFailed {
                reason: "export produced no data".to_string(),
            });
        }

        tracing::debug!(
            layer = %layer.id,
            scale = self.settings.scale,
            bytes = bytes.len(),
            "exported layer"
        );

        Ok(ImageAsset::new(bytes, layer.frame.width, layer.frame.height)
            .with_source_scale(self.settings.scale))
    }
}
