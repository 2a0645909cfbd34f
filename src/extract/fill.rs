//! Fill-based extraction
//!
//! Reads the original, unrendered bytes of an image fill.

use super::{AssetExtractor, ExtractionStrategy, ImageAsset};
use crate::error::{OutlineError, Result};
use crate::host::{Document, Fill, Layer};

/// Pick the image fill to extract from
///
/// Prefers the first image fill not explicitly hidden. Background removal
/// tends to leave the original image as a hidden fill underneath the cutout,
/// and the cutout is what the user sees. Falls back to the first image fill
/// when every image fill is hidden.
pub fn select_image_fill(fills: &[Fill]) -> Option<&Fill> {
    fills
        .iter()
        .find(|fill| fill.is_image() && fill.is_visible())
        .or_else(|| fills.iter().find(|fill| fill.is_image()))
}

/// Extracts the layer's image fill bytes from the host image store
#[derive(Debug, Clone, Copy, Default)]
pub struct FillExtractor;

impl AssetExtractor for FillExtractor {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Fill
    }

    fn extract(&self, layer: &Layer, document: &dyn Document) -> Result<ImageAsset> {
        let fills = layer
            .fills
            .as_deref()
            .ok_or_else(|| OutlineError::UnsupportedLayer {
                reason: format!("layer '{}' has no fills", layer.name),
            })?;

        let image_ref = select_image_fill(fills)
            .and_then(Fill::image_ref)
            .ok_or(OutlineError::NoImageFill)?;

        let bytes = document
            .image_bytes(image_ref)
            .filter(|bytes| !bytes.is_empty())
            .ok_or(OutlineError::ImageDataUnavailable)?;

        tracing::debug!(
            layer = %layer.id,
            image = %image_ref,
            bytes = bytes.len(),
            "extracted image fill"
        );

        Ok(ImageAsset::new(bytes, layer.frame.width, layer.frame.height))
    }
}
