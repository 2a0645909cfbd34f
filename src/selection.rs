//! Selection validation
//!
//! Rejects selections the active extraction strategy cannot work with before
//! anything is read from the host.

use crate::error::{OutlineError, Result};
use crate::extract::ExtractionStrategy;
use crate::host::{Layer, Selection};

/// Return the first selected layer if the strategy can extract from it
///
/// # Errors
/// - `EmptySelection` when nothing is selected
/// - `UnsupportedLayer` when the layer has no fills property (fill strategy)
/// - `NoImageFill` when the layer has fills but none of them is an image
/// - `ExportUnsupported` when the layer cannot be rasterized (export strategy)
pub fn validate_selection(selection: &Selection, strategy: ExtractionStrategy) -> Result<&Layer> {
    let layer = selection.first().ok_or(OutlineError::EmptySelection)?;

    match strategy {
        ExtractionStrategy::Fill => {
            if layer.fills.is_none() {
                return Err(OutlineError::UnsupportedLayer {
                    reason: format!("layer '{}' has no fills", layer.name),
                });
            }
            if !layer.has_image_fill() {
                return Err(OutlineError::NoImageFill);
            }
        }
        ExtractionStrategy::Export => {
            if !layer.exportable {
                return Err(OutlineError::ExportUnsupported);
            }
        }
    }

    tracing::debug!(layer = %layer.id, strategy = strategy.as_str(), "selection accepted");
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Fill, Frame, ImageRef, ScaleMode};

    fn frame() -> Frame {
        Frame::new(0.0, 0.0, 100.0, 100.0)
    }

    fn image_layer() -> Layer {
        Layer::new("1:1", "Photo", frame())
            .with_fills(vec![Fill::image(ImageRef("abc".into()), ScaleMode::Fill)])
    }

    #[test]
    fn test_empty_selection() {
        let empty = Selection::empty();
        for strategy in [ExtractionStrategy::Fill, ExtractionStrategy::Export] {
            let result = validate_selection(&empty, strategy);
            assert!(matches!(result, Err(OutlineError::EmptySelection)));
        }
    }

    #[test]
    fn test_only_first_layer_is_considered() {
        let group = Layer::new("1:2", "Group", frame()).without_fills();
        let selection = Selection::new(vec![group, image_layer()]);

        let result = validate_selection(&selection, ExtractionStrategy::Fill);
        assert!(matches!(result, Err(OutlineError::UnsupportedLayer { .. })));
    }

    #[test]
    fn test_fill_strategy_requires_image_fill() {
        let solid = Layer::new("1:3", "Box", frame()).with_fills(vec![Fill::Solid {
            color: [0.0, 0.0, 0.0, 1.0],
            visible: None,
        }]);
        let empty = Layer::new("1:4", "Empty", frame());

        for layer in [solid, empty] {
            let selection = Selection::new(vec![layer]);
            let result = validate_selection(&selection, ExtractionStrategy::Fill);
            assert!(matches!(result, Err(OutlineError::NoImageFill)));
        }
    }

    #[test]
    fn test_fill_strategy_accepts_hidden_image_fill() {
        let layer = Layer::new("1:5", "Cutout", frame())
            .with_fills(vec![Fill::hidden_image(ImageRef("abc".into()))]);
        let selection = Selection::new(vec![layer]);

        let layer = validate_selection(&selection, ExtractionStrategy::Fill).unwrap();
        assert_eq!(layer.id, "1:5");
    }

    #[test]
    fn test_export_strategy_checks_capability() {
        let selection = Selection::new(vec![image_layer().with_exportable(false)]);
        let result = validate_selection(&selection, ExtractionStrategy::Export);
        assert!(matches!(result, Err(OutlineError::ExportUnsupported)));

        // Export does not care about fills
        let group = Layer::new("1:6", "Group", frame()).without_fills();
        let selection = Selection::new(vec![group]);
        assert!(validate_selection(&selection, ExtractionStrategy::Export).is_ok());
    }
}
