//! Contain placement
//!
//! The processed image's aspect ratio already encodes content plus symmetric
//! padding. Inflating one side of the original by `2 * stroke` and deriving
//! the other from that ratio keeps the content region close to the original
//! footprint without distortion.

use super::{check_frame_and_stroke, PlacementGeometry, PlacementInput, PlacementMode, PlacementPolicy};
use crate::config::DEFAULT_RESULT_GAP;
use crate::error::{OutlineError, Result};

/// Aspect-preserving placement to the right of the original
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contain {
    gap: f64,
}

impl Contain {
    pub fn new() -> Self {
        Self::with_gap(DEFAULT_RESULT_GAP)
    }

    pub fn with_gap(gap: f64) -> Self {
        Self { gap }
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }
}

impl Default for Contain {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementPolicy for Contain {
    fn mode(&self) -> PlacementMode {
        PlacementMode::Contain
    }

    fn place(&self, input: &PlacementInput) -> Result<PlacementGeometry> {
        check_frame_and_stroke(input)?;
        if !(input.pixel_width > 0.0 && input.pixel_height > 0.0) {
            return Err(OutlineError::InvalidGeometry {
                reason: format!(
                    "processed image size {}x{} must be positive",
                    input.pixel_width, input.pixel_height
                ),
            });
        }

        let original = input.original;
        let padding = 2.0 * input.stroke_width;
        let node_ratio = original.width / original.height;
        let image_ratio = input.pixel_width / input.pixel_height;

        let (width, height) = if node_ratio > image_ratio {
            // Node is relatively wider: height constrains
            let height = original.height + padding;
            (height * image_ratio, height)
        } else {
            let width = original.width + padding;
            (width, width / image_ratio)
        };

        Ok(PlacementGeometry {
            x: original.x + original.width + self.gap,
            y: original.y,
            width,
            height,
        })
    }
}
