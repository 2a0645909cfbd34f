//! Overlay placement
//!
//! Used when the processor output is pixel-exact: `original + 2 * stroke` on
//! each axis. Only a fixed padding offset is applied.

use super::{check_frame_and_stroke, PlacementGeometry, PlacementInput, PlacementMode, PlacementPolicy};
use crate::error::Result;

/// Exact placement centered on the original footprint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlay;

impl PlacementPolicy for Overlay {
    fn mode(&self) -> PlacementMode {
        PlacementMode::Overlay
    }

    fn place(&self, input: &PlacementInput) -> Result<PlacementGeometry> {
        check_frame_and_stroke(input)?;

        let original = input.original;
        let stroke = input.stroke_width;

        Ok(PlacementGeometry {
            x: original.x - stroke,
            y: original.y - stroke,
            width: original.width + 2.0 * stroke,
            height: original.height + 2.0 * stroke,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Frame;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pads_by_stroke() {
        let input = PlacementInput::new(Frame::new(0.0, 0.0, 100.0, 50.0), (440, 240), 5.0);

        assert_eq!(
            Overlay.place(&input).unwrap(),
            PlacementGeometry {
                x: -5.0,
                y: -5.0,
                width: 110.0,
                height: 60.0,
            }
        );
    }

    #[test]
    fn test_ignores_pixel_ratio() {
        let square = PlacementInput::new(Frame::new(10.0, 20.0, 30.0, 40.0), (100, 100), 2.0);
        let wide = PlacementInput::new(Frame::new(10.0, 20.0, 30.0, 40.0), (1000, 10), 2.0);

        assert_eq!(Overlay.place(&square).unwrap(), Overlay.place(&wide).unwrap());
    }

    #[test]
    fn test_zero_stroke_is_identity() {
        let original = Frame::new(3.0, 4.0, 5.0, 6.0);
        let geometry = Overlay
            .place(&PlacementInput::new(original, (5, 6), 0.0))
            .unwrap();

        assert_eq!(Frame::from(geometry), original);
    }
}
