//! Result placement
//!
//! Pure geometry deciding where the processed image lands and how large it
//! is drawn. Two policies:
//! - `Contain` keeps the processed image's aspect ratio and places it to the
//!   right of the original
//! - `Overlay` pads the original frame by the stroke on every side so the
//!   result sits exactly on top of it

mod contain;
mod overlay;

pub use contain::Contain;
pub use overlay::Overlay;

use serde::{Deserialize, Serialize};

use crate::config::PluginConfig;
use crate::error::{OutlineError, Result};
use crate::host::{Frame, ScaleMode};

/// Which placement policy a deployment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    #[default]
    Contain,
    Overlay,
}

impl PlacementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contain => "contain",
            Self::Overlay => "overlay",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "contain" | "fit" => Some(Self::Contain),
            "overlay" | "exact" => Some(Self::Overlay),
            _ => None,
        }
    }

    /// Fill scale mode that cannot reintroduce distortion the geometry resolved
    pub fn scale_mode(&self) -> ScaleMode {
        match self {
            Self::Contain => ScaleMode::Fit,
            Self::Overlay => ScaleMode::Fill,
        }
    }
}

impl std::fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where and how large to draw the result layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<PlacementGeometry> for Frame {
    fn from(geometry: PlacementGeometry) -> Self {
        Frame::new(geometry.x, geometry.y, geometry.width, geometry.height)
    }
}

/// Everything a policy needs to place one result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInput {
    /// Frame of the original layer, captured when the request was made
    pub original: Frame,
    /// Decoded pixel size of the processed image (content plus padding)
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub stroke_width: f64,
}

impl PlacementInput {
    pub fn new(original: Frame, pixel_size: (u32, u32), stroke_width: f64) -> Self {
        Self {
            original,
            pixel_width: f64::from(pixel_size.0),
            pixel_height: f64::from(pixel_size.1),
            stroke_width,
        }
    }
}

/// Strategy interface for placement geometry
pub trait PlacementPolicy {
    fn mode(&self) -> PlacementMode;

    fn place(&self, input: &PlacementInput) -> Result<PlacementGeometry>;

    fn scale_mode(&self) -> ScaleMode {
        self.mode().scale_mode()
    }
}

/// Build the policy a configuration selects
pub fn policy_for(config: &PluginConfig) -> Box<dyn PlacementPolicy> {
    match config.placement {
        PlacementMode::Contain => Box::new(Contain::with_gap(config.result_gap)),
        PlacementMode::Overlay => Box::new(Overlay),
    }
}

/// Checks shared by both policies
fn check_frame_and_stroke(input: &PlacementInput) -> Result<()> {
    let Frame {
        x,
        y,
        width,
        height,
    } = input.original;

    if !(x.is_finite() && y.is_finite()) {
        return Err(OutlineError::InvalidGeometry {
            reason: format!("original position ({}, {}) is not finite", x, y),
        });
    }
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(OutlineError::InvalidGeometry {
            reason: format!("original size {}x{} must be positive", width, height),
        });
    }
    if !input.stroke_width.is_finite() || input.stroke_width < 0.0 {
        return Err(OutlineError::InvalidGeometry {
            reason: format!("stroke width {} must not be negative", input.stroke_width),
        });
    }
    Ok(())
}
