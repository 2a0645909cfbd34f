//! Host document model
//!
//! Snapshot types for the layers, fills and selection the host hands to the
//! pipeline. None of these outlive a single message cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-assigned layer identifier
pub type LayerId = String;

/// Reference to an image resource in the host's image store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position and logical size of a layer on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How an image fill maps onto its layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    #[default]
    Fill,
    Fit,
    Crop,
    Tile,
}

/// A paint entry attached to a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fill {
    Solid {
        color: [f32; 4],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    Gradient {
        stops: Vec<[f32; 4]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    Image {
        #[serde(rename = "imageHash")]
        image_ref: ImageRef,
        /// `None` means the host never set the flag, which counts as visible
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
        #[serde(rename = "scaleMode", default)]
        scale_mode: ScaleMode,
    },
}

impl Fill {
    /// Create a visible image fill
    pub fn image(image_ref: ImageRef, scale_mode: ScaleMode) -> Self {
        Fill::Image {
            image_ref,
            visible: None,
            scale_mode,
        }
    }

    /// Create an image fill that has been explicitly hidden
    pub fn hidden_image(image_ref: ImageRef) -> Self {
        Fill::Image {
            image_ref,
            visible: Some(false),
            scale_mode: ScaleMode::Fill,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Fill::Image { .. })
    }

    /// Visible unless the flag is explicitly false
    pub fn is_visible(&self) -> bool {
        let visible = match self {
            Fill::Solid { visible, .. } => visible,
            Fill::Gradient { visible, .. } => visible,
            Fill::Image { visible, .. } => visible,
        };
        *visible != Some(false)
    }

    pub fn image_ref(&self) -> Option<&ImageRef> {
        match self {
            Fill::Image { image_ref, .. } => Some(image_ref),
            _ => None,
        }
    }
}

/// A layer as seen by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub frame: Frame,
    /// `None` for layer kinds without a fills property (groups, slices)
    #[serde(default)]
    pub fills: Option<Vec<Fill>>,
    /// Whether the host can rasterize this layer
    #[serde(default)]
    pub exportable: bool,
}

impl Layer {
    pub fn new(id: impl Into<LayerId>, name: impl Into<String>, frame: Frame) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            frame,
            fills: Some(Vec::new()),
            exportable: true,
        }
    }

    pub fn with_fills(mut self, fills: Vec<Fill>) -> Self {
        self.fills = Some(fills);
        self
    }

    pub fn without_fills(mut self) -> Self {
        self.fills = None;
        self
    }

    pub fn with_exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }

    pub fn has_image_fill(&self) -> bool {
        self.fills
            .as_ref()
            .map(|fills| fills.iter().any(Fill::is_image))
            .unwrap_or(false)
    }
}

/// Read-only snapshot of the user's current selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    layers: Vec<Layer>,
}

impl Selection {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The only entry the pipeline ever looks at
    pub fn first(&self) -> Option<&Layer> {
        self.layers.first()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Raster format requested from the host exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
}

/// Settings for rasterizing a layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub scale: f64,
}
