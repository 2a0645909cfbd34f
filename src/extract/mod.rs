//! Image asset extraction
//!
//! Two interchangeable strategies turn a selected layer into source bytes:
//! - `FillExtractor` reads the layer's original image fill (fast, blind to crop)
//! - `NodeExporter` rasterizes the layer as rendered (slower, faithful)
//!
//! A deployment picks one through configuration.

mod export;
mod fill;

pub use export::NodeExporter;
pub use fill::{select_image_fill, FillExtractor};

use serde::{Deserialize, Serialize};

use crate::config::PluginConfig;
use crate::error::Result;
use crate::host::{Document, Layer};

/// Which extractor a deployment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    #[default]
    Fill,
    Export,
}

impl ExtractionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Export => "export",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fill" => Some(Self::Fill),
            "export" | "render" => Some(Self::Export),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source pixels for one pipeline invocation
///
/// `width`/`height` are the layer's logical size, not the pixel size of
/// `bytes`. `source_scale` is set when the bytes were rasterized at a
/// super-sampling factor.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    bytes: Vec<u8>,
    width: f64,
    height: f64,
    source_scale: Option<f64>,
}

impl ImageAsset {
    pub fn new(bytes: Vec<u8>, width: f64, height: f64) -> Self {
        Self {
            bytes,
            width,
            height,
            source_scale: None,
        }
    }

    pub fn with_source_scale(mut self, scale: f64) -> Self {
        self.source_scale = Some(scale);
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn source_scale(&self) -> Option<f64> {
        self.source_scale
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Strategy interface for obtaining an asset from a layer
pub trait AssetExtractor {
    fn strategy(&self) -> ExtractionStrategy;

    fn extract(&self, layer: &Layer, document: &dyn Document) -> Result<ImageAsset>;
}

/// Build the extractor a configuration selects
pub fn extractor_for(config: &PluginConfig) -> Box<dyn AssetExtractor> {
    match config.extraction {
        ExtractionStrategy::Fill => Box::new(FillExtractor),
        ExtractionStrategy::Export => Box::new(NodeExporter::with_scale(config.export_scale)),
    }
}
