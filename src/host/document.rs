//! Host capability surface
//!
//! The pipeline never touches ambient globals: every read of the image store
//! and every document mutation goes through this trait.

use super::model::{ExportSettings, Fill, ImageRef, LayerId};
use crate::error::Result;

/// Capabilities the design tool exposes to the plugin
pub trait Document {
    /// Resolve an image reference to its encoded bytes
    ///
    /// Returns `None` when the store has nothing for the reference.
    fn image_bytes(&self, image: &ImageRef) -> Option<Vec<u8>>;

    /// Rasterize a layer as it is rendered on canvas
    fn export_layer(&self, layer: &LayerId, settings: &ExportSettings) -> Result<Vec<u8>>;

    /// Register encoded bytes as a new image resource
    fn create_image(&mut self, bytes: &[u8]) -> Result<ImageRef>;

    /// Decoded pixel size of an image resource
    fn image_size(&self, image: &ImageRef) -> Result<(u32, u32)>;

    /// Create an empty rectangle layer on the current page
    fn create_rectangle(&mut self) -> Result<LayerId>;

    /// Delete a layer from the document
    fn remove_layer(&mut self, layer: &LayerId) -> Result<()>;

    fn resize(&mut self, layer: &LayerId, width: f64, height: f64) -> Result<()>;

    fn set_position(&mut self, layer: &LayerId, x: f64, y: f64) -> Result<()>;

    fn set_fills(&mut self, layer: &LayerId, fills: Vec<Fill>) -> Result<()>;

    fn set_name(&mut self, layer: &LayerId, name: &str) -> Result<()>;

    /// Replace the current selection
    fn set_selection(&mut self, layers: &[LayerId]) -> Result<()>;

    /// Move the viewport so the given layers are in view
    fn scroll_and_zoom_into_view(&mut self, layers: &[LayerId]) -> Result<()>;

    /// Show a transient toast to the user
    fn notify(&mut self, message: &str);
}
