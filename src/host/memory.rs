//! In-memory host document
//!
//! A self-contained `Document` implementation backed by plain collections.
//! Image references are content hashes of the stored bytes, mirroring how
//! design tools key their image stores.

use std::collections::HashMap;
use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use sha2::{Digest, Sha256};

use super::document::Document;
use super::model::{ExportFormat, ExportSettings, Fill, Frame, ImageRef, Layer, LayerId, Selection};
use crate::error::{OutlineError, Result};

/// Largest raster edge the in-memory exporter will allocate
pub const MAX_EXPORT_DIMENSION: u32 = 16_384;

/// Document state held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    layers: Vec<Layer>,
    images: HashMap<ImageRef, Vec<u8>>,
    selection: Vec<LayerId>,
    viewport_focus: Vec<LayerId>,
    notifications: Vec<String>,
    next_id: u64,
    export_failure: Option<String>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store encoded bytes and return their content-hash reference
    pub fn insert_image(&mut self, bytes: Vec<u8>) -> ImageRef {
        let image_ref = ImageRef(format!("{:x}", Sha256::digest(&bytes)));
        self.images.entry(image_ref.clone()).or_insert(bytes);
        image_ref
    }

    /// Append a layer to the page
    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = layer.id.clone();
        self.layers.push(layer);
        id
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Select layers by id, ignoring ids that are not on the page
    pub fn select(&mut self, ids: &[&str]) {
        self.selection = ids
            .iter()
            .filter(|id| self.layer(id).is_some())
            .map(|id| id.to_string())
            .collect();
    }

    pub fn selected_ids(&self) -> &[LayerId] {
        &self.selection
    }

    /// Copy the currently selected layers into a selection snapshot
    pub fn selection_snapshot(&self) -> Selection {
        Selection::new(
            self.selection
                .iter()
                .filter_map(|id| self.layer(id).cloned())
                .collect(),
        )
    }

    pub fn viewport_focus(&self) -> &[LayerId] {
        &self.viewport_focus
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Make every subsequent export fail with the given reason
    pub fn fail_exports_with(&mut self, reason: impl Into<String>) {
        self.export_failure = Some(reason.into());
    }

    fn layer_mut(&mut self, operation: &str, id: &str) -> Result<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|layer| layer.id == id)
            .ok_or_else(|| OutlineError::host(operation, format!("layer {} not found", id)))
    }

    fn render(&self, layer: &Layer, width: u32, height: u32) -> Result<DynamicImage> {
        let source = layer
            .fills
            .iter()
            .flatten()
            .filter(|fill| fill.is_visible())
            .find_map(Fill::image_ref)
            .and_then(|image_ref| self.images.get(image_ref));

        match source {
            Some(bytes) => Ok(image::load_from_memory(bytes)?.resize_exact(
                width,
                height,
                FilterType::Triangle,
            )),
            None => Ok(DynamicImage::new_rgba8(width, height)),
        }
    }
}

/// Pixel edge for a logical size at a scale, refusing oversized rasters
fn export_dimension(logical: f64, scale: f64) -> Result<u32> {
    let pixels = (logical * scale).round().max(1.0);
    if !pixels.is_finite() || pixels > f64::from(MAX_EXPORT_DIMENSION) {
        return Err(OutlineError::host(
            "exportAsync",
            format!(
                "{}px at {}x exceeds the {}px export limit",
                logical, scale, MAX_EXPORT_DIMENSION
            ),
        ));
    }
    Ok(pixels as u32)
}

/// Encode an image in the requested raster format
pub(crate) fn encode_image(image: &DynamicImage, format: ExportFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?,
        ExportFormat::Jpg => DynamicImage::ImageRgb8(image.to_rgb8())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)?,
    }
    Ok(bytes)
}

impl Document for InMemoryDocument {
    fn image_bytes(&self, image: &ImageRef) -> Option<Vec<u8>> {
        self.images
            .get(image)
            .filter(|bytes| !bytes.is_empty())
            .cloned()
    }

    fn export_layer(&self, layer: &LayerId, settings: &ExportSettings) -> Result<Vec<u8>> {
        if let Some(reason) = &self.export_failure {
            return Err(OutlineError::host("exportAsync", reason.clone()));
        }

        let layer = self
            .layer(layer)
            .ok_or_else(|| OutlineError::host("exportAsync", format!("layer {} not found", layer)))?;
        if !layer.exportable {
            return Err(OutlineError::host("exportAsync", "layer is not exportable"));
        }

        let width = export_dimension(layer.frame.width, settings.scale)?;
        let height = export_dimension(layer.frame.height, settings.scale)?;
        let rendered = self.render(layer, width, height)?;

        encode_image(&rendered, settings.format)
    }

    fn create_image(&mut self, bytes: &[u8]) -> Result<ImageRef> {
        image::guess_format(bytes)
            .map_err(|e| OutlineError::host("createImage", format!("unrecognized image data: {}", e)))?;
        Ok(self.insert_image(bytes.to_vec()))
    }

    fn image_size(&self, image: &ImageRef) -> Result<(u32, u32)> {
        let bytes = self
            .images
            .get(image)
            .ok_or_else(|| OutlineError::host("getSizeAsync", format!("image {} not found", image)))?;

        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }

    fn create_rectangle(&mut self) -> Result<LayerId> {
        self.next_id += 1;
        let id = format!("rect:{}", self.next_id);
        let layer = Layer::new(id.clone(), "Rectangle", Frame::new(0.0, 0.0, 100.0, 100.0))
            .with_fills(vec![Fill::Solid {
                color: [1.0, 1.0, 1.0, 1.0],
                visible: None,
            }]);
        self.layers.push(layer);
        Ok(id)
    }

    fn remove_layer(&mut self, layer: &LayerId) -> Result<()> {
        let index = self
            .layers
            .iter()
            .position(|candidate| &candidate.id == layer)
            .ok_or_else(|| OutlineError::host("remove", format!("layer {} not found", layer)))?;
        self.layers.remove(index);
        self.selection.retain(|id| id != layer);
        self.viewport_focus.retain(|id| id != layer);
        Ok(())
    }

    fn resize(&mut self, layer: &LayerId, width: f64, height: f64) -> Result<()> {
        if !(width.is_finite() && height.is_finite()) || width < 0.01 || height < 0.01 {
            return Err(OutlineError::host(
                "resize",
                format!("invalid size {}x{}", width, height),
            ));
        }
        let layer = self.layer_mut("resize", layer)?;
        layer.frame.width = width;
        layer.frame.height = height;
        Ok(())
    }

    fn set_position(&mut self, layer: &LayerId, x: f64, y: f64) -> Result<()> {
        let layer = self.layer_mut("setPosition", layer)?;
        layer.frame.x = x;
        layer.frame.y = y;
        Ok(())
    }

    fn set_fills(&mut self, layer: &LayerId, fills: Vec<Fill>) -> Result<()> {
        if let Some(missing) = fills
            .iter()
            .filter_map(Fill::image_ref)
            .find(|image_ref| !self.images.contains_key(*image_ref))
        {
            return Err(OutlineError::host(
                "setFills",
                format!("image {} not found", missing),
            ));
        }
        self.layer_mut("setFills", layer)?.fills = Some(fills);
        Ok(())
    }

    fn set_name(&mut self, layer: &LayerId, name: &str) -> Result<()> {
        self.layer_mut("setName", layer)?.name = name.to_string();
        Ok(())
    }

    fn set_selection(&mut self, layers: &[LayerId]) -> Result<()> {
        if let Some(missing) = layers.iter().find(|id| self.layer(id).is_none()) {
            return Err(OutlineError::host(
                "setSelection",
                format!("layer {} not found", missing),
            ));
        }
        self.selection = layers.to_vec();
        Ok(())
    }

    fn scroll_and_zoom_into_view(&mut self, layers: &[LayerId]) -> Result<()> {
        self.viewport_focus = layers.to_vec();
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        tracing::debug!(toast = message, "notify");
        self.notifications.push(message.to_string());
    }
}
