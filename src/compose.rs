//! Result composition
//!
//! Turns a processed image into a new rectangle layer on the canvas, placed
//! by the active policy, then selects it and brings it into view.

use serde::Serialize;

use crate::bridge::CompletedRequest;
use crate::config::PluginConfig;
use crate::error::Result;
use crate::host::{Document, Fill, ImageRef, LayerId};
use crate::placement::{policy_for, PlacementGeometry, PlacementInput, PlacementPolicy};

/// What a successful composition produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedLayer {
    pub layer_id: LayerId,
    pub image_ref: ImageRef,
    pub pixel_size: (u32, u32),
    pub geometry: PlacementGeometry,
}

/// Creates the result layer for a completed request
pub struct ResultComposer {
    policy: Box<dyn PlacementPolicy>,
    result_name: String,
}

impl ResultComposer {
    pub fn new(policy: Box<dyn PlacementPolicy>, result_name: impl Into<String>) -> Self {
        Self {
            policy,
            result_name: result_name.into(),
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(policy_for(config), config.result_name.clone())
    }

    pub fn policy(&self) -> &dyn PlacementPolicy {
        self.policy.as_ref()
    }

    /// Create the image resource and result layer
    ///
    /// Geometry is derived from the frame captured at request time and the
    /// stroke width the processor echoed back. Host failures are not retried;
    /// a rectangle created before the failure is removed again.
    pub fn compose(
        &self,
        completed: &CompletedRequest,
        document: &mut dyn Document,
    ) -> Result<ComposedLayer> {
        let image_ref = document.create_image(&completed.data)?;
        let pixel_size = document.image_size(&image_ref)?;

        let input = PlacementInput::new(
            completed.request.original,
            pixel_size,
            completed.options.stroke_width,
        );
        let geometry = self.policy.place(&input)?;

        let layer_id = document.create_rectangle()?;
        if let Err(e) = self.finish_layer(&layer_id, &image_ref, &geometry, document) {
            if let Err(cleanup) = document.remove_layer(&layer_id) {
                tracing::warn!(layer = %layer_id, error = %cleanup, "could not remove partial result layer");
            }
            return Err(e);
        }

        tracing::info!(
            layer = %layer_id,
            source = %completed.request.layer_id,
            policy = self.policy.mode().as_str(),
            x = geometry.x,
            y = geometry.y,
            width = geometry.width,
            height = geometry.height,
            "composed result layer"
        );

        Ok(ComposedLayer {
            layer_id,
            image_ref,
            pixel_size,
            geometry,
        })
    }

    fn finish_layer(
        &self,
        layer_id: &LayerId,
        image_ref: &ImageRef,
        geometry: &PlacementGeometry,
        document: &mut dyn Document,
    ) -> Result<()> {
        document.resize(layer_id, geometry.width, geometry.height)?;
        document.set_position(layer_id, geometry.x, geometry.y)?;
        document.set_fills(
            layer_id,
            vec![Fill::image(image_ref.clone(), self.policy.scale_mode())],
        )?;
        document.set_name(layer_id, &self.result_name)?;

        let focus = [layer_id.clone()];
        document.set_selection(&focus)?;
        document.scroll_and_zoom_into_view(&focus)
    }
}
