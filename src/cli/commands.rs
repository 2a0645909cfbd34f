//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::collections::VecDeque;
use std::path::Path;

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::info;

use crate::bridge::{ProcessingOptions, UiMessage};
use crate::config::PluginConfig;
use crate::error::{OutlineError, Result};
use crate::host::{
    encode_image, ExportFormat, Fill, Frame, InMemoryDocument, Layer, ScaleMode, MAX_EXPORT_DIMENSION,
};
use crate::placement::{policy_for, PlacementInput, PlacementMode};
use crate::plugin::{OutlinePlugin, PluginContext};
use crate::processor::ReferenceProcessor;

/// Pixel density of the generated demo image
const DEMO_PIXELS_PER_UNIT: f64 = 2.0;

/// Compute and print the geometry a policy would give a result layer.
pub fn place(
    config_path: Option<&Path>,
    policy: &str,
    frame: Frame,
    pixel_size: (u32, u32),
    stroke: f64,
) -> Result<()> {
    let mode = PlacementMode::from_str(policy).ok_or_else(|| OutlineError::InvalidConfig {
        reason: format!("unknown placement policy '{}'", policy),
    })?;

    let config = PluginConfig {
        placement: mode,
        ..PluginConfig::load(config_path)?
    };
    let geometry = policy_for(&config).place(&PlacementInput::new(frame, pixel_size, stroke))?;

    println!("{}", serde_json::to_string_pretty(&geometry)?);
    Ok(())
}

/// Run one request/response cycle against an in-memory document.
pub fn demo(config_path: Option<&Path>, stroke: f64, width: f64, height: f64) -> Result<()> {
    let config = PluginConfig::load(config_path)?;
    info!(
        extraction = config.extraction.as_str(),
        placement = config.placement.as_str(),
        "running demo cycle"
    );

    let mut document = InMemoryDocument::new();
    let image_ref = document.insert_image(sample_image(width, height)?);
    let source_id = document.add_layer(
        Layer::new("demo:1", "Sample", Frame::new(0.0, 0.0, width, height))
            .with_fills(vec![Fill::image(image_ref, ScaleMode::Fill)]),
    );
    document.select(&[source_id.as_str()]);

    let mut plugin = OutlinePlugin::new(config)?;
    let processor = ReferenceProcessor::new();

    let selection = document.selection_snapshot();
    let mut ctx = PluginContext::new(selection, &mut document);
    let mut inbound = VecDeque::from([UiMessage::RequestProcess {
        options: ProcessingOptions::new(stroke),
    }]);

    while let Some(message) = inbound.pop_front() {
        for outbound in plugin.handle(message, &mut ctx) {
            if let Some(reply) = processor.respond(&outbound) {
                inbound.push_back(reply);
            }
        }
    }
    plugin.shutdown();

    for notification in document.notifications() {
        println!("{}", notification);
    }
    match document.layers().iter().find(|layer| layer.id != source_id) {
        Some(result) => println!("{}", serde_json::to_string_pretty(result)?),
        None => println!("No result layer was created."),
    }

    Ok(())
}

/// Print the effective configuration.
pub fn show_config(config_path: Option<&Path>) -> Result<()> {
    let config = PluginConfig::load(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// A diagonal gradient sized to the layer at the demo pixel density
fn sample_image(width: f64, height: f64) -> Result<Vec<u8>> {
    let limit = f64::from(MAX_EXPORT_DIMENSION) / DEMO_PIXELS_PER_UNIT;
    if !(width > 0.0 && height > 0.0 && width <= limit && height <= limit) {
        return Err(OutlineError::InvalidGeometry {
            reason: format!(
                "demo layer must be between 0 and {} units on each side, got {}x{}",
                limit, width, height
            ),
        });
    }

    let pixel_width = (width * DEMO_PIXELS_PER_UNIT).round().max(1.0) as u32;
    let pixel_height = (height * DEMO_PIXELS_PER_UNIT).round().max(1.0) as u32;
    let image = RgbaImage::from_fn(pixel_width, pixel_height, |x, y| {
        let r = (x * 255 / pixel_width.max(1)) as u8;
        let g = (y * 255 / pixel_height.max(1)) as u8;
        Rgba([r, g, 160, 255])
    });

    encode_image(&DynamicImage::ImageRgba8(image), ExportFormat::Png)
}
