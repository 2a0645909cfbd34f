//! Reference processor
//!
//! A local stand-in for the UI-hosted image processor. It answers a
//! `process-image` message the way the real processor does at the protocol
//! level: the result is the source image padded by the stroke width on every
//! side, with the padding painted in the stroke color. It does not trace the
//! image silhouette.

use image::{imageops, DynamicImage, Rgba, RgbaImage};

use crate::bridge::{PluginMessage, ProcessingOptions, UiMessage};
use crate::error::{OutlineError, Result};
use crate::host::{encode_image, ExportFormat, MAX_EXPORT_DIMENSION};

const DEFAULT_STROKE_COLOR: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceProcessor;

impl ReferenceProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Answer one outbound plugin message
    ///
    /// Returns `None` for messages that are not processing requests.
    pub fn respond(&self, message: &PluginMessage) -> Option<UiMessage> {
        let PluginMessage::ProcessImage {
            request_id,
            bytes,
            width,
            options,
            ..
        } = message
        else {
            return None;
        };

        let reply = match self.render(bytes, *width, options) {
            Ok(data) => UiMessage::ImageProcessed {
                request_id: Some(request_id.clone()),
                data,
                options: options.clone(),
            },
            Err(e) => UiMessage::Error {
                request_id: Some(request_id.clone()),
                message: format!("Processing failed: {}", e),
            },
        };
        Some(reply)
    }

    /// Pad the source by the stroke, scaled from logical units to pixels
    pub fn render(&self, bytes: &[u8], logical_width: f64, options: &ProcessingOptions) -> Result<Vec<u8>> {
        if !options.stroke_width.is_finite() || options.stroke_width < 0.0 {
            return Err(OutlineError::InvalidGeometry {
                reason: format!("stroke width {} must not be negative", options.stroke_width),
            });
        }

        let source = image::load_from_memory(bytes)?.to_rgba8();
        let pixels_per_unit = if logical_width > 0.0 {
            f64::from(source.width()) / logical_width
        } else {
            1.0
        };
        let pad = (options.stroke_width * pixels_per_unit).round();
        let canvas_width = f64::from(source.width()) + 2.0 * pad;
        let canvas_height = f64::from(source.height()) + 2.0 * pad;
        if canvas_width.max(canvas_height) > f64::from(MAX_EXPORT_DIMENSION) {
            return Err(OutlineError::InvalidGeometry {
                reason: format!(
                    "outlined image {}x{} exceeds the {}px limit",
                    canvas_width, canvas_height, MAX_EXPORT_DIMENSION
                ),
            });
        }
        let pad = pad as u32;

        let color = options
            .get::<[u8; 4]>("strokeColor")
            .unwrap_or(DEFAULT_STROKE_COLOR);
        let mut canvas = RgbaImage::from_pixel(
            source.width() + 2 * pad,
            source.height() + 2 * pad,
            Rgba(color),
        );
        imageops::overlay(&mut canvas, &source, i64::from(pad), i64::from(pad));

        tracing::debug!(
            source_width = source.width(),
            source_height = source.height(),
            pad,
            "reference processor rendered outline"
        );

        encode_image(&DynamicImage::ImageRgba8(canvas), ExportFormat::Png)
    }
}
