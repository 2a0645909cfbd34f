//! Plugin message handler
//!
//! The host event loop hands one inbound UI message at a time to
//! `OutlinePlugin::handle`, together with an explicit context holding the
//! selection snapshot and the document. Every failure ends the current cycle
//! with a single notification; the plugin stays open for the next one.

use crate::bridge::{
    PluginMessage, ProcessingBridge, ProcessingOptions, ProcessorResponse, UiMessage,
};
use crate::compose::{ComposedLayer, ResultComposer};
use crate::config::PluginConfig;
use crate::error::{OutlineError, Result};
use crate::extract::{extractor_for, AssetExtractor};
use crate::host::{Document, Selection};
use crate::selection::validate_selection;

/// Per-message view of the host
pub struct PluginContext<'a> {
    pub selection: Selection,
    pub document: &'a mut dyn Document,
}

impl<'a> PluginContext<'a> {
    pub fn new(selection: Selection, document: &'a mut dyn Document) -> Self {
        Self {
            selection,
            document,
        }
    }
}

/// The selection-to-placement pipeline
pub struct OutlinePlugin {
    config: PluginConfig,
    extractor: Box<dyn AssetExtractor>,
    composer: ResultComposer,
    bridge: ProcessingBridge,
}

impl OutlinePlugin {
    /// Build the pipeline with the strategies the configuration selects
    pub fn new(config: PluginConfig) -> Result<Self> {
        config.validate()?;
        let extractor = extractor_for(&config);
        let composer = ResultComposer::from_config(&config);
        Ok(Self::with_strategies(config, extractor, composer))
    }

    pub fn with_strategies(
        config: PluginConfig,
        extractor: Box<dyn AssetExtractor>,
        composer: ResultComposer,
    ) -> Self {
        Self {
            config,
            extractor,
            composer,
            bridge: ProcessingBridge::new(),
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn bridge(&self) -> &ProcessingBridge {
        &self.bridge
    }

    /// Handle one inbound message and return the messages to post to the UI
    pub fn handle(&mut self, message: UiMessage, ctx: &mut PluginContext<'_>) -> Vec<PluginMessage> {
        tracing::debug!(kind = message.kind(), "handling ui message");

        let response = match ProcessorResponse::try_from(message) {
            Ok(response) => response,
            Err(UiMessage::RequestProcess { options }) => {
                return match self.request_process(options, ctx) {
                    Ok(outbound) => vec![outbound],
                    Err(e) => {
                        self.report(&e, ctx);
                        vec![PluginMessage::Error {
                            request_id: None,
                            message: e.friendly_message(),
                        }]
                    }
                };
            }
            Err(other) => {
                tracing::warn!(kind = other.kind(), "ignoring unexpected message");
                return Vec::new();
            }
        };

        match self.complete(response, ctx) {
            Ok(_) => ctx.document.notify(&self.config.success_message),
            Err(e) => self.report(&e, ctx),
        }
        Vec::new()
    }

    /// Validate, extract and submit; returns the `process-image` message
    pub fn request_process(
        &mut self,
        options: ProcessingOptions,
        ctx: &mut PluginContext<'_>,
    ) -> Result<PluginMessage> {
        let layer = validate_selection(&ctx.selection, self.extractor.strategy())?;
        let asset = self.extractor.extract(layer, &*ctx.document)?;
        Ok(self.bridge.submit(layer, asset, options))
    }

    /// Resolve a processor response and compose the result layer
    pub fn complete(
        &mut self,
        response: ProcessorResponse,
        ctx: &mut PluginContext<'_>,
    ) -> Result<ComposedLayer> {
        let completed = self.bridge.resolve(response)?.into_result()?;
        self.composer.compose(&completed, &mut *ctx.document)
    }

    /// Drop every pending request; late responses will no longer match
    pub fn shutdown(&mut self) -> usize {
        let dropped = self.bridge.cancel_all().len();
        if dropped > 0 {
            tracing::info!(dropped, "dropped pending requests on shutdown");
        }
        dropped
    }

    fn report(&self, error: &OutlineError, ctx: &mut PluginContext<'_>) {
        if error.is_recoverable() {
            tracing::warn!(code = error.error_code(), error = %error, "cycle ended without result");
        } else {
            tracing::error!(code = error.error_code(), error = %error, "cycle failed");
        }
        ctx.document.notify(&format!("❌ {}", error.friendly_message()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{encode_image, ExportFormat, Fill, Frame, InMemoryDocument, Layer, ScaleMode};
    use image::{DynamicImage, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_image(
            &DynamicImage::ImageRgba8(RgbaImage::new(width, height)),
            ExportFormat::Png,
        )
        .unwrap()
    }

    fn document_with_photo() -> InMemoryDocument {
        let mut doc = InMemoryDocument::new();
        let image_ref = doc.insert_image(png(20, 10));
        doc.add_layer(
            Layer::new("1:1", "Photo", Frame::new(0.0, 0.0, 20.0, 10.0))
                .with_fills(vec![Fill::image(image_ref, ScaleMode::Fill)]),
        );
        doc.select(&["1:1"]);
        doc
    }

    #[test]
    fn test_empty_selection_sends_nothing_to_processor() {
        let mut doc = InMemoryDocument::new();
        let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();
        let mut ctx = PluginContext::new(Selection::empty(), &mut doc);

        let outbound = plugin.handle(
            UiMessage::RequestProcess {
                options: ProcessingOptions::new(4.0),
            },
            &mut ctx,
        );

        assert_eq!(
            outbound,
            vec![PluginMessage::Error {
                request_id: None,
                message: "Please select an image first.".to_string(),
            }]
        );
        assert!(plugin.bridge().is_idle());
        assert_eq!(doc.notifications(), &["❌ Please select an image first.".to_string()]);
    }

    #[test]
    fn test_request_process_emits_process_image() {
        let mut doc = document_with_photo();
        let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();
        let selection = doc.selection_snapshot();
        let mut ctx = PluginContext::new(selection, &mut doc);

        let outbound = plugin.handle(
            UiMessage::RequestProcess {
                options: ProcessingOptions::new(2.0),
            },
            &mut ctx,
        );

        assert_eq!(outbound.len(), 1);
        assert!(matches!(
            &outbound[0],
            PluginMessage::ProcessImage { width, height, export_scale: None, .. }
                if *width == 20.0 && *height == 10.0
        ));
        assert_eq!(plugin.bridge().pending_count(), 1);
    }

    #[test]
    fn test_processor_error_is_notified() {
        let mut doc = document_with_photo();
        let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();
        let selection = doc.selection_snapshot();
        let mut ctx = PluginContext::new(selection, &mut doc);

        let outbound = plugin.handle(
            UiMessage::RequestProcess {
                options: ProcessingOptions::new(2.0),
            },
            &mut ctx,
        );
        let request_id = outbound[0].request_id().cloned();

        let replies = plugin.handle(
            UiMessage::Error {
                request_id,
                message: "Canvas too large".to_string(),
            },
            &mut ctx,
        );

        assert!(replies.is_empty());
        assert!(plugin.bridge().is_idle());
        assert_eq!(doc.notifications(), &["❌ Canvas too large".to_string()]);
    }

    #[test]
    fn test_unexportable_layer_names_the_export_problem() {
        let mut doc = InMemoryDocument::new();
        let image_ref = doc.insert_image(png(20, 10));
        doc.add_layer(
            Layer::new("1:1", "Locked", Frame::new(0.0, 0.0, 20.0, 10.0))
                .with_fills(vec![Fill::image(image_ref, ScaleMode::Fill)])
                .with_exportable(false),
        );
        doc.select(&["1:1"]);
        let mut plugin = OutlinePlugin::new(PluginConfig::rendered_overlay()).unwrap();
        let selection = doc.selection_snapshot();
        let mut ctx = PluginContext::new(selection, &mut doc);

        let outbound = plugin.handle(
            UiMessage::RequestProcess {
                options: ProcessingOptions::new(2.0),
            },
            &mut ctx,
        );

        assert_eq!(
            outbound,
            vec![PluginMessage::Error {
                request_id: None,
                message: "Selected layer cannot be exported.".to_string(),
            }]
        );
        assert_eq!(doc.notifications(), &["❌ Selected layer cannot be exported.".to_string()]);
    }

    #[test]
    fn test_shutdown_drops_pending_requests() {
        let mut doc = document_with_photo();
        let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();
        let selection = doc.selection_snapshot();
        let mut ctx = PluginContext::new(selection, &mut doc);

        for _ in 0..2 {
            plugin.handle(
                UiMessage::RequestProcess {
                    options: ProcessingOptions::new(1.0),
                },
                &mut ctx,
            );
        }

        assert_eq!(plugin.shutdown(), 2);
        assert!(plugin.bridge().is_idle());
        assert_eq!(plugin.shutdown(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PluginConfig {
            export_scale: -1.0,
            ..PluginConfig::default()
        };
        assert!(OutlinePlugin::new(config).is_err());
    }
}
