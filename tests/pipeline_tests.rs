//! Integration Tests
//!
//! End-to-end cycles through the plugin, the in-memory host and the
//! reference processor.

use std::io::Cursor;

use approx::assert_relative_eq;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;

use stroke_outline::bridge::{PluginMessage, ProcessingOptions, UiMessage};
use stroke_outline::host::{Fill, Frame, InMemoryDocument, Layer, ScaleMode};
use stroke_outline::{OutlinePlugin, PluginConfig, PluginContext, ReferenceProcessor};

/// Helper to encode a solid PNG of the given pixel size
fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([20, 120, 220, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Helper to add an image layer whose fill is `pixels_per_unit` dense
fn add_photo(doc: &mut InMemoryDocument, id: &str, frame: Frame, pixels_per_unit: f64) {
    let image_ref = doc.insert_image(png(
        (frame.width * pixels_per_unit) as u32,
        (frame.height * pixels_per_unit) as u32,
    ));
    doc.add_layer(Layer::new(id, "Photo", frame).with_fills(vec![Fill::image(image_ref, ScaleMode::Fill)]));
}

fn request(stroke: f64) -> UiMessage {
    UiMessage::RequestProcess {
        options: ProcessingOptions::new(stroke),
    }
}

/// Send a request for the current selection and return the outbound message
fn submit(plugin: &mut OutlinePlugin, doc: &mut InMemoryDocument, stroke: f64) -> PluginMessage {
    let selection = doc.selection_snapshot();
    let mut ctx = PluginContext::new(selection, doc);
    let mut outbound = plugin.handle(request(stroke), &mut ctx);
    assert_eq!(outbound.len(), 1, "expected exactly one outbound message");
    outbound.remove(0)
}

fn deliver(plugin: &mut OutlinePlugin, doc: &mut InMemoryDocument, reply: UiMessage) {
    let selection = doc.selection_snapshot();
    let mut ctx = PluginContext::new(selection, doc);
    assert!(plugin.handle(reply, &mut ctx).is_empty());
}

fn result_layers(doc: &InMemoryDocument) -> Vec<&Layer> {
    doc.layers()
        .iter()
        .filter(|layer| layer.name == "Stroked Image")
        .collect()
}

// === Full Cycle Tests ===

#[test]
fn test_fill_contain_cycle_places_result_beside_original() {
    let mut doc = InMemoryDocument::new();
    add_photo(&mut doc, "1:1", Frame::new(10.0, 10.0, 120.0, 80.0), 2.0);
    doc.select(&["1:1"]);

    let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();
    let outbound = submit(&mut plugin, &mut doc, 10.0);
    let reply = ReferenceProcessor.respond(&outbound).unwrap();
    deliver(&mut plugin, &mut doc, reply);

    // 240x160 source padded by 20px on each side: 280x200, ratio 1.4
    let results = result_layers(&doc);
    assert_eq!(results.len(), 1);
    let frame = results[0].frame;
    assert_relative_eq!(frame.x, 150.0);
    assert_relative_eq!(frame.y, 10.0);
    assert_relative_eq!(frame.height, 100.0);
    assert_relative_eq!(frame.width, 140.0, epsilon = 1e-9);

    assert_eq!(doc.notifications(), &["Outline added!".to_string()]);
    assert_eq!(doc.selected_ids(), &[results[0].id.clone()]);
    assert!(plugin.bridge().is_idle());
}

#[test]
fn test_export_overlay_cycle_covers_original() {
    let mut doc = InMemoryDocument::new();
    add_photo(&mut doc, "1:1", Frame::new(0.0, 0.0, 50.0, 25.0), 1.0);
    doc.select(&["1:1"]);

    let mut plugin = OutlinePlugin::new(PluginConfig::rendered_overlay()).unwrap();
    let outbound = submit(&mut plugin, &mut doc, 5.0);

    match &outbound {
        PluginMessage::ProcessImage {
            bytes,
            width,
            height,
            export_scale,
            ..
        } => {
            let exported = image::load_from_memory(bytes).unwrap();
            assert_eq!((exported.width(), exported.height()), (200, 100));
            assert_eq!((*width, *height), (50.0, 25.0));
            assert_eq!(*export_scale, Some(4.0));
        }
        other => panic!("unexpected outbound message {:?}", other),
    }

    let reply = ReferenceProcessor.respond(&outbound).unwrap();
    deliver(&mut plugin, &mut doc, reply);

    let results = result_layers(&doc);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].frame, Frame::new(-5.0, -5.0, 60.0, 35.0));
    assert!(matches!(
        results[0].fills.as_deref(),
        Some([Fill::Image { scale_mode: ScaleMode::Fill, .. }])
    ));
}

#[test]
fn test_cycles_do_not_share_state() {
    let mut doc = InMemoryDocument::new();
    add_photo(&mut doc, "1:1", Frame::new(0.0, 0.0, 100.0, 100.0), 1.0);
    add_photo(&mut doc, "1:2", Frame::new(500.0, 0.0, 50.0, 50.0), 1.0);
    let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();

    doc.select(&["1:1"]);
    let first = submit(&mut plugin, &mut doc, 10.0);
    doc.select(&["1:2"]);
    let second = submit(&mut plugin, &mut doc, 10.0);
    assert_eq!(plugin.bridge().pending_count(), 2);

    // Responses arrive in reverse order while "1:2" is still selected
    let second_reply = ReferenceProcessor.respond(&second).unwrap();
    let first_reply = ReferenceProcessor.respond(&first).unwrap();
    deliver(&mut plugin, &mut doc, second_reply);
    deliver(&mut plugin, &mut doc, first_reply);

    let mut xs: Vec<f64> = result_layers(&doc).iter().map(|layer| layer.frame.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(xs, vec![120.0, 570.0]);

    let first_result = result_layers(&doc)
        .into_iter()
        .find(|layer| layer.frame.x == 120.0)
        .unwrap();
    assert_relative_eq!(first_result.frame.width, 120.0);
    assert_relative_eq!(first_result.frame.height, 120.0);
    assert!(plugin.bridge().is_idle());
}

// === Failure Tests ===

#[test]
fn test_hidden_fill_is_still_processed() {
    let mut doc = InMemoryDocument::new();
    let image_ref = doc.insert_image(png(40, 40));
    doc.add_layer(
        Layer::new("1:1", "Photo", Frame::new(0.0, 0.0, 40.0, 40.0)).with_fills(vec![
            Fill::Solid {
                color: [0.0, 0.0, 0.0, 1.0],
                visible: None,
            },
            Fill::hidden_image(image_ref),
        ]),
    );
    doc.select(&["1:1"]);

    let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();
    let outbound = submit(&mut plugin, &mut doc, 2.0);
    assert!(matches!(outbound, PluginMessage::ProcessImage { .. }));
}

#[test]
fn test_rejected_selection_resets_ui() {
    let mut doc = InMemoryDocument::new();
    doc.add_layer(Layer::new("1:1", "Group", Frame::new(0.0, 0.0, 40.0, 40.0)).without_fills());
    doc.select(&["1:1"]);

    let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();
    let outbound = submit(&mut plugin, &mut doc, 2.0);

    assert_eq!(
        outbound,
        PluginMessage::Error {
            request_id: None,
            message: "Selected layer has no fills.".to_string(),
        }
    );
    assert_eq!(doc.notifications(), &["❌ Selected layer has no fills.".to_string()]);
    assert!(plugin.bridge().is_idle());
}

#[test]
fn test_export_failure_is_reported() {
    let mut doc = InMemoryDocument::new();
    add_photo(&mut doc, "1:1", Frame::new(0.0, 0.0, 10.0, 10.0), 1.0);
    doc.select(&["1:1"]);
    doc.fail_exports_with("renderer offline");

    let mut plugin = OutlinePlugin::new(PluginConfig::rendered_overlay()).unwrap();
    let outbound = submit(&mut plugin, &mut doc, 2.0);

    assert!(matches!(outbound, PluginMessage::Error { .. }));
    assert_eq!(doc.notifications().len(), 1);
    assert!(doc.notifications()[0].starts_with("❌ Could not export layer"));
    assert!(result_layers(&doc).is_empty());
}

#[test]
fn test_double_request_without_echoed_ids_recovers() {
    let mut doc = InMemoryDocument::new();
    add_photo(&mut doc, "1:1", Frame::new(0.0, 0.0, 20.0, 20.0), 1.0);
    add_photo(&mut doc, "1:2", Frame::new(100.0, 0.0, 20.0, 20.0), 1.0);
    let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();

    doc.select(&["1:1"]);
    submit(&mut plugin, &mut doc, 1.0);
    doc.select(&["1:2"]);
    submit(&mut plugin, &mut doc, 1.0);

    let anonymous = || UiMessage::ImageProcessed {
        request_id: None,
        data: png(22, 22),
        options: ProcessingOptions::new(1.0),
    };

    // The latest request is answered and the older one is dropped
    deliver(&mut plugin, &mut doc, anonymous());
    assert!(plugin.bridge().is_idle());
    let results = result_layers(&doc);
    assert_eq!(results.len(), 1);
    assert_relative_eq!(results[0].frame.x, 140.0);

    // A stray reply only produces an error toast
    deliver(&mut plugin, &mut doc, anonymous());
    assert_eq!(doc.notifications().len(), 2);
    assert!(doc.notifications()[1].starts_with("❌ "));

    // The next cycle still completes
    let outbound = submit(&mut plugin, &mut doc, 1.0);
    let reply = ReferenceProcessor.respond(&outbound).unwrap();
    deliver(&mut plugin, &mut doc, reply);
    assert_eq!(doc.notifications().last().unwrap(), "Outline added!");
    assert_eq!(result_layers(&doc).len(), 2);
    assert!(plugin.bridge().is_idle());
}

// === Wire Format Tests ===

#[test]
fn test_wire_messages_round_the_bridge() {
    let inbound = UiMessage::from_json(
        r#"{"type":"request-process","options":{"strokeWidth":6,"strokeColor":[0,0,0,255]}}"#,
    )
    .unwrap();

    let mut doc = InMemoryDocument::new();
    add_photo(&mut doc, "1:1", Frame::new(0.0, 0.0, 30.0, 30.0), 1.0);
    doc.select(&["1:1"]);
    let mut plugin = OutlinePlugin::new(PluginConfig::default()).unwrap();

    let selection = doc.selection_snapshot();
    let mut ctx = PluginContext::new(selection, &mut doc);
    let outbound = plugin.handle(inbound, &mut ctx);

    let json: serde_json::Value = serde_json::from_str(&outbound[0].to_json().unwrap()).unwrap();
    assert_eq!(json["type"], "process-image");
    assert!(json["requestId"].is_string());
    assert_eq!(json["options"]["strokeWidth"], 6.0);
    assert_eq!(json["options"]["strokeColor"], serde_json::json!([0, 0, 0, 255]));
    assert!(json.get("exportScale").map_or(true, |v| v.is_null()));
}
