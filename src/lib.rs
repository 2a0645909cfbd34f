//! Stroke Outline - selection to outlined image layer
//!
//! The pipeline turns the user's selected image layer into a new layer
//! carrying a stroked outline produced by an external processor:
//! 1. Validate the selection and pick the layer to work on
//! 2. Extract image bytes, either from its fill or by rasterizing it
//! 3. Hand the bytes to the processor and match the response by request id
//! 4. Place the processed image beside or over the original
//!
//! # Architecture
//!
//! The host design tool is abstracted behind the `host::Document` trait. All
//! state a cycle needs is carried explicitly: the selection snapshot travels
//! in a `PluginContext` and the original frame is stored with each pending
//! request.

pub mod bridge;
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod host;
pub mod placement;
pub mod plugin;
pub mod processor;
pub mod selection;

pub use bridge::{PluginMessage, ProcessingBridge, ProcessingOptions, RequestId, UiMessage};
pub use compose::{ComposedLayer, ResultComposer};
pub use config::PluginConfig;
pub use error::{OutlineError, Result};
pub use extract::{AssetExtractor, ExtractionStrategy, FillExtractor, ImageAsset, NodeExporter};
pub use host::{Document, InMemoryDocument};
pub use placement::{Contain, Overlay, PlacementGeometry, PlacementMode, PlacementPolicy};
pub use plugin::{OutlinePlugin, PluginContext};
pub use processor::ReferenceProcessor;
