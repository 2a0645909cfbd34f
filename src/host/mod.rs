//! Host Module
//!
//! The design tool's document as the pipeline sees it:
//! - Snapshot model types (layers, fills, selection)
//! - The `Document` capability trait
//! - An in-memory document for tests and the CLI

mod document;
mod memory;
mod model;

pub use document::Document;
pub use memory::{InMemoryDocument, MAX_EXPORT_DIMENSION};
pub(crate) use memory::encode_image;
pub use model::{
    ExportFormat, ExportSettings, Fill, Frame, ImageRef, Layer, LayerId, ScaleMode, Selection,
};
