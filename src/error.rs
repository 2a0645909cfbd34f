//! Error handling for the outline pipeline
//!
//! Every failure is non-fatal to the plugin: it ends the current message
//! cycle with a single user-facing notification.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, OutlineError>;

/// Main error type for the outline pipeline
#[derive(Error, Debug)]
pub enum OutlineError {
    // Selection Errors
    #[error("Selection is empty")]
    EmptySelection,

    #[error("Unsupported layer: {reason}")]
    UnsupportedLayer { reason: String },

    #[error("Layer has no image fill")]
    NoImageFill,

    // Extraction Errors
    #[error("Image data unavailable")]
    ImageDataUnavailable,

    #[error("Layer does not support export")]
    ExportUnsupported,

    #[error("Export failed: {reason}")]
    ExportFailed { reason: String },

    // Processing Errors
    #[error("Processing failed: {message}")]
    ProcessingFailed { message: String },

    #[error("No pending request with id {request_id}")]
    UnknownRequest { request_id: String },

    #[error("Response carries no request id and {pending} requests are pending")]
    UnmatchedResponse { pending: usize },

    // Placement Errors
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    // Host Errors
    #[error("Host operation '{operation}' failed: {reason}")]
    HostOperation { operation: String, reason: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),
}

impl OutlineError {
    /// Build a host failure for the named operation
    pub fn host(operation: &str, reason: impl Into<String>) -> Self {
        OutlineError::HostOperation {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            OutlineError::EmptySelection => "EMPTY_SELECTION",
            OutlineError::UnsupportedLayer { .. } => "UNSUPPORTED_LAYER",
            OutlineError::NoImageFill => "NO_IMAGE_FILL",
            OutlineError::ImageDataUnavailable => "IMAGE_DATA_UNAVAILABLE",
            OutlineError::ExportUnsupported => "EXPORT_UNSUPPORTED",
            OutlineError::ExportFailed { .. } => "EXPORT_FAILED",
            OutlineError::ProcessingFailed { .. } => "PROCESSING_FAILED",
            OutlineError::UnknownRequest { .. } => "UNKNOWN_REQUEST",
            OutlineError::UnmatchedResponse { .. } => "UNMATCHED_RESPONSE",
            OutlineError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            OutlineError::HostOperation { .. } => "HOST_OPERATION",
            OutlineError::InvalidConfig { .. } => "INVALID_CONFIG",
            OutlineError::Io(_) => "IO_ERROR",
            OutlineError::Serialization(_) => "SERIALIZATION_ERROR",
            OutlineError::Image(_) => "IMAGE_ERROR",
        }
    }

    /// Check if the user can fix this by changing the selection and retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OutlineError::EmptySelection
                | OutlineError::UnsupportedLayer { .. }
                | OutlineError::NoImageFill
                | OutlineError::ImageDataUnavailable
                | OutlineError::ExportUnsupported
                | OutlineError::ExportFailed { .. }
                | OutlineError::ProcessingFailed { .. }
        )
    }

    /// Get the user-facing notification text for this error
    pub fn friendly_message(&self) -> String {
        match self {
            OutlineError::EmptySelection => "Please select an image first.".to_string(),
            OutlineError::UnsupportedLayer { .. } => "Selected layer has no fills.".to_string(),
            OutlineError::NoImageFill => "Selected object is not an image.".to_string(),
            OutlineError::ImageDataUnavailable => "Could not retrieve image data.".to_string(),
            OutlineError::ExportUnsupported => "Selected layer cannot be exported.".to_string(),
            OutlineError::ExportFailed { reason } => format!("Could not export layer: {}", reason),
            OutlineError::ProcessingFailed { message } => message.clone(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(OutlineError::EmptySelection.error_code(), "EMPTY_SELECTION");
        let err = OutlineError::ExportFailed {
            reason: "boom".to_string(),
        };
        assert_eq!(err.error_code(), "EXPORT_FAILED");
    }

    #[test]
    fn test_friendly_messages() {
        assert_eq!(
            OutlineError::EmptySelection.friendly_message(),
            "Please select an image first."
        );
        assert_eq!(
            OutlineError::NoImageFill.friendly_message(),
            "Selected object is not an image."
        );
        let err = OutlineError::ProcessingFailed {
            message: "canvas too large".to_string(),
        };
        assert_eq!(err.friendly_message(), "canvas too large");
    }

    #[test]
    fn test_recoverable() {
        assert!(OutlineError::NoImageFill.is_recoverable());
        assert!(!OutlineError::UnmatchedResponse { pending: 2 }.is_recoverable());
    }
}
