//! Wire protocol between the plugin and the UI-hosted processor
//!
//! Messages are JSON objects tagged by a kebab-case `type` field with
//! camelCase payload fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Correlation id attached to each processing request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User options for the processor
///
/// Only `strokeWidth` matters to the pipeline; every other knob is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOptions {
    pub stroke_width: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessingOptions {
    pub fn new(stroke_width: f64) -> Self {
        Self {
            stroke_width,
            extra: Map::new(),
        }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.extra
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Messages the UI sends to the plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiMessage {
    /// The user pressed "Generate"
    RequestProcess { options: ProcessingOptions },

    /// The processor finished; `data` is the encoded result image
    #[serde(rename_all = "camelCase")]
    ImageProcessed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
        data: Vec<u8>,
        options: ProcessingOptions,
    },

    /// The processor gave up
    #[serde(rename_all = "camelCase")]
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
        message: String,
    },
}

impl UiMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            UiMessage::RequestProcess { .. } => "request-process",
            UiMessage::ImageProcessed { .. } => "image-processed",
            UiMessage::Error { .. } => "error",
        }
    }

    /// Parse one inbound JSON message
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Messages the plugin sends to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginMessage {
    /// Hand source bytes to the processor
    #[serde(rename_all = "camelCase")]
    ProcessImage {
        request_id: RequestId,
        bytes: Vec<u8>,
        width: f64,
        height: f64,
        options: ProcessingOptions,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        export_scale: Option<f64>,
    },

    /// A request was rejected before reaching the processor
    #[serde(rename_all = "camelCase")]
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
        message: String,
    },
}

impl PluginMessage {
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            PluginMessage::ProcessImage { request_id, .. } => Some(request_id),
            PluginMessage::Error { request_id, .. } => request_id.as_ref(),
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The inbound half of a processing exchange
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorResponse {
    Processed {
        request_id: Option<RequestId>,
        data: Vec<u8>,
        options: ProcessingOptions,
    },
    Failed {
        request_id: Option<RequestId>,
        message: String,
    },
}

impl ProcessorResponse {
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            ProcessorResponse::Processed { request_id, .. } => request_id.as_ref(),
            ProcessorResponse::Failed { request_id, .. } => request_id.as_ref(),
        }
    }
}

impl TryFrom<UiMessage> for ProcessorResponse {
    type Error = UiMessage;

    /// Hands back the message unchanged when it is not a response
    fn try_from(message: UiMessage) -> std::result::Result<Self, UiMessage> {
        match message {
            UiMessage::ImageProcessed {
                request_id,
                data,
                options,
            } => Ok(ProcessorResponse::Processed {
                request_id,
                data,
                options,
            }),
            UiMessage::Error {
                request_id,
                message,
            } => Ok(ProcessorResponse::Failed {
                request_id,
                message,
            }),
            other => Err(other),
        }
    }
}
