//! Request/response correlation
//!
//! Each outbound `process-image` gets a fresh id and a pending entry holding
//! everything placement needs later. Responses are matched by id, so a second
//! request issued before the first resolves can no longer be paired with the
//! wrong answer.

use std::collections::HashMap;
use std::time::Instant;

use super::protocol::{PluginMessage, ProcessingOptions, ProcessorResponse, RequestId};
use crate::error::{OutlineError, Result};
use crate::extract::ImageAsset;
use crate::host::{Frame, Layer, LayerId};

/// A request the processor has not answered yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub request_id: RequestId,
    /// Source layer, kept for naming and diagnostics only
    pub layer_id: LayerId,
    /// Frame of the source layer when the request was made
    pub original: Frame,
    pub options: ProcessingOptions,
    pub submitted_at: Instant,
}

/// A successful response paired with its request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRequest {
    pub request: PendingRequest,
    /// Encoded result image
    pub data: Vec<u8>,
    /// Options echoed back by the processor
    pub options: ProcessingOptions,
}

/// Outcome of matching one response
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Completed(CompletedRequest),
    /// `request` is `None` when the failure could not be matched
    Failed {
        request: Option<PendingRequest>,
        message: String,
    },
}

impl Resolution {
    pub fn into_result(self) -> Result<CompletedRequest> {
        match self {
            Resolution::Completed(completed) => Ok(completed),
            Resolution::Failed { message, .. } => Err(OutlineError::ProcessingFailed { message }),
        }
    }
}

/// Pending-request map for the processing exchange
#[derive(Debug, Default)]
pub struct ProcessingBridge {
    pending: HashMap<RequestId, PendingRequest>,
    /// Pending ids, oldest first
    order: Vec<RequestId>,
}

impl ProcessingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request and build its outbound message
    ///
    /// The asset's export scale, when present, is copied unchanged.
    pub fn submit(
        &mut self,
        layer: &Layer,
        asset: ImageAsset,
        options: ProcessingOptions,
    ) -> PluginMessage {
        let request_id = RequestId::generate();
        let width = asset.width();
        let height = asset.height();
        let export_scale = asset.source_scale();

        self.order.push(request_id.clone());
        self.pending.insert(
            request_id.clone(),
            PendingRequest {
                request_id: request_id.clone(),
                layer_id: layer.id.clone(),
                original: layer.frame,
                options: options.clone(),
                submitted_at: Instant::now(),
            },
        );

        tracing::info!(
            request = %request_id,
            layer = %layer.id,
            pending = self.pending.len(),
            "submitted processing request"
        );

        PluginMessage::ProcessImage {
            request_id,
            bytes: asset.into_bytes(),
            width,
            height,
            options,
            export_scale,
        }
    }

    /// Match a response to its pending request and remove it
    ///
    /// A response without an id answers the most recent request; any older
    /// pending requests are superseded and dropped.
    ///
    /// # Errors
    /// - `UnknownRequest` for a success whose id is not pending
    /// - `UnmatchedResponse` for a success without id when nothing is pending
    pub fn resolve(&mut self, response: ProcessorResponse) -> Result<Resolution> {
        match response {
            ProcessorResponse::Processed {
                request_id,
                data,
                options,
            } => {
                let request = self.take(request_id.as_ref())?;
                tracing::info!(
                    request = %request.request_id,
                    elapsed_ms = request.submitted_at.elapsed().as_millis() as u64,
                    bytes = data.len(),
                    "processing completed"
                );
                Ok(Resolution::Completed(CompletedRequest {
                    request,
                    data,
                    options,
                }))
            }
            ProcessorResponse::Failed {
                request_id,
                message,
            } => {
                let request = match self.take(request_id.as_ref()) {
                    Ok(request) => Some(request),
                    Err(e) => {
                        tracing::warn!(error = %e, "processing failure matched no request");
                        None
                    }
                };
                Ok(Resolution::Failed { request, message })
            }
        }
    }

    fn take(&mut self, request_id: Option<&RequestId>) -> Result<PendingRequest> {
        let id = match request_id {
            Some(id) => id.clone(),
            None => self
                .order
                .last()
                .cloned()
                .ok_or(OutlineError::UnmatchedResponse { pending: 0 })?,
        };

        let request = self
            .pending
            .remove(&id)
            .ok_or_else(|| OutlineError::UnknownRequest {
                request_id: id.to_string(),
            })?;
        self.order.retain(|pending| pending != &id);

        if request_id.is_none() && !self.pending.is_empty() {
            let superseded = self.cancel_all();
            tracing::warn!(
                request = %id,
                superseded = superseded.len(),
                "response without id answered the latest request"
            );
        }
        Ok(request)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, request_id: &RequestId) -> bool {
        self.pending.contains_key(request_id)
    }

    /// Forget one pending request
    pub fn cancel(&mut self, request_id: &RequestId) -> Option<PendingRequest> {
        self.order.retain(|pending| pending != request_id);
        self.pending.remove(request_id)
    }

    /// Forget every pending request
    ///
    /// The processor is not told; late responses will fail to match.
    pub fn cancel_all(&mut self) -> Vec<PendingRequest> {
        self.order.clear();
        self.pending.drain().map(|(_, request)| request).collect()
    }
}
