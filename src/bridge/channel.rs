//! Awaitable processor channel
//!
//! Wraps `ProcessingBridge` for hosts that run the pipeline on tokio: outbound
//! messages go into an mpsc queue and each request hands back a oneshot that
//! completes when the matching response is delivered.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::{mpsc, oneshot};

use super::pending::{CompletedRequest, ProcessingBridge, Resolution};
use super::protocol::{PluginMessage, ProcessingOptions, ProcessorResponse, RequestId};
use crate::error::{OutlineError, Result};
use crate::extract::ImageAsset;
use crate::host::Layer;

type Waiter = oneshot::Sender<Result<CompletedRequest>>;

#[derive(Default)]
struct ChannelState {
    bridge: ProcessingBridge,
    waiters: HashMap<RequestId, Waiter>,
}

/// Processor exchange with awaitable responses
pub struct ProcessorChannel {
    state: Mutex<ChannelState>,
    outbound: mpsc::UnboundedSender<PluginMessage>,
}

impl ProcessorChannel {
    /// Create a channel and the receiver the UI transport drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PluginMessage>) {
        let (outbound, receiver) = mpsc::unbounded_channel();
        let channel = Self {
            state: Mutex::new(ChannelState::default()),
            outbound,
        };
        (channel, receiver)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ChannelState>> {
        self.state.lock().map_err(|_| OutlineError::ProcessingFailed {
            message: "processor channel lock poisoned".to_string(),
        })
    }

    /// Submit a request and get a receiver for its outcome
    pub fn request(
        &self,
        layer: &Layer,
        asset: ImageAsset,
        options: ProcessingOptions,
    ) -> Result<oneshot::Receiver<Result<CompletedRequest>>> {
        let (sender, receiver) = oneshot::channel();

        let mut state = self.lock()?;
        let message = state.bridge.submit(layer, asset, options);
        let request_id = message
            .request_id()
            .cloned()
            .ok_or_else(|| OutlineError::ProcessingFailed {
                message: "outbound request has no id".to_string(),
            })?;

        if self.outbound.send(message).is_err() {
            state.bridge.cancel(&request_id);
            return Err(OutlineError::ProcessingFailed {
                message: "processor transport closed".to_string(),
            });
        }

        state.waiters.insert(request_id, sender);
        Ok(receiver)
    }

    /// Route an inbound response to whoever is waiting on it
    ///
    /// A failure that matches no request is returned so the caller can still
    /// show its message.
    pub fn deliver(&self, response: ProcessorResponse) -> Result<()> {
        let mut state = self.lock()?;
        let (request_id, outcome) = match state.bridge.resolve(response)? {
            Resolution::Completed(completed) => {
                (completed.request.request_id.clone(), Ok(completed))
            }
            Resolution::Failed {
                request: Some(request),
                message,
            } => (
                request.request_id,
                Err(OutlineError::ProcessingFailed { message }),
            ),
            Resolution::Failed {
                request: None,
                message,
            } => return Err(OutlineError::ProcessingFailed { message }),
        };

        match state.waiters.remove(&request_id) {
            Some(waiter) => {
                if waiter.send(outcome).is_err() {
                    tracing::debug!(request = %request_id, "waiter dropped before response");
                }
            }
            None => tracing::warn!(request = %request_id, "no waiter for resolved request"),
        }

        // Superseded requests are gone from the bridge; their receivers see a closed channel
        let ChannelState { bridge, waiters } = &mut *state;
        waiters.retain(|id, _| bridge.is_pending(id));
        Ok(())
    }

    pub fn pending_count(&self) -> usize {
        self.lock().map(|state| state.bridge.pending_count()).unwrap_or(0)
    }
}
