//! Processing Bridge
//!
//! Two-phase exchange with the external processor:
//! 1. Outbound `process-image` carrying the extracted asset and options
//! 2. Inbound `image-processed` or `error`, matched back by correlation id
//!
//! There is no shared memory between the phases and no way to abort a
//! request once it has been sent.

#[cfg(feature = "async-bridge")]
mod channel;
mod pending;
mod protocol;

#[cfg(feature = "async-bridge")]
pub use channel::ProcessorChannel;
pub use pending::{CompletedRequest, PendingRequest, ProcessingBridge, Resolution};
pub use protocol::{PluginMessage, ProcessingOptions, ProcessorResponse, RequestId, UiMessage};
