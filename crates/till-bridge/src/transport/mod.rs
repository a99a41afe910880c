//! Native transport seam
//!
//! The bridge never talks to the host directly. Commands go through a
//! [`CommandTransport`], push events through an [`EventTransport`]. Both
//! are supplied from outside (the desktop shell, or a scripted fake in tests).

mod offline;

pub use offline::OfflineTransport;

use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Callback the native layer invokes for every event payload
pub type EventHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Single keyed-argument command invocation
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Run a native command. `None` means "no payload", which some native
    /// signatures distinguish from an empty object.
    async fn invoke(&self, command: &str, payload: Option<Value>) -> Result<Value, TransportError>;
}

/// One-shot native event subscription
#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Subscribe `handler` to `event`. The returned handle tears the
    /// subscription down when called.
    async fn listen(&self, event: &str, handler: EventHandler) -> Result<Unlisten, TransportError>;
}

/// Handle that detaches one native subscription
pub struct Unlisten(Box<dyn FnOnce() + Send>);

impl Unlisten {
    /// Wrap a teardown closure
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Handle whose teardown does nothing
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Detach the subscription
    pub fn call(self) {
        (self.0)();
    }
}

impl fmt::Debug for Unlisten {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unlisten")
    }
}

/// Command and event halves of one native host
#[derive(Clone)]
pub struct TransportPair {
    /// Command invocation half
    pub commands: Arc<dyn CommandTransport>,
    /// Event subscription half
    pub events: Arc<dyn EventTransport>,
}

impl TransportPair {
    /// Back both halves with the same object
    pub fn shared<T>(transport: Arc<T>) -> Self
    where
        T: CommandTransport + EventTransport + 'static,
    {
        Self {
            commands: transport.clone(),
            events: transport,
        }
    }

    /// Pair that rejects everything
    pub fn offline(reason: impl Into<String>) -> Self {
        Self::shared(Arc::new(OfflineTransport::new(reason)))
    }
}

impl fmt::Debug for TransportPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportPair").finish_non_exhaustive()
    }
}
