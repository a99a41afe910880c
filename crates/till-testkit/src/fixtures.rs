//! Listener fixtures and context builders

use crate::transport::ScriptedTransport;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use till_bridge::{BridgeConfig, BridgeContext, Listener};

/// Listener that counts its calls
#[derive(Debug, Clone)]
pub struct CountingListener {
    /// Register this
    pub listener: Listener,
    hits: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Fresh listener at zero
    pub fn new() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        Self {
            listener: Listener::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            hits,
        }
    }

    /// Calls so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Default for CountingListener {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener that keeps every payload it receives
#[derive(Debug, Clone)]
pub struct RecordingListener {
    /// Register this
    pub listener: Listener,
    payloads: Arc<Mutex<Vec<Value>>>,
}

impl RecordingListener {
    /// Fresh listener with nothing recorded
    pub fn new() -> Self {
        let payloads = Arc::new(Mutex::new(Vec::new()));
        let sink = payloads.clone();
        Self {
            listener: Listener::new(move |payload| sink.lock().push(payload.clone())),
            payloads,
        }
    }

    /// Payloads received, in order
    pub fn payloads(&self) -> Vec<Value> {
        self.payloads.lock().clone()
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener that panics with `message` on every call
pub fn panicking_listener(message: &'static str) -> Listener {
    Listener::new(move |_| panic!("{message}"))
}

/// Context whose bridge and events run over `transport`
pub fn scripted_context(transport: &Arc<ScriptedTransport>) -> BridgeContext {
    scripted_context_with(transport, BridgeConfig::default())
}

/// [`scripted_context`] with a custom configuration
pub fn scripted_context_with(transport: &Arc<ScriptedTransport>, config: BridgeConfig) -> BridgeContext {
    match BridgeContext::builder()
        .config(config)
        .transport(ScriptedTransport::pair(transport))
        .build()
    {
        Ok(ctx) => ctx,
        Err(err) => panic!("test context failed to build: {err}"),
    }
}
