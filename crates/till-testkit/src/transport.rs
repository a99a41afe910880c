//! Scripted in-memory transport
//!
//! Stands in for the native host in tests: records every command, answers
//! from a script, and hands out event subscriptions that tests can fire,
//! delay and fail on demand.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use till_bridge::{CommandTransport, EventHandler, EventTransport, TransportError, TransportPair, Unlisten};
use tokio::sync::watch;

/// One recorded command invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Native command name
    pub command: String,
    /// Payload as sent; `None` when the bridge sent no payload
    pub payload: Option<Value>,
}

#[derive(Default)]
struct State {
    invocations: Vec<Invocation>,
    responses: HashMap<String, Result<Value, TransportError>>,
    failing_events: HashSet<String>,
    listen_calls: Vec<String>,
    handlers: HashMap<u64, (String, EventHandler)>,
    next_handler: u64,
    unlisten_calls: usize,
}

/// Command and event transport driven entirely by the test
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
    gate: watch::Sender<bool>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ScriptedTransport")
            .field("invocations", &state.invocations.len())
            .field("listen_calls", &state.listen_calls.len())
            .field("active_handlers", &state.handlers.len())
            .finish()
    }
}

impl ScriptedTransport {
    /// Transport answering `null` to every command, with listens open
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            state: Arc::new(Mutex::new(State::default())),
            gate,
        }
    }

    /// Wrap in an `Arc`, ready to share with a bridge
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Both transport halves backed by `transport`
    pub fn pair(transport: &Arc<Self>) -> TransportPair {
        TransportPair::shared(transport.clone())
    }

    // ─── commands ───────────────────────────────────────────────────────────

    /// Answer `command` with `value` from now on
    pub fn respond(&self, command: &str, value: Value) {
        self.state
            .lock()
            .responses
            .insert(command.to_string(), Ok(value));
    }

    /// Fail `command` with `message` from now on
    pub fn fail_command(&self, command: &str, message: &str) {
        self.state.lock().responses.insert(
            command.to_string(),
            Err(TransportError::command(command, message)),
        );
    }

    /// Every invocation so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().invocations.clone()
    }

    /// Most recent invocation
    pub fn last_invocation(&self) -> Option<Invocation> {
        self.state.lock().invocations.last().cloned()
    }

    /// Forget recorded invocations
    pub fn clear_invocations(&self) {
        self.state.lock().invocations.clear();
    }

    // ─── events ─────────────────────────────────────────────────────────────

    /// Make `listen` calls wait until [`Self::release_listens`]
    pub fn hold_listens(&self) {
        self.gate.send_replace(false);
    }

    /// Let waiting and future `listen` calls proceed
    pub fn release_listens(&self) {
        self.gate.send_replace(true);
    }

    /// Reject `listen` on `event`
    pub fn fail_listen(&self, event: &str) {
        self.state.lock().failing_events.insert(event.to_string());
    }

    /// Accept `listen` on `event` again
    pub fn allow_listen(&self, event: &str) {
        self.state.lock().failing_events.remove(event);
    }

    /// Number of `listen` calls made for `event`, including held and failed ones
    pub fn listen_count(&self, event: &str) -> usize {
        self.state
            .lock()
            .listen_calls
            .iter()
            .filter(|e| e.as_str() == event)
            .count()
    }

    /// Total unlisten handles called
    pub fn unlisten_count(&self) -> usize {
        self.state.lock().unlisten_calls
    }

    /// Live subscriptions on `event`
    pub fn active_handlers(&self, event: &str) -> usize {
        self.state
            .lock()
            .handlers
            .values()
            .filter(|(e, _)| e == event)
            .count()
    }

    /// Deliver `payload` to every live subscription on `event`; returns how
    /// many handlers ran
    pub fn fire(&self, event: &str, payload: Value) -> usize {
        let handlers: Vec<EventHandler> = self
            .state
            .lock()
            .handlers
            .values()
            .filter(|(e, _)| e == event)
            .map(|(_, h)| h.clone())
            .collect();
        for handler in &handlers {
            handler(payload.clone());
        }
        handlers.len()
    }
}

#[async_trait]
impl CommandTransport for ScriptedTransport {
    async fn invoke(&self, command: &str, payload: Option<Value>) -> Result<Value, TransportError> {
        let mut state = self.state.lock();
        state.invocations.push(Invocation {
            command: command.to_string(),
            payload,
        });
        state
            .responses
            .get(command)
            .cloned()
            .unwrap_or(Ok(Value::Null))
    }
}

#[async_trait]
impl EventTransport for ScriptedTransport {
    async fn listen(&self, event: &str, handler: EventHandler) -> Result<Unlisten, TransportError> {
        self.state.lock().listen_calls.push(event.to_string());

        let mut gate = self.gate.subscribe();
        gate.wait_for(|open| *open)
            .await
            .map_err(|_| TransportError::listen(event, "transport dropped"))?;

        let mut state = self.state.lock();
        if state.failing_events.contains(event) {
            return Err(TransportError::listen(event, "scripted failure"));
        }
        state.next_handler += 1;
        let id = state.next_handler;
        state.handlers.insert(id, (event.to_string(), handler));
        tracing::trace!(event, id, "scripted listen attached");

        let shared = self.state.clone();
        Ok(Unlisten::new(move || {
            let mut state = shared.lock();
            state.unlisten_calls += 1;
            state.handlers.remove(&id);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn records_and_answers_commands() {
        let transport = ScriptedTransport::new();
        transport.respond("settings_get", json!("tax"));
        let result = tokio_test::block_on(transport.invoke("settings_get", Some(json!({"key": "k"}))));
        assert_eq!(result, Ok(json!("tax")));
        assert_eq!(
            transport.last_invocation(),
            Some(Invocation {
                command: "settings_get".into(),
                payload: Some(json!({"key": "k"})),
            })
        );
    }

    #[test]
    fn fired_events_reach_live_handlers_only() {
        let transport = ScriptedTransport::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let handler: EventHandler = Arc::new(move |_: Value| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let unlisten = tokio_test::block_on(transport.listen("order_created", handler)).unwrap();
        assert_eq!(transport.fire("order_created", json!({})), 1);
        unlisten.call();
        assert_eq!(transport.fire("order_created", json!({})), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(transport.unlisten_count(), 1);
    }

    #[test]
    fn failing_listen_is_counted() {
        let transport = ScriptedTransport::new();
        transport.fail_listen("sync_status");
        let result = tokio_test::block_on(transport.listen("sync_status", Arc::new(|_: Value| {})));
        assert!(result.is_err());
        assert_eq!(transport.listen_count("sync_status"), 1);
        assert_eq!(transport.active_handlers("sync_status"), 0);
    }
}
