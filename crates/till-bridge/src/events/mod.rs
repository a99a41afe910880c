//! # Event subscription manager
//!
//! Legacy code registers callbacks per channel with `on`/`off`. The native
//! host offers one-shot subscriptions per event name. This module keeps, per
//! legacy channel, the callback list and at most one native subscription:
//!
//! - the first listener on a detached channel starts one `listen` in the
//!   background; later listeners share that attach instead of starting another
//! - the last listener leaving tears the native subscription down, or marks it
//!   for release as soon as an in-flight attach lands
//! - delivery calls every listener in registration order; a panicking listener
//!   is caught and reported, and its siblings still run
//!
//! The lock around the table is never held across an `.await` or while a
//! listener or unlisten handle runs.

mod state;

pub use state::{AttachCompletion, AttachPhase, AttachStatus, CompletionEffect, PendingAttach};

use crate::config::BridgeConfig;
use crate::naming::CommandNaming;
use crate::registry::ChannelRegistry;
use crate::transport::{EventHandler, EventTransport};
use futures::FutureExt;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use state::SubscriptionTable;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use tracing::{debug, error, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Listener
// ─────────────────────────────────────────────────────────────────────────────

/// Callback registered on a legacy channel.
///
/// Identity is the allocation: clones of one `Listener` are the same
/// listener, two `Listener::new` calls over equal closures are not.
#[derive(Clone)]
pub struct Listener(Arc<dyn Fn(&Value) + Send + Sync>);

impl Listener {
    /// Wrap a callback
    pub fn new(f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Whether both handles point at the same callback
    pub fn same_as(&self, other: &Listener) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }

    /// Run the callback
    pub fn call(&self, payload: &Value) {
        (self.0)(payload);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Outcome of one delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Listeners that returned normally
    pub delivered: usize,
    /// Listeners that panicked
    pub failed: usize,
}

impl DeliveryReport {
    /// Total listeners called
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subscription registry
// ─────────────────────────────────────────────────────────────────────────────

struct Inner {
    events: Arc<dyn EventTransport>,
    registry: Arc<ChannelRegistry>,
    naming: CommandNaming,
    report_failures: bool,
    table: Mutex<SubscriptionTable>,
}

/// Per-channel listener sets over a native event transport.
///
/// Cheap to clone; clones share one table.
#[derive(Clone)]
pub struct SubscriptionRegistry {
    inner: Arc<Inner>,
}

impl fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("channels", &self.channels())
            .finish_non_exhaustive()
    }
}

impl SubscriptionRegistry {
    /// Create an empty registry over `events`. Event channels found in
    /// `registry` use their recorded native name; others use the derived one.
    pub fn new(
        events: Arc<dyn EventTransport>,
        registry: Arc<ChannelRegistry>,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                events,
                registry,
                naming: CommandNaming::new(config.command_separator),
                report_failures: config.report_listener_failures,
                table: Mutex::new(SubscriptionTable::default()),
            }),
        }
    }

    /// Native event name backing a legacy channel
    pub fn native_event(&self, channel: &str) -> String {
        self.inner.native_event(channel)
    }

    /// Register `listener` on `channel` without waiting for the native attach.
    ///
    /// Returns `false` when the listener was already registered. Needs a tokio
    /// runtime to run the attach; without one the listener is kept but the
    /// channel stays detached until a later registration can attach it.
    pub fn on_event(&self, channel: &str, listener: Listener) -> bool {
        let runtime = tokio::runtime::Handle::try_current().ok();
        let (added, started) = self.inner.register(channel, listener, runtime.is_some());
        match (started, runtime) {
            (Some(pending), Some(handle)) => {
                handle.spawn(pending);
            }
            (None, None) if self.phase(channel) == AttachPhase::Detached => {
                warn!(channel, "no async runtime; channel stays detached");
            }
            _ => {}
        }
        added
    }

    /// Register `listener` and wait for the channel's attach to finish.
    ///
    /// Joins an attach already in flight rather than starting another.
    pub async fn on_event_attached(&self, channel: &str, listener: Listener) -> AttachStatus {
        let (_, started) = self.inner.register(channel, listener, true);
        if let (Some(pending), Ok(handle)) = (&started, tokio::runtime::Handle::try_current()) {
            handle.spawn(pending.clone());
        }
        match started.or_else(|| self.inner.table.lock().pending(channel)) {
            Some(pending) => pending.await,
            None => self.settled_status(channel),
        }
    }

    /// Wait for the in-flight attach on `channel`, if any
    pub async fn settle(&self, channel: &str) -> Option<AttachStatus> {
        let pending = self.inner.table.lock().pending(channel)?;
        Some(pending.await)
    }

    /// Remove `listener`; the last one out detaches the channel.
    /// Returns whether it was registered.
    pub fn off_event(&self, channel: &str, listener: &Listener) -> bool {
        let (removed, release) = self.inner.table.lock().unregister(channel, listener);
        if let Some(unlisten) = release {
            debug!(channel, "last listener removed; detaching");
            unlisten.call();
        }
        removed
    }

    /// Remove every listener on `channel` and detach it. Returns how many
    /// listeners were removed.
    pub fn remove_all_listeners(&self, channel: &str) -> usize {
        let (removed, release) = self.inner.table.lock().unregister_all(channel);
        if let Some(unlisten) = release {
            debug!(channel, removed, "all listeners removed; detaching");
            unlisten.call();
        }
        removed
    }

    /// Deliver `payload` to the listeners registered on `channel` right now
    pub fn emit(&self, channel: &str, payload: &Value) -> DeliveryReport {
        self.inner.deliver(channel, payload)
    }

    /// Attach phase of `channel`
    pub fn phase(&self, channel: &str) -> AttachPhase {
        self.inner.table.lock().phase(channel)
    }

    /// Listeners currently registered on `channel`
    pub fn listener_count(&self, channel: &str) -> usize {
        self.inner.table.lock().listener_count(channel)
    }

    /// Channels with listeners or an attach in flight
    pub fn channels(&self) -> Vec<String> {
        self.inner.table.lock().channels()
    }

    /// Drop every listener and release every live native subscription.
    /// Attaches still in flight release their handle when they land.
    pub fn reset(&self) {
        let handles = self.inner.table.lock().clear();
        debug!(released = handles.len(), "resetting subscriptions");
        for unlisten in handles {
            unlisten.call();
        }
    }

    fn settled_status(&self, channel: &str) -> AttachStatus {
        match self.phase(channel) {
            AttachPhase::Attached | AttachPhase::Attaching => AttachStatus::Attached,
            AttachPhase::Detached => AttachStatus::Failed,
        }
    }
}

impl Inner {
    fn native_event(&self, channel: &str) -> String {
        self.registry
            .native_event(channel)
            .map(str::to_string)
            .unwrap_or_else(|| self.naming.derive(channel))
    }

    /// Register under the lock; when the channel was detached and an attach
    /// may start, build the attach future and record it as pending before
    /// the lock is released.
    fn register(
        self: &Arc<Self>,
        channel: &str,
        listener: Listener,
        can_attach: bool,
    ) -> (bool, Option<PendingAttach>) {
        let mut table = self.table.lock();
        let registration = table.register(channel, listener);
        let started = match registration.start_attach {
            Some(generation) if can_attach => {
                let pending = self.attach(channel, generation);
                table.mark_attaching(channel, generation, pending.clone());
                debug!(channel, generation, "attaching native subscription");
                Some(pending)
            }
            _ => None,
        };
        (registration.added, started)
    }

    fn attach(self: &Arc<Self>, channel: &str, generation: u64) -> PendingAttach {
        let weak = Arc::downgrade(self);
        let events = self.events.clone();
        let native = self.native_event(channel);
        let handler = native_handler(weak.clone(), channel.to_string());
        let channel = channel.to_string();

        async move {
            let outcome = events.listen(&native, handler).await;
            match weak.upgrade() {
                Some(inner) => inner.finish_attach(AttachCompletion {
                    channel,
                    generation,
                    outcome,
                }),
                None => {
                    if let Ok(unlisten) = outcome {
                        unlisten.call();
                    }
                    AttachStatus::Released
                }
            }
        }
        .boxed()
        .shared()
    }

    fn finish_attach(&self, completion: AttachCompletion) -> AttachStatus {
        let channel = completion.channel.clone();
        let effect = self.table.lock().complete(completion);
        let status = effect.status();
        match effect {
            CompletionEffect::Stored => debug!(channel, "native subscription attached"),
            CompletionEffect::Release(unlisten) => {
                debug!(channel, "no listeners left when attach landed; releasing");
                unlisten.call();
            }
            CompletionEffect::Failed(err) => {
                warn!(channel, error = %err, "native listen failed; channel stays undelivered");
            }
        }
        status
    }

    fn deliver(&self, channel: &str, payload: &Value) -> DeliveryReport {
        let listeners = self.table.lock().listeners(channel);
        let mut report = DeliveryReport::default();
        for (index, listener) in listeners.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| listener.call(payload))) {
                Ok(()) => report.delivered += 1,
                Err(panic) => {
                    report.failed += 1;
                    let message = panic_message(panic.as_ref());
                    if self.report_failures {
                        error!(channel, index, %message, "listener panicked during delivery");
                    } else {
                        debug!(channel, index, %message, "listener panicked during delivery");
                    }
                }
            }
        }
        report
    }
}

fn native_handler(inner: Weak<Inner>, channel: String) -> EventHandler {
    Arc::new(move |payload: Value| {
        if let Some(inner) = inner.upgrade() {
            inner.deliver(&channel, &payload);
        }
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
