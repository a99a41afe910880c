//! Subscription table and attach state machine
//!
//! Per channel: `Detached -> Attaching -> Attached -> Detached`. All
//! transitions are plain methods on [`SubscriptionTable`] so the lifecycle
//! can be exercised without a runtime. Side effects (calling an unlisten
//! handle, logging) are returned to the caller to perform outside the lock.

use super::Listener;
use crate::error::TransportError;
use crate::transport::Unlisten;
use futures::future::{BoxFuture, Shared};
use indexmap::IndexMap;
use serde::Serialize;

/// In-flight attach, shared by every caller waiting on it
pub type PendingAttach = Shared<BoxFuture<'static, AttachStatus>>;

/// Outcome of one attach attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachStatus {
    /// A native subscription is live and delivering
    Attached,
    /// The subscription opened, but nobody was listening any more, so it was
    /// closed again immediately
    Released,
    /// `listen` rejected; the channel stays detached until the next `on_event`
    Failed,
}

/// Observable attach state of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachPhase {
    /// No native subscription and none in flight
    Detached,
    /// `listen` has been issued and not yet resolved
    Attaching,
    /// Native subscription live
    Attached,
}

pub(crate) enum AttachState {
    Detached,
    Attaching {
        generation: u64,
        pending: PendingAttach,
    },
    Attached {
        generation: u64,
        unlisten: Unlisten,
    },
}

impl AttachState {
    fn phase(&self) -> AttachPhase {
        match self {
            Self::Detached => AttachPhase::Detached,
            Self::Attaching { .. } => AttachPhase::Attaching,
            Self::Attached { .. } => AttachPhase::Attached,
        }
    }
}

/// One legacy channel with at least one listener or an attach in flight
pub(crate) struct Subscription {
    listeners: Vec<Listener>,
    attach: AttachState,
}

impl Subscription {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
            attach: AttachState::Detached,
        }
    }
}

/// Result of a finished `listen`, applied back to the table
#[derive(Debug)]
pub struct AttachCompletion {
    /// Channel the attach was started for
    pub channel: String,
    /// Generation recorded when the attach started
    pub generation: u64,
    /// What `listen` returned
    pub outcome: Result<Unlisten, TransportError>,
}

/// Work the caller must do after applying a completion
#[derive(Debug)]
pub enum CompletionEffect {
    /// Handle stored; nothing to do
    Stored,
    /// Nobody wants this subscription; call the handle now
    Release(Unlisten),
    /// Attach failed; report it
    Failed(TransportError),
}

impl CompletionEffect {
    /// Status reported to waiters
    pub fn status(&self) -> AttachStatus {
        match self {
            Self::Stored => AttachStatus::Attached,
            Self::Release(_) => AttachStatus::Released,
            Self::Failed(_) => AttachStatus::Failed,
        }
    }
}

/// Outcome of registering a listener
pub(crate) struct Registration {
    /// The listener was not already registered
    pub added: bool,
    /// The channel was detached and needs an attach with this generation
    pub start_attach: Option<u64>,
}

/// Every live subscription, keyed by legacy channel
#[derive(Default)]
pub(crate) struct SubscriptionTable {
    channels: IndexMap<String, Subscription>,
    next_generation: u64,
}

impl SubscriptionTable {
    /// Add a listener; report whether an attach must start
    pub fn register(&mut self, channel: &str, listener: Listener) -> Registration {
        let subscription = self
            .channels
            .entry(channel.to_string())
            .or_insert_with(Subscription::new);

        let added = if subscription.listeners.iter().any(|l| l.same_as(&listener)) {
            false
        } else {
            subscription.listeners.push(listener);
            true
        };

        let start_attach = match subscription.attach {
            AttachState::Detached => {
                self.next_generation += 1;
                Some(self.next_generation)
            }
            AttachState::Attaching { .. } | AttachState::Attached { .. } => None,
        };

        Registration { added, start_attach }
    }

    /// Record the in-flight attach for `generation`
    pub fn mark_attaching(&mut self, channel: &str, generation: u64, pending: PendingAttach) {
        if let Some(subscription) = self.channels.get_mut(channel) {
            subscription.attach = AttachState::Attaching {
                generation,
                pending,
            };
        }
    }

    /// Apply a finished `listen`
    pub fn complete(&mut self, completion: AttachCompletion) -> CompletionEffect {
        let AttachCompletion {
            channel,
            generation,
            outcome,
        } = completion;

        let current = self.channels.get_mut(&channel).filter(|s| {
            matches!(s.attach, AttachState::Attaching { generation: g, .. } if g == generation)
        });

        let Some(subscription) = current else {
            // Reset or superseded while in flight
            return match outcome {
                Ok(unlisten) => CompletionEffect::Release(unlisten),
                Err(err) => CompletionEffect::Failed(err),
            };
        };

        match outcome {
            Ok(unlisten) if !subscription.listeners.is_empty() => {
                subscription.attach = AttachState::Attached {
                    generation,
                    unlisten,
                };
                CompletionEffect::Stored
            }
            Ok(unlisten) => {
                self.channels.shift_remove(&channel);
                CompletionEffect::Release(unlisten)
            }
            Err(err) => {
                if subscription.listeners.is_empty() {
                    self.channels.shift_remove(&channel);
                } else {
                    subscription.attach = AttachState::Detached;
                }
                CompletionEffect::Failed(err)
            }
        }
    }

    /// Remove one listener. Returns whether it was registered and, when the
    /// channel is now unused and attached, the handle to release.
    pub fn unregister(&mut self, channel: &str, listener: &Listener) -> (bool, Option<Unlisten>) {
        let Some(subscription) = self.channels.get_mut(channel) else {
            return (false, None);
        };
        let before = subscription.listeners.len();
        subscription.listeners.retain(|l| !l.same_as(listener));
        let removed = subscription.listeners.len() != before;
        (removed, self.detach_if_unused(channel))
    }

    /// Remove every listener of a channel
    pub fn unregister_all(&mut self, channel: &str) -> (usize, Option<Unlisten>) {
        let Some(subscription) = self.channels.get_mut(channel) else {
            return (0, None);
        };
        let removed = subscription.listeners.len();
        subscription.listeners.clear();
        (removed, self.detach_if_unused(channel))
    }

    // An attach in flight keeps the entry; its completion releases the handle.
    fn detach_if_unused(&mut self, channel: &str) -> Option<Unlisten> {
        let subscription = self.channels.get(channel)?;
        let attaching = matches!(subscription.attach, AttachState::Attaching { .. });
        if !subscription.listeners.is_empty() || attaching {
            return None;
        }
        match self.channels.shift_remove(channel)?.attach {
            AttachState::Attached { unlisten, .. } => Some(unlisten),
            AttachState::Detached | AttachState::Attaching { .. } => None,
        }
    }

    /// Snapshot of a channel's listeners in registration order
    pub fn listeners(&self, channel: &str) -> Vec<Listener> {
        self.channels
            .get(channel)
            .map(|s| s.listeners.clone())
            .unwrap_or_default()
    }

    /// In-flight attach for a channel, if any
    pub fn pending(&self, channel: &str) -> Option<PendingAttach> {
        match &self.channels.get(channel)?.attach {
            AttachState::Attaching { pending, .. } => Some(pending.clone()),
            AttachState::Detached | AttachState::Attached { .. } => None,
        }
    }

    /// Attach phase of a channel
    pub fn phase(&self, channel: &str) -> AttachPhase {
        self.channels
            .get(channel)
            .map_or(AttachPhase::Detached, |s| s.attach.phase())
    }

    /// Generation of the current attach or attachment
    #[cfg(test)]
    pub fn generation(&self, channel: &str) -> Option<u64> {
        match self.channels.get(channel)?.attach {
            AttachState::Attaching { generation, .. } | AttachState::Attached { generation, .. } => {
                Some(generation)
            }
            AttachState::Detached => None,
        }
    }

    /// Number of listeners on a channel
    pub fn listener_count(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, |s| s.listeners.len())
    }

    /// Channels currently tracked, in first-registration order
    pub fn channels(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    /// Drop everything; returns the live handles to release. Attaches still
    /// in flight find no entry on completion and release themselves.
    pub fn clear(&mut self) -> Vec<Unlisten> {
        self.channels
            .drain(..)
            .filter_map(|(_, subscription)| match subscription.attach {
                AttachState::Attached { unlisten, .. } => Some(unlisten),
                AttachState::Detached | AttachState::Attaching { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn pending() -> PendingAttach {
        futures::future::ready(AttachStatus::Attached).boxed().shared()
    }

    fn counting_unlisten() -> (Unlisten, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        (
            Unlisten::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            calls,
        )
    }

    fn start(table: &mut SubscriptionTable, channel: &str, listener: Listener) -> u64 {
        let registration = table.register(channel, listener);
        let generation = registration.start_attach.unwrap();
        table.mark_attaching(channel, generation, pending());
        generation
    }

    #[test]
    fn first_listener_starts_attach_second_does_not() {
        let mut table = SubscriptionTable::default();
        start(&mut table, "c", Listener::new(|_| {}));
        assert_eq!(table.phase("c"), AttachPhase::Attaching);

        let registration = table.register("c", Listener::new(|_| {}));
        assert!(registration.added);
        assert!(registration.start_attach.is_none());
        assert_eq!(table.listener_count("c"), 2);
    }

    #[test]
    fn same_listener_registers_once() {
        let mut table = SubscriptionTable::default();
        let listener = Listener::new(|_| {});
        start(&mut table, "c", listener.clone());
        assert!(!table.register("c", listener).added);
        assert_eq!(table.listener_count("c"), 1);
    }

    #[test]
    fn completion_with_listeners_attaches() {
        let mut table = SubscriptionTable::default();
        let generation = start(&mut table, "c", Listener::new(|_| {}));
        let effect = table.complete(AttachCompletion {
            channel: "c".into(),
            generation,
            outcome: Ok(Unlisten::noop()),
        });
        assert_eq!(effect.status(), AttachStatus::Attached);
        assert_eq!(table.phase("c"), AttachPhase::Attached);
    }

    #[test]
    fn completion_after_last_listener_left_releases() {
        let mut table = SubscriptionTable::default();
        let listener = Listener::new(|_| {});
        let generation = start(&mut table, "c", listener.clone());

        let (removed, release) = table.unregister("c", &listener);
        assert!(removed);
        assert!(release.is_none());
        assert_eq!(table.phase("c"), AttachPhase::Attaching);

        let (unlisten, calls) = counting_unlisten();
        let effect = table.complete(AttachCompletion {
            channel: "c".into(),
            generation,
            outcome: Ok(unlisten),
        });
        match effect {
            CompletionEffect::Release(handle) => handle.call(),
            other => panic!("expected release, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(table.channels().is_empty());
    }

    #[test]
    fn failed_attach_keeps_listeners_detached() {
        let mut table = SubscriptionTable::default();
        let generation = start(&mut table, "c", Listener::new(|_| {}));
        let effect = table.complete(AttachCompletion {
            channel: "c".into(),
            generation,
            outcome: Err(TransportError::listen("c", "denied")),
        });
        assert_eq!(effect.status(), AttachStatus::Failed);
        assert_eq!(table.phase("c"), AttachPhase::Detached);
        assert_eq!(table.listener_count("c"), 1);

        // A later registration retries
        assert!(table.register("c", Listener::new(|_| {})).start_attach.is_some());
    }

    #[test]
    fn last_listener_leaving_attached_channel_returns_handle() {
        let mut table = SubscriptionTable::default();
        let listener = Listener::new(|_| {});
        let generation = start(&mut table, "c", listener.clone());
        table.complete(AttachCompletion {
            channel: "c".into(),
            generation,
            outcome: Ok(Unlisten::noop()),
        });
        let (_, release) = table.unregister("c", &listener);
        assert!(release.is_some());
        assert_eq!(table.phase("c"), AttachPhase::Detached);
        assert!(table.channels().is_empty());
    }

    #[test]
    fn stale_completion_after_clear_releases() {
        let mut table = SubscriptionTable::default();
        let generation = start(&mut table, "c", Listener::new(|_| {}));
        assert!(table.clear().is_empty());

        let effect = table.complete(AttachCompletion {
            channel: "c".into(),
            generation,
            outcome: Ok(Unlisten::noop()),
        });
        assert_eq!(effect.status(), AttachStatus::Released);
    }

    #[test]
    fn stale_generation_does_not_touch_new_attach() {
        let mut table = SubscriptionTable::default();
        let old = start(&mut table, "c", Listener::new(|_| {}));
        table.clear();
        let new = start(&mut table, "c", Listener::new(|_| {}));
        assert_ne!(old, new);

        let effect = table.complete(AttachCompletion {
            channel: "c".into(),
            generation: old,
            outcome: Ok(Unlisten::noop()),
        });
        assert_eq!(effect.status(), AttachStatus::Released);
        assert_eq!(table.phase("c"), AttachPhase::Attaching);
        assert_eq!(table.generation("c"), Some(new));
    }

    #[test]
    fn unregister_unknown_listener_is_harmless() {
        let mut table = SubscriptionTable::default();
        start(&mut table, "c", Listener::new(|_| {}));
        let (removed, release) = table.unregister("c", &Listener::new(|_| {}));
        assert!(!removed);
        assert!(release.is_none());
        assert!(!table.unregister("missing", &Listener::new(|_| {})).0);
    }
}
