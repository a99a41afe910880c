//! Event subscription lifecycle over a scripted native host: attach dedup,
//! the detach race, delivery isolation, failed attaches, and reset.

use serde_json::json;
use till_bridge::{AttachPhase, AttachStatus, DeliveryReport};
use till_testkit::{
    panicking_listener, scripted_context, CountingListener, RecordingListener, ScriptedTransport,
};

const CHANNEL: &str = "order-created";
const NATIVE: &str = "order_created";

async fn spin_until(mut done: impl FnMut() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn concurrent_registrations_share_one_attach() {
    let transport = ScriptedTransport::shared();
    let ctx = scripted_context(&transport);
    let subs = ctx.subscriptions();

    transport.hold_listens();
    let first = CountingListener::new();
    let second = CountingListener::new();
    assert!(subs.on_event(CHANNEL, first.listener.clone()));
    assert!(subs.on_event(CHANNEL, second.listener.clone()));
    assert_eq!(subs.phase(CHANNEL), AttachPhase::Attaching);

    spin_until(|| transport.listen_count(NATIVE) == 1).await;
    transport.release_listens();
    assert_eq!(subs.settle(CHANNEL).await, Some(AttachStatus::Attached));

    assert_eq!(transport.listen_count(NATIVE), 1);
    assert_eq!(transport.fire(NATIVE, json!({"id": "o-1"})), 1);
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_registrations_share_one_attach() {
    let transport = ScriptedTransport::shared();
    let ctx = scripted_context(&transport);
    transport.hold_listens();

    let listeners: Vec<_> = (0..16).map(|_| CountingListener::new()).collect();
    let tasks: Vec<_> = listeners
        .iter()
        .map(|l| {
            let subs = ctx.subscriptions().clone();
            let listener = l.listener.clone();
            tokio::spawn(async move { subs.on_event(CHANNEL, listener) })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap());
    }

    transport.release_listens();
    assert_eq!(
        ctx.subscriptions().settle(CHANNEL).await,
        Some(AttachStatus::Attached)
    );
    assert_eq!(transport.listen_count(NATIVE), 1);
    assert_eq!(ctx.subscriptions().listener_count(CHANNEL), 16);

    transport.fire(NATIVE, json!({}));
    assert!(listeners.iter().all(|l| l.hits() == 1));
}

#[tokio::test]
async fn same_listener_twice_is_delivered_once() {
    let transport = ScriptedTransport::shared();
    let subs = scripted_context(&transport).subscriptions().clone();
    let listener = CountingListener::new();

    assert!(subs.on_event(CHANNEL, listener.listener.clone()));
    assert!(!subs.on_event(CHANNEL, listener.listener.clone()));
    subs.settle(CHANNEL).await;

    transport.fire(NATIVE, json!({}));
    assert_eq!(listener.hits(), 1);
}

#[tokio::test]
async fn removal_before_attach_lands_releases_the_subscription() {
    let transport = ScriptedTransport::shared();
    let subs = scripted_context(&transport).subscriptions().clone();
    let listener = CountingListener::new();

    transport.hold_listens();
    subs.on_event(CHANNEL, listener.listener.clone());
    assert!(subs.off_event(CHANNEL, &listener.listener));
    assert_eq!(subs.phase(CHANNEL), AttachPhase::Attaching);

    transport.release_listens();
    assert_eq!(subs.settle(CHANNEL).await, Some(AttachStatus::Released));

    assert_eq!(transport.unlisten_count(), 1);
    assert_eq!(transport.active_handlers(NATIVE), 0);
    assert_eq!(subs.phase(CHANNEL), AttachPhase::Detached);
    assert!(subs.channels().is_empty());
    assert_eq!(transport.fire(NATIVE, json!({})), 0);
    assert_eq!(listener.hits(), 0);
}

#[tokio::test]
async fn last_listener_leaving_detaches() {
    let transport = ScriptedTransport::shared();
    let subs = scripted_context(&transport).subscriptions().clone();
    let a = CountingListener::new();
    let b = CountingListener::new();

    subs.on_event_attached(CHANNEL, a.listener.clone()).await;
    subs.on_event_attached(CHANNEL, b.listener.clone()).await;

    subs.off_event(CHANNEL, &a.listener);
    assert_eq!(transport.unlisten_count(), 0);
    subs.off_event(CHANNEL, &b.listener);
    assert_eq!(transport.unlisten_count(), 1);
    assert_eq!(subs.phase(CHANNEL), AttachPhase::Detached);
}

#[tokio::test]
async fn panicking_listener_does_not_block_siblings() {
    let transport = ScriptedTransport::shared();
    let subs = scripted_context(&transport).subscriptions().clone();
    let ok = RecordingListener::new();

    subs.on_event_attached(CHANNEL, panicking_listener("listener bug")).await;
    subs.on_event_attached(CHANNEL, ok.listener.clone()).await;

    transport.fire(NATIVE, json!({"id": "o-9"}));
    assert_eq!(ok.payloads(), vec![json!({"id": "o-9"})]);

    let report = subs.emit(CHANNEL, &json!({"id": "o-10"}));
    assert_eq!(report, DeliveryReport { delivered: 1, failed: 1 });
    assert_eq!(ok.payloads().len(), 2);
}

#[tokio::test]
async fn failed_attach_is_retried_by_the_next_registration() {
    let transport = ScriptedTransport::shared();
    let subs = scripted_context(&transport).subscriptions().clone();
    let first = CountingListener::new();
    let second = CountingListener::new();

    transport.fail_listen(NATIVE);
    let status = subs.on_event_attached(CHANNEL, first.listener.clone()).await;
    assert_eq!(status, AttachStatus::Failed);
    assert_eq!(subs.phase(CHANNEL), AttachPhase::Detached);
    assert_eq!(transport.fire(NATIVE, json!({})), 0);

    transport.allow_listen(NATIVE);
    let status = subs.on_event_attached(CHANNEL, second.listener.clone()).await;
    assert_eq!(status, AttachStatus::Attached);
    assert_eq!(transport.listen_count(NATIVE), 2);

    transport.fire(NATIVE, json!({}));
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 1);
}

#[tokio::test]
async fn synthetic_emit_needs_no_native_attach() {
    let transport = ScriptedTransport::shared();
    transport.fail_listen("sync_status");
    let subs = scripted_context(&transport).subscriptions().clone();
    let listener = RecordingListener::new();

    subs.on_event("sync:status", listener.listener.clone());
    let report = subs.emit("sync:status", &json!({"state": "idle"}));
    assert_eq!(report.delivered, 1);
    assert_eq!(listener.payloads(), vec![json!({"state": "idle"})]);
}

#[tokio::test]
async fn reset_releases_live_and_in_flight_subscriptions() {
    let transport = ScriptedTransport::shared();
    let ctx = scripted_context(&transport);
    let subs = ctx.subscriptions();

    subs.on_event_attached(CHANNEL, CountingListener::new().listener).await;
    transport.hold_listens();
    subs.on_event("menu-updated", CountingListener::new().listener);
    spin_until(|| transport.listen_count("menu_updated") == 1).await;

    ctx.reset_events();
    assert!(subs.channels().is_empty());
    assert_eq!(transport.unlisten_count(), 1);

    transport.release_listens();
    spin_until(|| transport.unlisten_count() == 2).await;
    assert_eq!(transport.active_handlers("menu_updated"), 0);
    assert_eq!(transport.active_handlers(NATIVE), 0);
}

#[tokio::test]
async fn native_events_reach_the_legacy_channel_name() {
    let transport = ScriptedTransport::shared();
    let subs = scripted_context(&transport).subscriptions().clone();
    let listener = RecordingListener::new();

    subs.on_event_attached("session-expired", listener.listener.clone())
        .await;
    assert_eq!(transport.listen_count("auth_session_expired"), 1);

    transport.fire("auth_session_expired", json!({"reason": "idle"}));
    assert_eq!(listener.payloads(), vec![json!({"reason": "idle"})]);
}
