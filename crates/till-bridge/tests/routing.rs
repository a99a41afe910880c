//! Invoke routing against a scripted native host: registry fidelity,
//! fallback packing, and argument-shape equivalence.

use proptest::prelude::*;
use serde_json::{json, Value};
use till_bridge::{ChannelKind, ChannelRegistry, Route, TransportError};
use till_testkit::{scripted_context, ScriptedTransport};

#[tokio::test]
async fn every_registered_command_channel_reaches_its_native_command() {
    let transport = ScriptedTransport::shared();
    let ctx = scripted_context(&transport);
    let bridge = ctx.bridge();

    let mut expected = Vec::new();
    for descriptor in bridge.registry().iter().filter(|d| d.kind == ChannelKind::Command) {
        let spec = bridge
            .capabilities()
            .get(&descriptor.dispatch_target)
            .expect("registry target is callable");
        bridge.invoke(&descriptor.legacy_channel, vec![]).await.unwrap();
        expected.push(spec.command);
    }

    let sent: Vec<_> = transport.invocations().into_iter().map(|i| i.command).collect();
    assert_eq!(sent, expected);
}

fn carries(payload: &Value, needle: &Value) -> bool {
    payload == needle
        || match payload {
            Value::Object(map) => map.values().any(|v| carries(v, needle)),
            Value::Array(items) => items.iter().any(|v| carries(v, needle)),
            _ => false,
        }
}

#[tokio::test]
async fn every_registered_command_channel_forwards_all_supplied_arguments() {
    let transport = ScriptedTransport::shared();
    let bridge = scripted_context(&transport).bridge();
    let commands: Vec<_> = bridge
        .registry()
        .iter()
        .filter(|d| d.kind == ChannelKind::Command)
        .map(|d| d.legacy_channel.clone())
        .collect();

    for channel in &commands {
        let args: Vec<Value> = (0..4).map(|i| json!(format!("{channel}#{i}"))).collect();
        transport.clear_invocations();
        bridge.invoke(channel, args.clone()).await.unwrap();

        let mut sent = transport.invocations();
        assert_eq!(sent.len(), 1, "{channel}");
        let sent = sent.remove(0);
        let payload = sent.payload.unwrap_or(Value::Null);
        for arg in &args {
            assert!(carries(&payload, arg), "{channel}: {arg} missing from {payload}");
        }
    }
}

#[tokio::test]
async fn aliases_of_one_capability_send_identical_calls() {
    let transport = ScriptedTransport::shared();
    let bridge = scripted_context(&transport).bridge();

    for channel in ["approve-order", "order:approve"] {
        bridge
            .invoke(channel, vec![json!("o-7"), json!(20)])
            .await
            .unwrap();
    }

    let calls = transport.invocations();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[0].command, "order_approve");
    assert_eq!(
        calls[0].payload,
        Some(json!({"orderId": "o-7", "estimatedTime": 20}))
    );
}

#[tokio::test]
async fn native_results_and_errors_pass_through_unchanged() {
    let transport = ScriptedTransport::shared();
    transport.respond("settings_get", json!({"value": "19%"}));
    transport.fail_command("order_delete", "locked");
    let bridge = scripted_context(&transport).bridge();

    assert_eq!(
        bridge.invoke("get-settings", vec![json!("tax")]).await,
        Ok(json!({"value": "19%"}))
    );
    assert_eq!(
        bridge.invoke("order:delete", vec![json!("o-1")]).await,
        Err(TransportError::command("order_delete", "locked"))
    );
}

#[tokio::test]
async fn unmapped_channel_is_invoked_with_positional_keys() {
    let transport = ScriptedTransport::shared();
    let bridge = scripted_context(&transport).bridge();

    bridge
        .invoke("loyalty:redeem-points", vec![json!("c-1"), Value::Null, json!(50)])
        .await
        .unwrap();
    bridge.invoke("kds:ping", vec![]).await.unwrap();

    let calls = transport.invocations();
    assert_eq!(calls[0].command, "loyalty_redeem_points");
    assert_eq!(
        calls[0].payload,
        Some(json!({"arg0": "c-1", "arg1": null, "arg2": 50}))
    );
    assert_eq!(calls[1].command, "kds_ping");
    assert_eq!(calls[1].payload, None);
}

#[tokio::test]
async fn typed_namespaces_match_legacy_channels() {
    let transport = ScriptedTransport::shared();
    let bridge = scripted_context(&transport).bridge();

    bridge.settings().get("tax", None).await.unwrap();
    bridge.invoke("settings:get", vec![json!({"settingKey": "tax"})]).await.unwrap();
    bridge.orders().get_pending().await.unwrap();

    let calls = transport.invocations();
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[2].command, "order_get_pending");
    assert_eq!(calls[2].payload, None);
}

#[tokio::test]
async fn structured_call_with_unknown_path_falls_back() {
    let transport = ScriptedTransport::shared();
    let bridge = scripted_context(&transport).bridge();

    bridge.call("loyalty.get_tiers", vec![json!("gold")]).await.unwrap();
    let call = transport.last_invocation().unwrap();
    assert_eq!(call.command, "loyalty_get_tiers");
    assert_eq!(call.payload, Some(json!({"arg0": "gold"})));
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _-]{0,12}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn unmapped_channels_always_fall_back(
        channel in "[a-z]{1,8}([:/.-][a-z]{1,8}){0,3}",
        args in prop::collection::vec(scalar(), 0..6),
    ) {
        let registry = ChannelRegistry::builtin().unwrap();
        prop_assume!(registry.resolve(&channel).is_none());

        let transport = ScriptedTransport::shared();
        let bridge = scripted_context(&transport).bridge();
        let plan = bridge.plan(&channel, &args);

        prop_assert!(plan.is_fallback());
        prop_assert_eq!(&plan.command, &bridge.naming().derive(&channel));
        prop_assert!(!plan.command.contains(&[':', '/', '.', '-'][..]));

        match plan.payload {
            None => prop_assert!(args.is_empty()),
            Some(Value::Object(map)) => {
                prop_assert_eq!(map.len(), args.len());
                for (i, arg) in args.iter().enumerate() {
                    prop_assert_eq!(map.get(&format!("arg{i}")), Some(arg));
                }
            }
            Some(other) => prop_assert!(false, "unexpected payload {other}"),
        }
    }

    #[test]
    fn approve_order_shapes_are_equivalent(
        order_id in "[a-z0-9-]{1,10}",
        eta in proptest::option::of(0u32..240),
    ) {
        let transport = ScriptedTransport::shared();
        let bridge = scripted_context(&transport).bridge();

        let eta_value = eta.map_or(Value::Null, Value::from);
        let positional = bridge.plan("approve-order", &[json!(order_id), eta_value.clone()]);
        let canonical = bridge.plan("approve-order", &[json!({"orderId": order_id, "estimatedTime": eta_value})]);
        let aliased = bridge.plan("order:approve", &[json!({"id": order_id, "eta": eta_value})]);

        prop_assert_eq!(&positional.payload, &canonical.payload);
        prop_assert_eq!(&positional.payload, &aliased.payload);
        prop_assert_eq!(&positional.route, &Route::Capability { path: "orders.approve".into() });

        let mut expected = serde_json::Map::new();
        expected.insert("orderId".into(), json!(order_id));
        if let Some(eta) = eta {
            expected.insert("estimatedTime".into(), json!(eta));
        }
        prop_assert_eq!(positional.payload, Some(Value::Object(expected)));
    }

    #[test]
    fn object_field_beats_later_positional_slot(
        key in "[a-z]{1,8}",
        from_object in "[a-z]{1,8}",
        from_slot in "[a-z]{1,8}",
    ) {
        let transport = ScriptedTransport::shared();
        let bridge = scripted_context(&transport).bridge();

        let plan = bridge.plan(
            "settings:get",
            &[json!({"settingKey": key, "category": from_object}), json!(from_slot)],
        );
        prop_assert_eq!(plan.payload, Some(json!({"key": key, "category": from_object})));
    }

    #[test]
    fn canonical_key_beats_alias(canonical in "[a-z]{1,8}", alias in "[a-z]{1,8}") {
        let transport = ScriptedTransport::shared();
        let bridge = scripted_context(&transport).bridge();

        let plan = bridge.plan("get-settings", &[json!({"settingKey": alias, "key": canonical})]);
        prop_assert_eq!(plan.payload, Some(json!({"key": canonical})));
    }
}
