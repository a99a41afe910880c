//! # Invoke router
//!
//! Resolves a legacy `invoke(channel, ...args)` to a native command call.
//!
//! ```text
//! legacy channel ──► ChannelRegistry ──► CapabilityTree ──► normalize ──► invoke(command, payload)
//!                          │ miss               │ not callable
//!                          └────────────────────┴──► fallback: invoke(derived, {arg0, arg1, ...})
//! ```
//!
//! Routing is split into [`PlatformBridge::plan`], which is pure, and
//! [`PlatformBridge::invoke`], which executes the plan. Results and errors
//! from the transport are returned unchanged; nothing is cached or retried.

use crate::capability::{CapabilityTree, OperationSpec};
use crate::config::BridgeConfig;
use crate::error::TransportError;
use crate::naming::CommandNaming;
use crate::normalize;
use crate::registry::{ChannelKind, ChannelRegistry};
use crate::transport::CommandTransport;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Why a call took the fallback path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The channel is not in the registry
    Unmapped,
    /// The registry names a target that is not a callable capability
    NotCallable {
        /// Target recorded in the registry
        target: String,
    },
}

/// Dispatch decision for one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// Dispatched through a capability-tree operation
    Capability {
        /// Capability path
        path: String,
    },
    /// Raw pass-through with positional keys
    Fallback(FallbackReason),
}

/// Fully resolved call: where it goes and what it carries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Legacy channel (or capability path) the caller used
    pub channel: String,
    /// Dispatch decision
    pub route: Route,
    /// Native command that will be invoked
    pub command: String,
    /// Payload handed to the transport; `None` sends no payload at all
    pub payload: Option<Value>,
}

impl RoutePlan {
    /// Whether the call went through the fallback path
    pub fn is_fallback(&self) -> bool {
        matches!(self.route, Route::Fallback(_))
    }
}

/// Routes legacy channel calls and structured capability calls onto the
/// native command transport
#[derive(Clone)]
pub struct PlatformBridge {
    commands: Arc<dyn CommandTransport>,
    registry: Arc<ChannelRegistry>,
    capabilities: Arc<CapabilityTree>,
    naming: CommandNaming,
    arg_prefix: String,
}

impl std::fmt::Debug for PlatformBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformBridge")
            .field("channels", &self.registry.len())
            .field("operations", &self.capabilities.len())
            .field("naming", &self.naming)
            .finish_non_exhaustive()
    }
}

impl PlatformBridge {
    /// Create a bridge over a command transport
    pub fn new(
        commands: Arc<dyn CommandTransport>,
        registry: Arc<ChannelRegistry>,
        capabilities: Arc<CapabilityTree>,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            commands,
            registry,
            capabilities,
            naming: CommandNaming::new(config.command_separator),
            arg_prefix: config.fallback_arg_prefix.clone(),
        }
    }

    /// Channel registry consulted by [`Self::invoke`]
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Capability tree consulted by [`Self::invoke`] and [`Self::call`]
    pub fn capabilities(&self) -> &CapabilityTree {
        &self.capabilities
    }

    /// Command naming in effect
    pub fn naming(&self) -> CommandNaming {
        self.naming
    }

    /// Resolve a legacy channel call without executing it
    pub fn plan(&self, channel: &str, args: &[Value]) -> RoutePlan {
        let reason = match self.registry.resolve(channel) {
            Some(descriptor) => match self.callable(&descriptor.dispatch_target, descriptor.kind) {
                Some(spec) => return self.capability_plan(channel, spec, args),
                None => {
                    warn!(
                        channel,
                        target = %descriptor.dispatch_target,
                        "registry target is not callable; using fallback"
                    );
                    FallbackReason::NotCallable {
                        target: descriptor.dispatch_target.clone(),
                    }
                }
            },
            None => FallbackReason::Unmapped,
        };
        self.fallback_plan(channel, reason, args)
    }

    /// Resolve a structured `namespace.operation` call without executing it
    pub fn plan_call(&self, path: &str, args: &[Value]) -> RoutePlan {
        match self.capabilities.get(path) {
            Some(spec) => self.capability_plan(path, spec, args),
            None => self.fallback_plan(path, FallbackReason::Unmapped, args),
        }
    }

    /// Legacy `invoke(channel, ...args)`
    pub async fn invoke(&self, channel: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        let plan = self.plan(channel, &args);
        self.execute(plan).await
    }

    /// Structured capability call by path. Unknown paths fall back to a raw
    /// invoke of the derived command name.
    pub async fn call(&self, path: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        let plan = self.plan_call(path, &args);
        self.execute(plan).await
    }

    /// Call one operation directly, bypassing every name lookup
    pub async fn dispatch(&self, spec: &OperationSpec, args: &[Value]) -> Result<Value, TransportError> {
        spec.call(self.commands.as_ref(), args, &self.arg_prefix).await
    }

    /// Raw pass-through: positional arguments packed as `arg0, arg1, ...`
    pub async fn raw_invoke(&self, name: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        let plan = self.fallback_plan(name, FallbackReason::Unmapped, &args);
        self.execute(plan).await
    }

    /// Run a plan against the transport
    pub async fn execute(&self, plan: RoutePlan) -> Result<Value, TransportError> {
        debug!(
            channel = %plan.channel,
            command = %plan.command,
            fallback = plan.is_fallback(),
            has_payload = plan.payload.is_some(),
            "routing legacy call"
        );
        self.commands.invoke(&plan.command, plan.payload).await
    }

    /// Pack positional arguments under positional keys, preserving order and
    /// count. No arguments means no payload, not an empty object.
    pub fn pack_positional(&self, args: &[Value]) -> Option<Value> {
        normalize::pack_positional(args, &self.arg_prefix)
    }

    fn callable(&self, target: &str, kind: ChannelKind) -> Option<&OperationSpec> {
        match kind {
            ChannelKind::Command => self.capabilities.get(target),
            ChannelKind::Event => None,
        }
    }

    fn capability_plan(&self, channel: &str, spec: &OperationSpec, args: &[Value]) -> RoutePlan {
        RoutePlan {
            channel: channel.to_string(),
            route: Route::Capability {
                path: spec.path.to_string(),
            },
            command: spec.command.to_string(),
            payload: spec.normalize_with(args, &self.arg_prefix),
        }
    }

    fn fallback_plan(&self, channel: &str, reason: FallbackReason, args: &[Value]) -> RoutePlan {
        RoutePlan {
            channel: channel.to_string(),
            route: Route::Fallback(reason),
            command: self.naming.derive(channel),
            payload: self.pack_positional(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::OfflineTransport;
    use serde_json::json;

    fn bridge_with(registry: ChannelRegistry) -> PlatformBridge {
        PlatformBridge::new(
            Arc::new(OfflineTransport::new("test")),
            Arc::new(registry),
            Arc::new(CapabilityTree::builtin().unwrap()),
            &BridgeConfig::default(),
        )
    }

    fn bridge() -> PlatformBridge {
        bridge_with(ChannelRegistry::builtin().unwrap())
    }

    #[test]
    fn mapped_channel_plans_a_capability_call() {
        let plan = bridge().plan("order:approve", &[json!("o-1"), json!(15)]);
        assert_eq!(
            plan.route,
            Route::Capability {
                path: "orders.approve".into()
            }
        );
        assert_eq!(plan.command, "order_approve");
        assert_eq!(plan.payload, Some(json!({"orderId": "o-1", "estimatedTime": 15})));
    }

    #[test]
    fn mapped_channels_keep_every_supplied_argument() {
        let bridge = bridge();
        assert_eq!(
            bridge.plan("sync:force", &[json!({"full": true})]).payload,
            Some(json!({"arg0": {"full": true}}))
        );
        assert_eq!(
            bridge.plan("order:create", &[json!({"items": []}), json!({"print": true})]).payload,
            Some(json!({"orderData": {"items": []}, "arg1": {"print": true}}))
        );
        assert_eq!(
            bridge.plan("approve-order", &[json!("o-1"), json!(15), json!("extra")]).payload,
            Some(json!({"orderId": "o-1", "estimatedTime": 15, "arg2": "extra"}))
        );
    }

    #[test]
    fn unmapped_channel_packs_positional_args() {
        let plan = bridge().plan("loyalty:redeem-points", &[json!("c-9"), json!(120), json!(true)]);
        assert_eq!(plan.route, Route::Fallback(FallbackReason::Unmapped));
        assert_eq!(plan.command, "loyalty_redeem_points");
        assert_eq!(
            plan.payload,
            Some(json!({"arg0": "c-9", "arg1": 120, "arg2": true}))
        );
    }

    #[test]
    fn unmapped_channel_without_args_has_no_payload() {
        let plan = bridge().plan("loyalty:get-tiers", &[]);
        assert_eq!(plan.payload, None);
    }

    #[test]
    fn fallback_keeps_nulls_in_their_slots() {
        let plan = bridge().plan("x:y", &[Value::Null, json!(2)]);
        assert_eq!(plan.payload, Some(json!({"arg0": null, "arg1": 2})));
    }

    #[test]
    fn typo_in_registry_target_falls_through() {
        let registry = ChannelRegistry::from_entries([crate::registry::ChannelDescriptor::command(
            "order:approve",
            "orders.aprove",
        )])
        .unwrap();
        let plan = bridge_with(registry).plan("order:approve", &[json!("o-1")]);
        assert_eq!(
            plan.route,
            Route::Fallback(FallbackReason::NotCallable {
                target: "orders.aprove".into()
            })
        );
        assert_eq!(plan.command, "order_approve");
        assert_eq!(plan.payload, Some(json!({"arg0": "o-1"})));
    }

    #[test]
    fn event_channels_invoked_as_commands_fall_through() {
        let plan = bridge().plan("order-created", &[]);
        assert!(plan.is_fallback());
        assert_eq!(plan.command, "order_created");
    }

    #[test]
    fn structured_call_bypasses_registry() {
        let bridge = bridge();
        let plan = bridge.plan_call("settings.get", &[json!({"settingKey": "tax"})]);
        assert_eq!(plan.command, "settings_get");
        assert_eq!(plan.payload, Some(json!({"key": "tax"})));

        let plan = bridge.plan_call("loyalty.redeem", &[json!(1)]);
        assert_eq!(plan.command, "loyalty_redeem");
        assert!(plan.is_fallback());
    }

    #[test]
    fn custom_prefix_is_used_for_packing() {
        let config = BridgeConfig {
            fallback_arg_prefix: "p".into(),
            ..Default::default()
        };
        let bridge = PlatformBridge::new(
            Arc::new(OfflineTransport::new("test")),
            Arc::new(ChannelRegistry::default()),
            Arc::new(CapabilityTree::builtin().unwrap()),
            &config,
        );
        assert_eq!(
            bridge.pack_positional(&[json!(1), json!(2)]),
            Some(json!({"p0": 1, "p1": 2}))
        );
        assert_eq!(
            bridge.plan_call("orders.delete", &[json!("o-1"), json!("soft")]).payload,
            Some(json!({"orderId": "o-1", "p1": "soft"}))
        );
    }

    #[tokio::test]
    async fn transport_errors_are_returned_unchanged() {
        let err = bridge().invoke("order:get-all", vec![]).await.unwrap_err();
        assert_eq!(err, TransportError::Unavailable("test".into()));
    }
}
