//! # Compatibility facade
//!
//! The legacy call surface (`invoke`, `on`, `off`, `removeListener`,
//! `removeAllListeners` and the named per-operation methods) rebuilt on top
//! of the router and the subscription table, plus the slot the legacy code
//! looks the host up in.
//!
//! Installation is idempotent. A real legacy host registered in the slot
//! always wins; the facade is only installed into an empty slot.

use crate::config::BridgeConfig;
use crate::context::{BridgeCell, BridgeContext};
use crate::error::TransportError;
use crate::events::{Listener, SubscriptionRegistry};
use crate::router::PlatformBridge;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Named legacy methods and the channel each one forwards to
const LEGACY_METHODS: &[(&str, &str)] = &[
    ("createOrder", "order:create"),
    ("getOrders", "order:get-all"),
    ("getOrder", "order:get-by-id"),
    ("updateOrderStatus", "order:update-status"),
    ("approveOrder", "order:approve"),
    ("declineOrder", "order:decline"),
    ("deleteOrder", "order:delete"),
    ("getPendingOrders", "order:get-pending"),
    ("openShift", "shift:open"),
    ("closeShift", "shift:close"),
    ("getActiveShift", "shift:get-active"),
    ("recordExpense", "shift:record-expense"),
    ("processPayment", "payment:process"),
    ("refundPayment", "payment:refund"),
    ("getPrinters", "printer:list"),
    ("testPrinter", "printer:test"),
    ("printReceipt", "printer:print-receipt"),
    ("printKitchenTicket", "printer:print-kitchen-ticket"),
    ("openCashDrawer", "printer:open-cash-drawer"),
    ("getMenuCategories", "menu:get-categories"),
    ("getMenuItems", "menu:get-items"),
    ("syncMenu", "menu:sync"),
    ("getSettings", "settings:get"),
    ("getAllSettings", "settings:get-all"),
    ("updateSettings", "settings:update"),
    ("getTerminalConfig", "settings:get-terminal-config"),
    ("login", "auth:login"),
    ("logout", "auth:logout"),
    ("getCurrentSession", "auth:get-session"),
    ("forceSync", "sync:force"),
    ("getSyncStatus", "sync:get-status"),
    ("getSystemInfo", "system:get-info"),
    ("getAppVersion", "app:get-version"),
    ("checkForUpdates", "update:check"),
    ("installUpdate", "update:install"),
    ("restartApp", "app:restart"),
    ("openExternal", "system:open-external"),
    ("searchCustomers", "customer:search"),
    ("createCustomer", "customer:create"),
    ("getDailySummary", "report:daily-summary"),
    ("generateZReport", "report:z-report"),
];

/// Channel a named legacy method forwards to
pub fn legacy_method_channel(method: &str) -> Option<&'static str> {
    LEGACY_METHODS
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, channel)| *channel)
}

/// Every named legacy method, in table order
pub fn legacy_methods() -> impl Iterator<Item = (&'static str, &'static str)> {
    LEGACY_METHODS.iter().copied()
}

// ─────────────────────────────────────────────────────────────────────────────
// Legacy API
// ─────────────────────────────────────────────────────────────────────────────

/// Call-and-event surface legacy code is written against
#[async_trait]
pub trait LegacyApi: Send + Sync {
    /// `invoke(channel, ...args)`
    async fn invoke(&self, channel: &str, args: Vec<Value>) -> Result<Value, TransportError>;

    /// `on(channel, cb)`
    fn on(&self, channel: &str, listener: Listener);

    /// `off(channel, cb)`
    fn off(&self, channel: &str, listener: &Listener);

    /// `removeListener(channel, cb)`; same as [`LegacyApi::off`]
    fn remove_listener(&self, channel: &str, listener: &Listener) {
        self.off(channel, listener);
    }

    /// `removeAllListeners(channel)`
    fn remove_all_listeners(&self, channel: &str);
}

/// [`LegacyApi`] backed by a [`BridgeContext`]
#[derive(Clone)]
pub struct CompatFacade {
    bridge: Arc<BridgeCell>,
    subscriptions: SubscriptionRegistry,
    noop_prefixes: Arc<[String]>,
}

impl fmt::Debug for CompatFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatFacade")
            .field("noop_prefixes", &self.noop_prefixes)
            .finish_non_exhaustive()
    }
}

impl CompatFacade {
    pub(crate) fn new(
        bridge: Arc<BridgeCell>,
        subscriptions: SubscriptionRegistry,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            bridge,
            subscriptions,
            noop_prefixes: config.noop_method_prefixes.clone().into(),
        }
    }

    /// Bridge currently in effect. Overrides on the context are seen here.
    pub fn bridge(&self) -> PlatformBridge {
        self.bridge.get()
    }

    /// Subscription table behind `on`/`off`
    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    /// Call a legacy method by name.
    ///
    /// Named methods forward to their channel. Unknown names that look like
    /// listener registration (`onSomething`, `removeListenerFor...`) do
    /// nothing and return `null`; every other unknown name is invoked as a
    /// channel of its own.
    pub async fn call_method(&self, name: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        if let Some(channel) = legacy_method_channel(name) {
            return self.bridge().invoke(channel, args).await;
        }
        if self.is_noop_method(name) {
            debug!(method = name, "unmapped listener-style method; no-op");
            return Ok(Value::Null);
        }
        debug!(method = name, "unmapped method; forwarding as channel");
        self.bridge().invoke(name, args).await
    }

    /// Whether an unmapped method name resolves to a no-op
    pub fn is_noop_method(&self, name: &str) -> bool {
        self.noop_prefixes.iter().any(|prefix| {
            name.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.chars().next().map_or(true, char::is_uppercase))
        })
    }

    /// `getOrders(status?)`
    pub async fn get_orders(&self, status: Option<&str>) -> Result<Value, TransportError> {
        self.invoke_with("order:get-all", status.map(|s| json!({ "status": s })))
            .await
    }

    /// `approveOrder(orderId, estimatedTime?)`
    pub async fn approve_order(
        &self,
        order_id: &str,
        estimated_minutes: Option<u32>,
    ) -> Result<Value, TransportError> {
        let mut args = vec![json!(order_id)];
        args.extend(estimated_minutes.map(|m| json!(m)));
        self.invoke("order:approve", args).await
    }

    /// `updateOrderStatus(orderId, status)`
    pub async fn update_order_status(&self, order_id: &str, status: &str) -> Result<Value, TransportError> {
        self.invoke("order:update-status", vec![json!(order_id), json!(status)])
            .await
    }

    /// `getSettings(key)`
    pub async fn get_setting(&self, key: &str) -> Result<Value, TransportError> {
        self.invoke("get-settings", vec![json!(key)]).await
    }

    /// `printReceipt(orderId)`
    pub async fn print_receipt(&self, order_id: &str) -> Result<Value, TransportError> {
        self.invoke("printer:print-receipt", vec![json!(order_id)]).await
    }

    /// `getAppVersion()`
    pub async fn get_app_version(&self) -> Result<Value, TransportError> {
        self.invoke("app:get-version", Vec::new()).await
    }

    /// `onOrderCreated(cb)`
    pub fn on_order_created(&self, listener: Listener) {
        self.on("order-created", listener);
    }

    /// `onOrderStatusUpdated(cb)`
    pub fn on_order_status_updated(&self, listener: Listener) {
        self.on("order-status-updated", listener);
    }

    /// `onSyncStatus(cb)`
    pub fn on_sync_status(&self, listener: Listener) {
        self.on("sync:status", listener);
    }

    /// `onSettingsUpdated(cb)`
    pub fn on_settings_updated(&self, listener: Listener) {
        self.on("settings-updated", listener);
    }

    async fn invoke_with(&self, channel: &str, arg: Option<Value>) -> Result<Value, TransportError> {
        self.invoke(channel, arg.into_iter().collect()).await
    }
}

#[async_trait]
impl LegacyApi for CompatFacade {
    async fn invoke(&self, channel: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        self.bridge().invoke(channel, args).await
    }

    fn on(&self, channel: &str, listener: Listener) {
        self.subscriptions.on_event(channel, listener);
    }

    fn off(&self, channel: &str, listener: &Listener) {
        self.subscriptions.off_event(channel, listener);
    }

    fn remove_all_listeners(&self, channel: &str) {
        self.subscriptions.remove_all_listeners(channel);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Host slot
// ─────────────────────────────────────────────────────────────────────────────

/// Who put the host in the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostOrigin {
    /// The real legacy host
    Native,
    /// The compatibility facade
    Shim,
}

/// Result of [`HostSlot::install_compat_host`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    /// The slot was empty; the facade is now installed
    Installed,
    /// The facade was already installed; nothing changed
    AlreadyInstalled,
    /// A real host is present; the facade was not installed
    DeferredToNative,
}

#[derive(Clone)]
struct InstalledHost {
    api: Arc<dyn LegacyApi>,
    origin: HostOrigin,
}

/// The place legacy code finds its host.
///
/// Cheap to clone; clones share the slot.
#[derive(Clone, Default)]
pub struct HostSlot {
    inner: Arc<RwLock<Option<InstalledHost>>>,
}

impl fmt::Debug for HostSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSlot")
            .field("origin", &self.origin())
            .finish()
    }
}

impl HostSlot {
    /// Empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the real legacy host. Replaces an installed facade.
    pub fn register_native(&self, api: Arc<dyn LegacyApi>) {
        let mut slot = self.inner.write();
        if matches!(slot.as_ref().map(|h| h.origin), Some(HostOrigin::Shim)) {
            info!("native legacy host registered; replacing compatibility facade");
        }
        *slot = Some(InstalledHost {
            api,
            origin: HostOrigin::Native,
        });
    }

    /// Install `ctx`'s facade if the slot is empty
    pub fn install_compat_host(&self, ctx: &BridgeContext) -> InstallOutcome {
        let mut slot = self.inner.write();
        let outcome = match slot.as_ref().map(|h| h.origin) {
            Some(HostOrigin::Native) => InstallOutcome::DeferredToNative,
            Some(HostOrigin::Shim) => InstallOutcome::AlreadyInstalled,
            None => {
                *slot = Some(InstalledHost {
                    api: Arc::new(ctx.facade()),
                    origin: HostOrigin::Shim,
                });
                InstallOutcome::Installed
            }
        };
        debug!(?outcome, "compat host install");
        outcome
    }

    /// Host legacy code should talk to
    pub fn current(&self) -> Option<Arc<dyn LegacyApi>> {
        self.inner.read().as_ref().map(|h| h.api.clone())
    }

    /// Origin of the installed host
    pub fn origin(&self) -> Option<HostOrigin> {
        self.inner.read().as_ref().map(|h| h.origin)
    }

    /// Remove the facade if it is what is installed. A real host stays.
    pub fn uninstall_shim(&self) -> bool {
        let mut slot = self.inner.write();
        if matches!(slot.as_ref().map(|h| h.origin), Some(HostOrigin::Shim)) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Empty the slot entirely
    pub fn clear(&self) {
        *self.inner.write() = None;
    }
}
