//! # Bridge context
//!
//! Owns everything the bridge needs for one process: configuration, the
//! channel table, the capability tree, the lazily-built [`PlatformBridge`],
//! the [`SubscriptionRegistry`] and the legacy [`HostSlot`]. Nothing here is
//! global; callers hold a context and pass it (or clones of it) around.
//!
//! The host platform is probed at most once, the first time either the
//! bridge or an event attach needs a transport.

use crate::capability::CapabilityTree;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, TransportError};
use crate::events::SubscriptionRegistry;
use crate::facade::{CompatFacade, HostSlot, InstallOutcome};
use crate::platform::{
    EnvProbe, HostPlatform, MemoizedProbe, OfflineFactory, PlatformProbe, TransportFactory,
};
use crate::registry::ChannelRegistry;
use crate::router::PlatformBridge;
use crate::transport::{EventHandler, EventTransport, TransportPair, Unlisten};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Transport selection
// ─────────────────────────────────────────────────────────────────────────────

/// Probe-then-connect, done once on first use
struct TransportSlot {
    probe: Arc<dyn PlatformProbe>,
    factory: Arc<dyn TransportFactory>,
    connected: OnceCell<(HostPlatform, TransportPair)>,
}

impl TransportSlot {
    fn connection(&self) -> &(HostPlatform, TransportPair) {
        self.connected.get_or_init(|| {
            let platform = self.probe.classify();
            tracing::info!(%platform, "connecting bridge transport");
            (platform, self.factory.connect(platform))
        })
    }

    fn pair(&self) -> &TransportPair {
        &self.connection().1
    }
}

#[async_trait]
impl EventTransport for TransportSlot {
    async fn listen(&self, event: &str, handler: EventHandler) -> Result<Unlisten, TransportError> {
        let events = self.pair().events.clone();
        events.listen(event, handler).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bridge cell
// ─────────────────────────────────────────────────────────────────────────────

/// Lazily-built, replaceable bridge instance shared by the context and
/// every facade it hands out
pub(crate) struct BridgeCell {
    transports: Arc<TransportSlot>,
    registry: Arc<ChannelRegistry>,
    capabilities: Arc<CapabilityTree>,
    config: BridgeConfig,
    current: RwLock<Option<PlatformBridge>>,
}

impl BridgeCell {
    pub(crate) fn get(&self) -> PlatformBridge {
        if let Some(bridge) = self.current.read().as_ref() {
            return bridge.clone();
        }
        self.current
            .write()
            .get_or_insert_with(|| self.build())
            .clone()
    }

    fn build(&self) -> PlatformBridge {
        PlatformBridge::new(
            self.transports.pair().commands.clone(),
            self.registry.clone(),
            self.capabilities.clone(),
            &self.config,
        )
    }

    fn replace(&self, bridge: Option<PlatformBridge>) {
        *self.current.write() = bridge;
    }

    fn is_built(&self) -> bool {
        self.current.read().is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// Dependency-injected home of the bridge and its subscription table.
///
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct BridgeContext {
    config: Arc<BridgeConfig>,
    bridge: Arc<BridgeCell>,
    subscriptions: SubscriptionRegistry,
    host: HostSlot,
}

impl fmt::Debug for BridgeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeContext")
            .field("platform", &self.bridge.transports.connected.get().map(|c| c.0))
            .field("bridge_built", &self.bridge.is_built())
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}

impl BridgeContext {
    /// Start building a context
    pub fn builder() -> BridgeContextBuilder {
        BridgeContextBuilder::default()
    }

    /// Context with built-in tables, default config, the environment probe
    /// and offline transports
    pub fn with_defaults() -> Result<Self, BridgeError> {
        Self::builder().build()
    }

    /// Configuration in effect
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The bridge, built on first access
    pub fn bridge(&self) -> PlatformBridge {
        self.bridge.get()
    }

    /// Replace the bridge (tests). Subscriptions are untouched.
    pub fn override_bridge(&self, bridge: PlatformBridge) {
        tracing::debug!("bridge overridden");
        self.bridge.replace(Some(bridge));
    }

    /// Drop the current bridge; the next access builds a fresh one
    pub fn reset_bridge(&self) {
        self.bridge.replace(None);
    }

    /// Event subscription table
    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    /// Clear every subscription and release native handles
    pub fn reset_events(&self) {
        self.subscriptions.reset();
    }

    /// Legacy host slot this context installs into
    pub fn host(&self) -> &HostSlot {
        &self.host
    }

    /// Host platform, probing it if nothing has yet
    pub fn platform(&self) -> HostPlatform {
        self.bridge.transports.connection().0
    }

    /// Legacy-shaped facade over this context
    pub fn facade(&self) -> CompatFacade {
        CompatFacade::new(
            self.bridge.clone(),
            self.subscriptions.clone(),
            &self.config,
        )
    }

    /// Install the facade as the legacy host unless one is already present
    pub fn install_compat_host(&self) -> InstallOutcome {
        self.host.install_compat_host(self)
    }

    /// Reset bridge, subscriptions and the host slot. A registered native
    /// host is cleared along with the shim.
    pub fn reset_for_tests(&self) {
        self.reset_bridge();
        self.reset_events();
        self.host.clear();
    }
}

/// Builder for [`BridgeContext`]
#[derive(Default)]
pub struct BridgeContextBuilder {
    config: Option<BridgeConfig>,
    registry: Option<ChannelRegistry>,
    capabilities: Option<CapabilityTree>,
    probe: Option<Arc<dyn PlatformProbe>>,
    factory: Option<Arc<dyn TransportFactory>>,
    host: Option<HostSlot>,
}

impl BridgeContextBuilder {
    /// Use this configuration (validated on build)
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this channel table instead of the built-in one
    pub fn registry(mut self, registry: ChannelRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use this capability tree instead of the built-in one
    pub fn capabilities(mut self, capabilities: CapabilityTree) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Platform probe; memoized by the context
    pub fn probe(mut self, probe: impl PlatformProbe + 'static) -> Self {
        self.probe = Some(Arc::new(MemoizedProbe::new(probe)));
        self
    }

    /// Transport factory
    pub fn factory(mut self, factory: impl TransportFactory + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Skip probing and back the bridge with `pair`
    pub fn transport(self, pair: TransportPair) -> Self {
        self.probe(crate::platform::StaticProbe(HostPlatform::Native))
            .factory(move |_: HostPlatform| pair.clone())
    }

    /// Share an existing host slot
    pub fn host(mut self, host: HostSlot) -> Self {
        self.host = Some(host);
        self
    }

    /// Validate and assemble
    pub fn build(self) -> Result<BridgeContext, BridgeError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let registry = Arc::new(match self.registry {
            Some(registry) => registry,
            None => ChannelRegistry::builtin()?,
        });
        let capabilities = Arc::new(match self.capabilities {
            Some(capabilities) => capabilities,
            None => CapabilityTree::builtin()?,
        });

        let transports = Arc::new(TransportSlot {
            probe: self
                .probe
                .unwrap_or_else(|| Arc::new(MemoizedProbe::new(EnvProbe))),
            factory: self.factory.unwrap_or_else(|| Arc::new(OfflineFactory)),
            connected: OnceCell::new(),
        });

        let subscriptions =
            SubscriptionRegistry::new(transports.clone(), registry.clone(), &config);

        Ok(BridgeContext {
            bridge: Arc::new(BridgeCell {
                transports,
                registry,
                capabilities,
                config: config.clone(),
                current: RwLock::new(None),
            }),
            config: Arc::new(config),
            subscriptions,
            host: self.host.unwrap_or_default(),
        })
    }
}
