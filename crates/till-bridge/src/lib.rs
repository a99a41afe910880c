//! # Till Bridge
//!
//! Runs legacy point-of-sale UI code, written against a positional
//! `invoke(channel, ...args)` / `on(channel, cb)` protocol, on a host whose
//! native transport takes keyed command payloads and one-shot event
//! subscriptions.
//!
//! ## Layers
//!
//! - [`registry`]: legacy channel name to capability path or native event
//! - [`normalize`]: per-operation reconciliation of legacy argument shapes
//! - [`capability`]: typed `namespace.operation` tree over the native commands
//! - [`router`]: [`PlatformBridge`], the invoke router with positional fallback
//! - [`events`]: [`SubscriptionRegistry`], lazy attach and detach per channel
//! - [`facade`]: the legacy call surface and its idempotent installation
//! - [`context`]: [`BridgeContext`], which owns all of the above
//!
//! ```no_run
//! use serde_json::json;
//! use till_bridge::BridgeContext;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = BridgeContext::with_defaults()?;
//! let bridge = ctx.bridge();
//! bridge.invoke("approve-order", vec![json!("o-1"), json!(15)]).await?;
//! bridge.orders().approve("o-1", Some(15)).await?;
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod facade;
pub mod naming;
pub mod normalize;
pub mod platform;
pub mod registry;
pub mod router;
pub mod transport;

pub use capability::{CapabilityTree, OperationSpec};
pub use config::BridgeConfig;
pub use context::{BridgeContext, BridgeContextBuilder};
pub use error::{BridgeError, CapabilityError, ConfigError, RegistryError, TransportError};
pub use events::{AttachPhase, AttachStatus, DeliveryReport, Listener, SubscriptionRegistry};
pub use facade::{CompatFacade, HostOrigin, HostSlot, InstallOutcome, LegacyApi};
pub use naming::CommandNaming;
pub use normalize::{normalize, ArgShape, CallShape, FieldSpec};
pub use platform::{HostPlatform, PlatformProbe, TransportFactory};
pub use registry::{ChannelDescriptor, ChannelKind, ChannelRegistry};
pub use router::{FallbackReason, PlatformBridge, Route, RoutePlan};
pub use transport::{CommandTransport, EventHandler, EventTransport, TransportPair, Unlisten};
