//! Host platform detection
//!
//! The bridge is backed by whichever transport the host offers. Which host
//! that is gets decided once, synchronously, by a [`PlatformProbe`]; a
//! [`TransportFactory`] then turns the answer into a [`TransportPair`].

use crate::transport::TransportPair;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable read by [`EnvProbe`]
pub const PLATFORM_ENV_VAR: &str = "TILL_HOST_PLATFORM";

/// Kind of host the bridge runs inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostPlatform {
    /// Desktop shell with a native command and event transport
    Native,
    /// Plain browser; no native transport
    Browser,
    /// No UI host at all (tests, tools)
    Headless,
}

impl HostPlatform {
    /// Whether a native transport can exist on this host
    pub fn has_native_transport(self) -> bool {
        matches!(self, Self::Native)
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Browser => "browser",
            Self::Headless => "headless",
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "browser" => Ok(Self::Browser),
            "headless" => Ok(Self::Headless),
            other => Err(format!("unknown host platform '{other}'")),
        }
    }
}

/// Synchronous classification of the current host
pub trait PlatformProbe: Send + Sync {
    /// Classify the host
    fn classify(&self) -> HostPlatform;
}

/// Probe that always answers the same
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub HostPlatform);

impl PlatformProbe for StaticProbe {
    fn classify(&self) -> HostPlatform {
        self.0
    }
}

/// Reads [`PLATFORM_ENV_VAR`]; unset or unrecognised means headless
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProbe;

impl PlatformProbe for EnvProbe {
    fn classify(&self) -> HostPlatform {
        match std::env::var(PLATFORM_ENV_VAR) {
            Ok(value) => value.parse().unwrap_or_else(|err: String| {
                tracing::warn!(error = %err, "ignoring {PLATFORM_ENV_VAR}");
                HostPlatform::Headless
            }),
            Err(_) => HostPlatform::Headless,
        }
    }
}

/// Asks the wrapped probe once and answers from cache afterwards
pub struct MemoizedProbe<P> {
    probe: P,
    cached: OnceCell<HostPlatform>,
}

impl<P: PlatformProbe> MemoizedProbe<P> {
    /// Wrap a probe
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            cached: OnceCell::new(),
        }
    }

    /// Cached answer, if the probe has run
    pub fn cached(&self) -> Option<HostPlatform> {
        self.cached.get().copied()
    }
}

impl<P: PlatformProbe> PlatformProbe for MemoizedProbe<P> {
    fn classify(&self) -> HostPlatform {
        *self.cached.get_or_init(|| {
            let platform = self.probe.classify();
            tracing::debug!(%platform, "host platform detected");
            platform
        })
    }
}

impl<P> fmt::Debug for MemoizedProbe<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedProbe")
            .field("cached", &self.cached.get())
            .finish_non_exhaustive()
    }
}

/// Builds the transport for a probed host
pub trait TransportFactory: Send + Sync {
    /// Connect to the host's transport
    fn connect(&self, platform: HostPlatform) -> TransportPair;
}

impl<F> TransportFactory for F
where
    F: Fn(HostPlatform) -> TransportPair + Send + Sync,
{
    fn connect(&self, platform: HostPlatform) -> TransportPair {
        self(platform)
    }
}

/// Factory used when none is supplied: nothing is wired to a real host, so
/// every platform gets an offline transport naming it
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFactory;

impl TransportFactory for OfflineFactory {
    fn connect(&self, platform: HostPlatform) -> TransportPair {
        if platform.has_native_transport() {
            tracing::warn!(%platform, "host has a native transport but none is wired; running offline");
        }
        TransportPair::offline(format!("no native transport wired for {platform} host"))
    }
}
