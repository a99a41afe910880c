//! Shared helpers for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use till_bridge::platform::StaticProbe;
use till_bridge::{BridgeConfig, BridgeContext, HostPlatform};

/// Load the config file, or defaults when it does not exist
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found; using defaults");
        return Ok(BridgeConfig::default());
    }
    BridgeConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

/// Context for inspection only: headless, so nothing can reach a real host
pub fn context(config_path: &Path) -> Result<BridgeContext> {
    let config = load_config(config_path)?;
    BridgeContext::builder()
        .config(config)
        .probe(StaticProbe(HostPlatform::Headless))
        .build()
        .context("building bridge context")
}

/// Print `value` as pretty JSON on stdout
pub fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
