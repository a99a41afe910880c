//! Bridge configuration
//!
//! All fields have working defaults; a config file only needs to name the
//! values it changes.

use crate::error::ConfigError;
use crate::naming::REPLACED_SEPARATORS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for routing and event delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Separator substituted for `:`, `-`, `/`, `.` and whitespace when a
    /// legacy channel is turned into a native command name
    pub command_separator: char,

    /// Key prefix for positional arguments on the fallback path (`arg0`, `arg1`, ...)
    pub fallback_arg_prefix: String,

    /// Unmapped facade method names made of one of these prefixes followed
    /// by nothing or an uppercase letter (`onPrinterJam`) resolve to a no-op
    /// instead of a raw invoke
    pub noop_method_prefixes: Vec<String>,

    /// Log each listener panic caught during delivery
    pub report_listener_failures: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            command_separator: '_',
            fallback_arg_prefix: "arg".to_string(),
            noop_method_prefixes: vec!["on".to_string(), "removeListener".to_string()],
            report_listener_failures: true,
        }
    }
}

impl BridgeConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            field: "config",
            reason: e.to_string(),
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sep = self.command_separator;
        if REPLACED_SEPARATORS.contains(&sep) || sep.is_whitespace() {
            return Err(ConfigError::Invalid {
                field: "command_separator",
                reason: format!("'{sep}' is itself rewritten during command derivation"),
            });
        }

        if self.fallback_arg_prefix.is_empty() {
            return Err(ConfigError::Invalid {
                field: "fallback_arg_prefix",
                reason: "must not be empty".to_string(),
            });
        }

        if self.noop_method_prefixes.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid {
                field: "noop_method_prefixes",
                reason: "an empty prefix would swallow every unmapped method".to_string(),
            });
        }

        Ok(())
    }
}
