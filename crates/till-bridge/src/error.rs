//! Bridge errors
//!
//! Transport failures are surfaced to `invoke` callers exactly as the native
//! layer produced them. The remaining error types only arise while building
//! the static tables or loading configuration.

use thiserror::Error;

/// Failure reported by the native transport.
///
/// The router never wraps or translates these: whatever the command
/// transport returns is what the legacy caller sees.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// A native command ran and rejected
    #[error("command '{command}' failed: {message}")]
    Command {
        /// Native command name
        command: String,
        /// Message reported by the native side
        message: String,
    },

    /// A native event subscription could not be opened
    #[error("listen on '{event}' failed: {message}")]
    Listen {
        /// Native event name
        event: String,
        /// Message reported by the native side
        message: String,
    },

    /// No native host backs this process
    #[error("native transport unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Create a command failure
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a listen failure
    pub fn listen(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Listen {
            event: event.into(),
            message: message.into(),
        }
    }
}

/// Defects detected while building the channel registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two entries map the same legacy channel to different targets
    #[error("legacy channel '{channel}' maps to both '{existing}' and '{conflicting}'")]
    ConflictingTarget {
        /// The duplicated legacy channel
        channel: String,
        /// Target recorded first
        existing: String,
        /// Target of the later entry
        conflicting: String,
    },

    /// An entry has an empty channel or target
    #[error("registry entry has an empty {0}")]
    EmptyField(&'static str),
}

/// Defects detected while building the capability tree
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// Two operations share a dot path
    #[error("capability path '{0}' is defined twice")]
    DuplicatePath(String),

    /// A path is not of the form `namespace.operation`
    #[error("capability path '{0}' must be 'namespace.operation'")]
    MalformedPath(String),
}

/// Configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid TOML for `BridgeConfig`
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the bridge cannot work with
    #[error("invalid config field '{field}': {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Errors raised while assembling a [`crate::BridgeContext`]
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Channel table defect
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Capability table defect
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_render_their_origin() {
        let err = TransportError::command("order_approve", "order not found");
        assert_eq!(
            err.to_string(),
            "command 'order_approve' failed: order not found"
        );

        let err = TransportError::listen("order_created", "window closed");
        assert!(err.to_string().contains("order_created"));
    }

    #[test]
    fn bridge_error_is_transparent_over_registry_error() {
        let err: BridgeError = RegistryError::EmptyField("target").into();
        assert_eq!(err.to_string(), "registry entry has an empty target");
    }
}
