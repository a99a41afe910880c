//! Channel registry
//!
//! Static, many-to-one table from legacy channel names to dispatch targets.
//! Command channels point at a capability path (`orders.approve`); event
//! channels point at the native event name. Built once, never mutated.

mod table;

use crate::error::RegistryError;
use indexmap::IndexMap;
use serde::Serialize;

/// What a legacy channel is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Request/response call; target is a capability path
    Command,
    /// Push-event stream; target is the native event name
    Event,
}

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelDescriptor {
    /// Name used by legacy call sites
    pub legacy_channel: String,
    /// Capability path or native event name
    pub dispatch_target: String,
    /// Command or event channel
    pub kind: ChannelKind,
}

impl ChannelDescriptor {
    /// Command channel routed to a capability path
    pub fn command(legacy_channel: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            legacy_channel: legacy_channel.into(),
            dispatch_target: target.into(),
            kind: ChannelKind::Command,
        }
    }

    /// Event channel backed by a native event
    pub fn event(legacy_channel: impl Into<String>, native_event: impl Into<String>) -> Self {
        Self {
            legacy_channel: legacy_channel.into(),
            dispatch_target: native_event.into(),
            kind: ChannelKind::Event,
        }
    }
}

/// Immutable legacy channel lookup table
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    entries: IndexMap<String, ChannelDescriptor>,
}

impl ChannelRegistry {
    /// Build from descriptors.
    ///
    /// A channel listed twice with the same target and kind is collapsed. A
    /// channel listed twice with different targets is a routing defect and
    /// fails the build instead of silently overwriting.
    pub fn from_entries(
        descriptors: impl IntoIterator<Item = ChannelDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut entries: IndexMap<String, ChannelDescriptor> = IndexMap::new();
        for descriptor in descriptors {
            if descriptor.legacy_channel.is_empty() {
                return Err(RegistryError::EmptyField("channel"));
            }
            if descriptor.dispatch_target.is_empty() {
                return Err(RegistryError::EmptyField("target"));
            }
            if let Some(existing) = entries.get(&descriptor.legacy_channel) {
                if existing.dispatch_target != descriptor.dispatch_target
                    || existing.kind != descriptor.kind
                {
                    return Err(RegistryError::ConflictingTarget {
                        channel: descriptor.legacy_channel,
                        existing: existing.dispatch_target.clone(),
                        conflicting: descriptor.dispatch_target,
                    });
                }
                continue;
            }
            entries.insert(descriptor.legacy_channel.clone(), descriptor);
        }
        Ok(Self { entries })
    }

    /// Registry over the built-in POS channel table
    pub fn builtin() -> Result<Self, RegistryError> {
        let commands = table::COMMAND_CHANNELS
            .iter()
            .map(|(channel, path)| ChannelDescriptor::command(*channel, *path));
        let events = table::EVENT_CHANNELS
            .iter()
            .map(|(channel, event)| ChannelDescriptor::event(*channel, *event));
        Self::from_entries(commands.chain(events))
    }

    /// Look up a legacy channel. Pure; `None` means unmapped.
    pub fn resolve(&self, legacy_channel: &str) -> Option<&ChannelDescriptor> {
        self.entries.get(legacy_channel)
    }

    /// Dispatch target of a legacy channel
    pub fn target(&self, legacy_channel: &str) -> Option<&str> {
        self.resolve(legacy_channel)
            .map(|d| d.dispatch_target.as_str())
    }

    /// Native event name registered for an event channel
    pub fn native_event(&self, legacy_channel: &str) -> Option<&str> {
        self.resolve(legacy_channel)
            .filter(|d| d.kind == ChannelKind::Event)
            .map(|d| d.dispatch_target.as_str())
    }

    /// Every legacy channel routed to `target`, in table order
    pub fn aliases_of<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .values()
            .filter(move |d| d.dispatch_target == target)
            .map(|d| d.legacy_channel.as_str())
    }

    /// All descriptors in table order
    pub fn iter(&self) -> impl Iterator<Item = &ChannelDescriptor> {
        self.entries.values()
    }

    /// Number of legacy channels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityTree;

    #[test]
    fn builtin_table_has_no_conflicts() {
        let registry = ChannelRegistry::builtin().unwrap();
        assert!(registry.len() > 100);
    }

    #[test]
    fn every_command_channel_reaches_a_capability() {
        let registry = ChannelRegistry::builtin().unwrap();
        let tree = CapabilityTree::builtin().unwrap();
        for descriptor in registry.iter().filter(|d| d.kind == ChannelKind::Command) {
            assert!(
                tree.contains(&descriptor.dispatch_target),
                "{} -> {} is not callable",
                descriptor.legacy_channel,
                descriptor.dispatch_target
            );
        }
    }

    #[test]
    fn generic_and_namespaced_names_alias_one_capability() {
        let registry = ChannelRegistry::builtin().unwrap();
        assert_eq!(registry.target("get-settings"), Some("settings.get"));
        assert_eq!(registry.target("settings:get"), Some("settings.get"));
        let aliases: Vec<_> = registry.aliases_of("settings.get").collect();
        assert!(aliases.contains(&"get-settings"));
        assert!(aliases.contains(&"settings:get"));
    }

    #[test]
    fn conflicting_duplicate_is_rejected() {
        let err = ChannelRegistry::from_entries([
            ChannelDescriptor::command("order:approve", "orders.approve"),
            ChannelDescriptor::command("order:approve", "orders.decline"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::ConflictingTarget {
                channel: "order:approve".into(),
                existing: "orders.approve".into(),
                conflicting: "orders.decline".into(),
            }
        );
    }

    #[test]
    fn identical_duplicate_is_collapsed() {
        let registry = ChannelRegistry::from_entries([
            ChannelDescriptor::command("order:approve", "orders.approve"),
            ChannelDescriptor::command("order:approve", "orders.approve"),
        ])
        .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn kind_change_counts_as_conflict() {
        let result = ChannelRegistry::from_entries([
            ChannelDescriptor::command("sync:status", "sync.get_status"),
            ChannelDescriptor::event("sync:status", "sync.get_status"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unmapped_channels_resolve_to_none() {
        let registry = ChannelRegistry::builtin().unwrap();
        assert!(registry.resolve("loyalty:redeem").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn event_channels_expose_native_names() {
        let registry = ChannelRegistry::builtin().unwrap();
        assert_eq!(registry.native_event("order-created"), Some("order_created"));
        assert_eq!(registry.native_event("order:approve"), None);
    }
}
