//! Capability tree
//!
//! Every native operation the bridge knows how to call is an
//! [`OperationSpec`]: a dot path (`orders.approve`), the native command it
//! invokes, and the argument shape its normalizer produces. The tree indexes
//! the static operation table by path; the typed namespace views in
//! [`namespaces`] call the specs directly.

pub mod namespaces;
pub mod operations;

use crate::error::{CapabilityError, TransportError};
use crate::normalize::ArgShape;
use crate::transport::CommandTransport;
use indexmap::IndexMap;
use serde_json::Value;

/// One callable entry of the capability tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// `namespace.operation`
    pub path: &'static str,
    /// Native command invoked
    pub command: &'static str,
    /// Canonical argument shape
    pub shape: ArgShape,
}

impl OperationSpec {
    /// Namespace half of the path
    pub fn namespace(&self) -> &'static str {
        self.path.split_once('.').map_or(self.path, |(ns, _)| ns)
    }

    /// Operation half of the path
    pub fn operation(&self) -> &'static str {
        self.path.split_once('.').map_or("", |(_, op)| op)
    }

    /// Canonical payload for a legacy argument list
    pub fn normalize(&self, args: &[Value]) -> Option<Value> {
        self.shape.normalize(args)
    }

    /// Canonical payload, keeping unclaimed arguments under `arg_prefix` keys
    pub fn normalize_with(&self, args: &[Value], arg_prefix: &str) -> Option<Value> {
        self.shape.normalize_with(args, arg_prefix)
    }

    /// Normalize and invoke
    pub async fn call(
        &self,
        commands: &dyn CommandTransport,
        args: &[Value],
        arg_prefix: &str,
    ) -> Result<Value, TransportError> {
        let payload = self.normalize_with(args, arg_prefix);
        tracing::trace!(path = self.path, command = self.command, "capability call");
        commands.invoke(self.command, payload).await
    }
}

/// Path-indexed view over the operation table
#[derive(Debug, Clone)]
pub struct CapabilityTree {
    ops: IndexMap<&'static str, OperationSpec>,
}

impl CapabilityTree {
    /// Index an operation table, rejecting duplicate or malformed paths
    pub fn from_operations(specs: &[OperationSpec]) -> Result<Self, CapabilityError> {
        let mut ops = IndexMap::with_capacity(specs.len());
        for spec in specs {
            match spec.path.split_once('.') {
                Some((ns, op)) if !ns.is_empty() && !op.is_empty() && !op.contains('.') => {}
                _ => return Err(CapabilityError::MalformedPath(spec.path.to_string())),
            }
            if ops.insert(spec.path, *spec).is_some() {
                return Err(CapabilityError::DuplicatePath(spec.path.to_string()));
            }
        }
        Ok(Self { ops })
    }

    /// Tree over the built-in POS operations
    pub fn builtin() -> Result<Self, CapabilityError> {
        Self::from_operations(operations::ALL)
    }

    /// Look up the callable at `path`
    pub fn get(&self, path: &str) -> Option<&OperationSpec> {
        self.ops.get(path)
    }

    /// Whether `path` terminates in a callable
    pub fn contains(&self, path: &str) -> bool {
        self.ops.contains_key(path)
    }

    /// Namespaces in table order, deduplicated
    pub fn namespaces(&self) -> Vec<&'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for spec in self.ops.values() {
            let ns = spec.namespace();
            if !seen.contains(&ns) {
                seen.push(ns);
            }
        }
        seen
    }

    /// Operations of one namespace in table order
    pub fn operations_in<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a OperationSpec> + 'a {
        self.ops.values().filter(move |spec| spec.namespace() == namespace)
    }

    /// All operations in table order
    pub fn iter(&self) -> impl Iterator<Item = &OperationSpec> {
        self.ops.values()
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the tree is empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tree_builds() {
        let tree = CapabilityTree::builtin().unwrap();
        assert!(tree.contains("orders.approve"));
        assert!(tree.contains("settings.get"));
        assert!(!tree.contains("orders"));
        assert!(tree.namespaces().contains(&"printers"));
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let spec = OperationSpec {
            path: "orders.get_all",
            command: "order_get_all",
            shape: ArgShape::NoPayload,
        };
        let err = CapabilityTree::from_operations(&[spec, spec]).unwrap_err();
        assert_eq!(err, CapabilityError::DuplicatePath("orders.get_all".into()));
    }

    #[test]
    fn paths_need_exactly_two_segments() {
        for path in ["orders", "orders.", ".approve", "a.b.c"] {
            let spec = OperationSpec {
                path,
                command: "x",
                shape: ArgShape::NoPayload,
            };
            assert!(CapabilityTree::from_operations(&[spec]).is_err(), "{path}");
        }
    }

    #[test]
    fn split_path_accessors() {
        let tree = CapabilityTree::builtin().unwrap();
        let spec = tree.get("shifts.close").unwrap();
        assert_eq!(spec.namespace(), "shifts");
        assert_eq!(spec.operation(), "close");
        assert!(tree.operations_in("shifts").any(|s| s.path == "shifts.open"));
    }
}
