//! Argument normalizer
//!
//! Legacy call sites reach the same operation with several argument shapes:
//!
//! - `getSetting("printer")` (bare scalar standing in for the primary key)
//! - `getSetting({ settingKey: "printer" })` (object form, historical key names)
//! - `updateSetting("printer", "epson", "hardware")` (positional, trailing optionals)
//!
//! Each operation declares an [`ArgShape`]; [`normalize`] turns any of those
//! call forms into the one canonical payload the native command expects.
//!
//! Precedence is first-present-wins: a field named in the object form beats
//! the same field passed in a later positional slot, the canonical key beats
//! its aliases, and null counts as absent. Missing data is omitted, never
//! written as null, and a call that supplies nothing produces no payload.
//! Values are never type-checked here.
//!
//! Supplied data is never dropped. A present argument that no field claims
//! travels under a positional key (`arg2`), and an operation without a
//! canonical payload forwards whatever it was given the same way.

mod shape;

pub use shape::{CallShape, FieldSpec};

use serde_json::{Map, Value};
use shape::present;
use tracing::debug;

/// Positional key prefix used when none is configured
pub const DEFAULT_ARG_PREFIX: &str = "arg";

/// Canonical payload shape of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// The native command takes no payload. Present arguments are forwarded
    /// under positional keys rather than discarded.
    NoPayload,

    /// Named fields gathered from the object form and positional slots
    Fields {
        /// Fields in canonical order
        fields: &'static [FieldSpec],
        /// Nest the canonical object under this key
        envelope: Option<&'static str>,
    },

    /// The first argument is an opaque value sent under `key`
    Wrap {
        /// Native parameter name
        key: &'static str,
    },
}

impl ArgShape {
    /// Fields shape without an envelope
    pub const fn fields(fields: &'static [FieldSpec]) -> Self {
        Self::Fields {
            fields,
            envelope: None,
        }
    }

    /// Fields shape nested under `envelope`
    pub const fn enveloped(envelope: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self::Fields {
            fields,
            envelope: Some(envelope),
        }
    }

    /// Normalize a legacy argument list for this shape
    pub fn normalize(&self, args: &[Value]) -> Option<Value> {
        normalize(self, args)
    }

    /// Normalize with `prefix` for positional keys
    pub fn normalize_with(&self, args: &[Value], prefix: &str) -> Option<Value> {
        normalize_with(self, args, prefix)
    }
}

/// Normalize `args` into the canonical payload for `shape`.
///
/// Returns `None` when the native command should be called without a payload.
pub fn normalize(shape: &ArgShape, args: &[Value]) -> Option<Value> {
    normalize_with(shape, args, DEFAULT_ARG_PREFIX)
}

/// [`normalize`] with an explicit positional key prefix
pub fn normalize_with(shape: &ArgShape, args: &[Value], prefix: &str) -> Option<Value> {
    if !args.iter().any(present) {
        return None;
    }

    match *shape {
        ArgShape::NoPayload => {
            debug!(supplied = args.len(), "operation takes no payload; forwarding arguments positionally");
            pack_positional(args, prefix)
        }
        ArgShape::Wrap { key } => {
            let mut map = Map::new();
            if let Some(value) = args.first().filter(|v| present(v)) {
                map.insert(key.to_string(), value.clone());
            }
            keep_unclaimed(&mut map, args, prefix, |slot| slot == 0);
            Some(Value::Object(map))
        }
        ArgShape::Fields { fields, envelope } => {
            let mut canonical = gather_fields(fields, args);
            let object_form = matches!(CallShape::classify(args), CallShape::Object(_));
            keep_unclaimed(&mut canonical, args, prefix, |slot| {
                (slot == 0 && object_form) || fields.iter().any(|f| f.position == Some(slot))
            });
            let canonical = Value::Object(canonical);
            Some(match envelope {
                Some(key) => {
                    let mut outer = Map::new();
                    outer.insert(key.to_string(), canonical);
                    Value::Object(outer)
                }
                None => canonical,
            })
        }
    }
}

/// Pack arguments under positional keys, preserving order and count.
/// No arguments means no payload, not an empty object.
pub fn pack_positional(args: &[Value], prefix: &str) -> Option<Value> {
    if args.is_empty() {
        return None;
    }
    let map: Map<String, Value> = args
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("{prefix}{i}"), v.clone()))
        .collect();
    Some(Value::Object(map))
}

/// Copy present arguments in slots the shape does not read into `out`
/// under positional keys
fn keep_unclaimed(
    out: &mut Map<String, Value>,
    args: &[Value],
    prefix: &str,
    claimed: impl Fn(usize) -> bool,
) {
    for (slot, value) in args.iter().enumerate() {
        if present(value) && !claimed(slot) {
            debug!(slot, "keeping unclaimed argument under a positional key");
            out.entry(format!("{prefix}{slot}"))
                .or_insert_with(|| value.clone());
        }
    }
}

fn gather_fields(fields: &[FieldSpec], args: &[Value]) -> Map<String, Value> {
    let call = CallShape::classify(args);
    let mut out = Map::new();

    for field in fields {
        let from_object = match call {
            CallShape::Object(map) => field.from_object(map),
            CallShape::Empty | CallShape::Scalar(_) => None,
        };
        if let Some(value) = from_object.or_else(|| field.from_position(call, args)) {
            out.insert(field.canonical.to_string(), value.clone());
        }
    }

    // Keys no field claims travel uninterpreted
    if let CallShape::Object(map) = call {
        for (key, value) in map {
            if present(value) && !fields.iter().any(|f| f.accepts(key)) {
                out.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }

    out
}
