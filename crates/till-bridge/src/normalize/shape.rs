//! Legacy call shapes and field descriptions

use serde_json::{Map, Value};

/// How the leading legacy argument was supplied.
///
/// Legacy call sites pass either nothing, a bare scalar standing in for the
/// primary key, or an object carrying named fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallShape<'a> {
    /// No leading argument, or an explicit null
    Empty,
    /// Anything that is not an object (string, number, bool, array)
    Scalar(&'a Value),
    /// Object request form
    Object(&'a Map<String, Value>),
}

impl<'a> CallShape<'a> {
    /// Classify the first positional argument
    pub fn classify(args: &'a [Value]) -> Self {
        match args.first() {
            None | Some(Value::Null) => Self::Empty,
            Some(Value::Object(map)) => Self::Object(map),
            Some(other) => Self::Scalar(other),
        }
    }

    /// Whether the call supplied nothing at all
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Absent on the legacy side: null or missing
pub(crate) fn present(value: &Value) -> bool {
    !value.is_null()
}

/// One logical field of a canonical argument object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key written into the canonical object
    pub canonical: &'static str,
    /// Historical property names accepted in the object form, in precedence order
    pub aliases: &'static [&'static str],
    /// Positional slot that may also carry this field
    pub position: Option<usize>,
}

impl FieldSpec {
    /// Field known only by its canonical name
    pub const fn named(canonical: &'static str) -> Self {
        Self {
            canonical,
            aliases: &[],
            position: None,
        }
    }

    /// Also accept these property names
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Also accept the value from positional slot `position`
    pub const fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether `key` names this field in object form
    pub fn accepts(&self, key: &str) -> bool {
        self.canonical == key || self.aliases.contains(&key)
    }

    /// Value supplied through the object form; canonical name first, then aliases
    pub(crate) fn from_object<'v>(&self, map: &'v Map<String, Value>) -> Option<&'v Value> {
        std::iter::once(self.canonical)
            .chain(self.aliases.iter().copied())
            .find_map(|key| map.get(key).filter(|v| present(v)))
    }

    /// Value supplied positionally. Slot 0 only counts when it is a scalar;
    /// an object there is the request itself.
    pub(crate) fn from_position<'v>(&self, shape: CallShape<'v>, args: &'v [Value]) -> Option<&'v Value> {
        match self.position? {
            0 => match shape {
                CallShape::Scalar(value) => Some(value),
                CallShape::Empty | CallShape::Object(_) => None,
            },
            slot => args.get(slot).filter(|v| present(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_distinguishes_the_three_shapes() {
        assert!(CallShape::classify(&[]).is_empty());
        assert!(CallShape::classify(&[Value::Null, json!("x")]).is_empty());
        assert!(matches!(CallShape::classify(&[json!(7)]), CallShape::Scalar(_)));
        assert!(matches!(
            CallShape::classify(&[json!({"key": "x"})]),
            CallShape::Object(_)
        ));
    }

    #[test]
    fn arrays_are_passed_as_scalars() {
        assert!(matches!(
            CallShape::classify(&[json!([1, 2])]),
            CallShape::Scalar(_)
        ));
    }

    #[test]
    fn canonical_key_beats_aliases() {
        const KEY: FieldSpec = FieldSpec::named("key").aliases(&["settingKey"]);
        let args = [json!({"settingKey": "b", "key": "a"})];
        let CallShape::Object(map) = CallShape::classify(&args) else {
            panic!("expected object form");
        };
        assert_eq!(KEY.from_object(map), Some(&json!("a")));
    }

    #[test]
    fn null_alias_falls_through_to_next() {
        const KEY: FieldSpec = FieldSpec::named("key").aliases(&["settingKey"]);
        let args = [json!({"key": null, "settingKey": "b"})];
        let CallShape::Object(map) = CallShape::classify(&args) else {
            panic!("expected object form");
        };
        assert_eq!(KEY.from_object(map), Some(&json!("b")));
    }
}
