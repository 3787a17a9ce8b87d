//! The scope tree: named, ordered mappings from keys to scalars or nested scopes.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Invariant violations on [`Scope`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("scope name must not be empty")]
    EmptyName,

    #[error("scope key must not be empty")]
    EmptyKey,

    /// A nested scope may only be stored under its own name.
    #[error("cannot store scope '{name}' under key '{key}'")]
    NameMismatch { key: String, name: String },
}

/// A scalar or a nested scope.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Scope(Scope),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Any numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float32(f) => Some(f64::from(*f)),
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Value::Scope(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Scope(_) => "scope",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float32(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Scope> for Value {
    fn from(s: Scope) -> Self {
        Value::Scope(s)
    }
}

/// A named, insertion-ordered mapping.
///
/// Storing a scope under a key that already holds a scope merges the two
/// instead of replacing: every incoming entry is applied to the existing scope
/// with the same rule, recursively. Any other collision overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    name: String,
    entries: IndexMap<String, Value>,
}

impl Scope {
    pub fn new(name: impl Into<String>) -> Result<Self, ScopeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ScopeError::EmptyName);
        }
        Ok(Scope {
            name,
            entries: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_scope(&self, key: &str) -> Option<&Scope> {
        self.get(key).and_then(Value::as_scope)
    }

    /// Follow a dot-separated path of keys. Every component but the last must
    /// name a nested scope.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut value = self.get(first)?;
        for part in parts {
            value = value.as_scope()?.get(part)?;
        }
        Some(value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Store `value` under `key`, merging if both the old and the new value
    /// are scopes.
    pub fn put(&mut self, key: impl Into<String>, value: Value) -> Result<(), ScopeError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ScopeError::EmptyKey);
        }

        let incoming = match value {
            Value::Scope(scope) => scope,
            scalar => {
                self.entries.insert(key, scalar);
                return Ok(());
            }
        };

        if incoming.name != key {
            return Err(ScopeError::NameMismatch {
                key,
                name: incoming.name,
            });
        }

        match self.entries.get_mut(&key) {
            Some(Value::Scope(existing)) => existing.merge(incoming),
            _ => {
                self.entries.insert(key, Value::Scope(incoming));
                Ok(())
            }
        }
    }

    /// Store a nested scope under its own name.
    pub fn put_scope(&mut self, scope: Scope) -> Result<(), ScopeError> {
        let key = scope.name.clone();
        self.put(key, Value::Scope(scope))
    }

    /// Apply every entry of `other` to this scope with the [`put`](Self::put) rule.
    pub fn put_all(&mut self, other: &Scope) -> Result<(), ScopeError> {
        for (key, value) in other.iter() {
            self.put(key.clone(), value.clone())?;
        }
        Ok(())
    }

    fn merge(&mut self, incoming: Scope) -> Result<(), ScopeError> {
        for (key, value) in incoming.entries {
            self.put(key, value)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Scope {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::write_entries(f, self, 0)
    }
}

// ── Serialization ────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float32(f) => serializer.serialize_f32(*f),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Scope(scope) => scope.serialize(serializer),
        }
    }
}

/// Serializes as a map of the entries, in insertion order. The scope's own
/// name is the key it is stored under, so it is not repeated.
impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(name: &str, entries: &[(&str, Value)]) -> Scope {
        let mut s = Scope::new(name).unwrap();
        for (k, v) in entries {
            s.put(*k, v.clone()).unwrap();
        }
        s
    }

    #[test]
    fn empty_name_and_key_are_rejected() {
        assert_eq!(Scope::new(""), Err(ScopeError::EmptyName));
        let mut s = Scope::new("root").unwrap();
        assert_eq!(s.put("", Value::Null), Err(ScopeError::EmptyKey));
    }

    #[test]
    fn scalar_put_overwrites_and_keeps_position() {
        let mut s = scope("root", &[("a", 1i64.into()), ("b", 2i64.into())]);
        s.put("a", "x".into()).unwrap();
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(s.get("a"), Some(&Value::String("x".into())));
    }

    #[test]
    fn null_is_stored_not_removed() {
        let mut s = scope("root", &[("a", 1i64.into())]);
        s.put("a", Value::Null).unwrap();
        assert!(s.contains_key("a"));
        assert!(s.get("a").unwrap().is_null());
    }

    #[test]
    fn scope_must_be_stored_under_its_name() {
        let mut s = Scope::new("root").unwrap();
        let inner = Scope::new("inner").unwrap();
        let err = s.put("other", Value::Scope(inner)).unwrap_err();
        assert_eq!(
            err,
            ScopeError::NameMismatch {
                key: "other".into(),
                name: "inner".into()
            }
        );
    }

    #[test]
    fn same_named_scopes_merge_recursively() {
        let first = scope(
            "block",
            &[
                ("x", 1i64.into()),
                ("deep", scope("deep", &[("a", true.into())]).into()),
            ],
        );
        let second = scope(
            "block",
            &[
                ("y", 2i64.into()),
                ("deep", scope("deep", &[("b", false.into())]).into()),
            ],
        );

        let mut root = Scope::new("root").unwrap();
        root.put_scope(first).unwrap();
        root.put_scope(second).unwrap();

        let block = root.get_scope("block").unwrap();
        assert_eq!(block.get("x"), Some(&Value::Int(1)));
        assert_eq!(block.get("y"), Some(&Value::Int(2)));
        assert_eq!(root.lookup("block.deep.a"), Some(&Value::Bool(true)));
        assert_eq!(root.lookup("block.deep.b"), Some(&Value::Bool(false)));
    }

    #[test]
    fn merging_in_sequence_equals_merging_the_union() {
        let a = scope("s", &[("k", 1i64.into()), ("only_a", "a".into())]);
        let b = scope("s", &[("k", 2i64.into()), ("only_b", "b".into())]);
        let union = scope(
            "s",
            &[
                ("k", 1i64.into()),
                ("only_a", "a".into()),
                ("k", 2i64.into()),
                ("only_b", "b".into()),
            ],
        );

        let mut sequential = Scope::new("root").unwrap();
        sequential.put_scope(a).unwrap();
        sequential.put_scope(b).unwrap();

        let mut once = Scope::new("root").unwrap();
        once.put_scope(union).unwrap();

        assert_eq!(sequential, once);
    }

    #[test]
    fn scalar_over_scope_replaces_it() {
        let mut root = Scope::new("root").unwrap();
        root.put_scope(scope("s", &[("k", 1i64.into())])).unwrap();
        root.put("s", 5i64.into()).unwrap();
        assert_eq!(root.get("s"), Some(&Value::Int(5)));
    }

    #[test]
    fn lookup_stops_at_scalars() {
        let root = scope("root", &[("a", 1i64.into())]);
        assert_eq!(root.lookup("a"), Some(&Value::Int(1)));
        assert_eq!(root.lookup("a.b"), None);
        assert_eq!(root.lookup("missing"), None);
    }

    #[test]
    fn serializes_as_ordered_json_object() {
        let root = scope(
            "root",
            &[
                ("z", Value::Null),
                ("a", "text".into()),
                ("m", scope("m", &[("n", 3i64.into())]).into()),
            ],
        );
        let json = serde_json::to_string(&root).unwrap();
        assert_eq!(json, r#"{"z":null,"a":"text","m":{"n":3}}"#);
    }
}
