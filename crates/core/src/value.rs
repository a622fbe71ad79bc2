//! Dynamic value tree validated by the rule engine.
//!
//! A [`Value`] is a closed set of four kinds: records (named fields with
//! optional declared rules), keyed maps, ordered sequences and scalar leaves.
//! The engine dispatches on [`Value::kind`] with exhaustive matches; there is
//! no open-ended runtime type inspection.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::record::Record;

/// Insertion-ordered map payload of [`Value::Map`].
pub type ValueMap = IndexMap<MapKey, Value>;

// ── Kinds ───────────────────────────────────────────────────────────

/// Runtime kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Record,
    Map,
    Sequence,
    Scalar,
}

impl ValueKind {
    /// Records, maps and sequences have children; scalars do not.
    pub fn is_container(self) -> bool {
        !matches!(self, ValueKind::Scalar)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Record => "record",
            ValueKind::Map => "map",
            ValueKind::Sequence => "sequence",
            ValueKind::Scalar => "scalar",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Map keys ────────────────────────────────────────────────────────

/// A map key. Only [`MapKey::String`] is addressable by a field path;
/// the other variants exist so decoded input can carry them faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    String(String),
    Int(i64),
    UInt(u64),
    Bool(bool),
}

impl MapKey {
    /// The key as a path segment, if it is string-like.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapKey::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the key's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            MapKey::String(_) => "string",
            MapKey::Int(_) => "int",
            MapKey::UInt(_) => "uint",
            MapKey::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::String(s) => f.write_str(s),
            MapKey::Int(n) => write!(f, "{n}"),
            MapKey::UInt(n) => write!(f, "{n}"),
            MapKey::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::String(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::String(s)
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        MapKey::Int(n)
    }
}

// ── Scalars ─────────────────────────────────────────────────────────

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Opaque handle (pointer-like or resource reference). Only its label is kept.
    Handle(String),
}

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::UInt(_) => "uint",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
            Scalar::Bytes(_) => "bytes",
            Scalar::Handle(_) => "handle",
        }
    }

    /// Numeric view of int, uint and float scalars.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::UInt(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::UInt(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => f.write_str(s),
            Scalar::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Scalar::Handle(h) => write!(f, "<{h}>"),
        }
    }
}

// ── Value ───────────────────────────────────────────────────────────

/// An arbitrarily nested dynamic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Record(Record),
    Map(ValueMap),
    Sequence(Vec<Value>),
    Scalar(Scalar),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Record(_) => ValueKind::Record,
            Value::Map(_) => ValueKind::Map,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Scalar(_) => ValueKind::Scalar,
        }
    }

    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn int(n: i64) -> Self {
        Value::Scalar(Scalar::Int(n))
    }

    pub fn float(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }

    pub fn bool(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }

    /// Build a map value from `(key, value)` pairs, keeping their order.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<MapKey>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn sequence<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Sequence(items.into_iter().collect())
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::as_f64)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    /// Null, the empty string, empty bytes, or an empty map or sequence.
    /// Records are never empty-like: a record always has a shape.
    pub fn is_empty_like(&self) -> bool {
        match self {
            Value::Scalar(Scalar::Null) => true,
            Value::Scalar(Scalar::String(s)) => s.is_empty(),
            Value::Scalar(Scalar::Bytes(b)) => b.is_empty(),
            Value::Scalar(_) => false,
            Value::Map(m) => m.is_empty(),
            Value::Sequence(items) => items.is_empty(),
            Value::Record(_) => false,
        }
    }

    /// Element count for strings (chars), bytes, maps, sequences and records
    /// (exported fields). `None` for other scalars.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s.chars().count()),
            Value::Scalar(Scalar::Bytes(b)) => Some(b.len()),
            Value::Scalar(_) => None,
            Value::Map(m) => Some(m.len()),
            Value::Sequence(items) => Some(items.len()),
            Value::Record(r) => Some(r.exported_fields().count()),
        }
    }

    /// Short type description used by kind predicates and messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(s) => s.type_name(),
            other => other.kind().as_str(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

// ── Serialization ───────────────────────────────────────────────────

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(n) => serializer.serialize_i64(*n),
            Scalar::UInt(n) => serializer.serialize_u64(*n),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Bytes(b) => serializer.serialize_bytes(b),
            Scalar::Handle(h) => serializer.serialize_str(h),
        }
    }
}

/// Records serialize as maps of their exported fields; hidden fields are omitted.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(&k.to_string(), v)?;
                }
                map.end()
            }
            Value::Record(record) => {
                let mut map = serializer.serialize_map(None)?;
                for field in record.exported_fields() {
                    map.serialize_entry(&field.name, &field.value)?;
                }
                map.end()
            }
        }
    }
}
