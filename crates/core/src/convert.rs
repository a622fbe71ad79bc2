//! Conversions into [`Value`]: the [`ToValue`] trait for typed data and
//! decoders for `serde_json` / `serde_yaml` documents.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::CoreError;
use crate::record::Record;
use crate::value::{MapKey, Scalar, Value, ValueMap};

/// Typed data that can be presented to the validator as a [`Value`] tree.
///
/// User-defined structs implement this with the [`Record`] builder, attaching
/// declared rules to fields as they go:
///
/// ```
/// use fieldguard_core::{Record, ToValue, Value};
///
/// struct Signup { email: String, age: u32 }
///
/// impl ToValue for Signup {
///     fn to_value(&self) -> Value {
///         Record::new("Signup")
///             .tagged("email", self.email.to_value(), "required|email")
///             .tagged("age", self.age.to_value(), "min:18")
///             .into()
///     }
/// }
/// ```
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Record {
    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }
}

impl ToValue for Scalar {
    fn to_value(&self) -> Value {
        Value::Scalar(self.clone())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::string(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::string(self.as_str())
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::string(self.to_string())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::bool(*self)
    }
}

macro_rules! signed_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::Int(*self as i64))
            }
        })*
    };
}

macro_rules! unsigned_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::UInt(*self as u64))
            }
        })*
    };
}

signed_to_value!(i8, i16, i32, i64, isize);
unsigned_to_value!(u8, u16, u32, u64, usize);

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::float(*self)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::null(),
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

fn map_to_value<'a, K, T, I>(entries: I) -> Value
where
    K: Clone + Into<MapKey> + 'a,
    T: ToValue + 'a,
    I: IntoIterator<Item = (&'a K, &'a T)>,
{
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.clone().into(), v.to_value()))
            .collect(),
    )
}

impl<K, T, S> ToValue for HashMap<K, T, S>
where
    K: Clone + Into<MapKey> + Eq + Hash,
    T: ToValue,
    S: std::hash::BuildHasher,
{
    fn to_value(&self) -> Value {
        map_to_value(self.iter())
    }
}

impl<K: Clone + Into<MapKey> + Ord, T: ToValue> ToValue for BTreeMap<K, T> {
    fn to_value(&self) -> Value {
        map_to_value(self.iter())
    }
}

impl<K: Clone + Into<MapKey> + Eq + Hash, T: ToValue> ToValue for IndexMap<K, T> {
    fn to_value(&self) -> Value {
        map_to_value(self.iter())
    }
}

// ── JSON ────────────────────────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::bool(b),
            serde_json::Value::Number(n) => Value::Scalar(json_number(&n)),
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (MapKey::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

fn json_number(n: &serde_json::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::UInt(u)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

// ── YAML ────────────────────────────────────────────────────────────

impl TryFrom<serde_yaml::Value> for Value {
    type Error = CoreError;

    /// Convert a YAML document. Mapping keys keep their YAML type, so a
    /// document like `{1: a}` produces an integer [`MapKey`].
    fn try_from(yaml: serde_yaml::Value) -> Result<Self, Self::Error> {
        yaml_to_value(yaml, "")
    }
}

fn yaml_to_value(yaml: serde_yaml::Value, path: &str) -> Result<Value, CoreError> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::null(),
        serde_yaml::Value::Bool(b) => Value::bool(b),
        serde_yaml::Value::Number(n) => Value::Scalar(yaml_number(&n)),
        serde_yaml::Value::String(s) => Value::string(s),
        serde_yaml::Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                out.push(yaml_to_value(item, &child_path(path, &i.to_string()))?);
            }
            Value::Sequence(out)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut out = ValueMap::with_capacity(mapping.len());
            for (k, v) in mapping {
                let key = yaml_key(k, path)?;
                let child = yaml_to_value(v, &child_path(path, &key.to_string()))?;
                out.insert(key, child);
            }
            Value::Map(out)
        }
        serde_yaml::Value::Tagged(tagged) => {
            return Err(CoreError::UnsupportedYaml {
                path: path.to_string(),
                reason: format!("tagged value '{}'", tagged.tag),
            })
        }
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::UInt(u)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn yaml_key(key: serde_yaml::Value, path: &str) -> Result<MapKey, CoreError> {
    match key {
        serde_yaml::Value::String(s) => Ok(MapKey::String(s)),
        serde_yaml::Value::Bool(b) => Ok(MapKey::Bool(b)),
        serde_yaml::Value::Number(n) => match yaml_number(&n) {
            Scalar::Int(i) => Ok(MapKey::Int(i)),
            Scalar::UInt(u) => Ok(MapKey::UInt(u)),
            _ => Err(CoreError::UnsupportedYaml {
                path: path.to_string(),
                reason: format!("float mapping key {n}"),
            }),
        },
        other => Err(CoreError::UnsupportedYaml {
            path: path.to_string(),
            reason: format!("mapping key of unsupported type: {other:?}"),
        }),
    }
}

fn child_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}
