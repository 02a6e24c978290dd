use std::fmt::Debug;

use im::{OrdMap, Vector};
use serde::{
    de::Visitor,
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Serialize,
};

use super::{path_segment::IndexToken, PathSegment};

/// A persistent tree value.
///
/// Containers are `im` structures, so cloning a `Value` is cheap and an
/// edited clone shares every untouched subtree with the original.
#[derive(Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Blob(Vec<u8>),
    Array(Vector<Value>),
    Map(OrdMap<String, Value>),
}

/// Shape of a node, as seen by the patch dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Sequence,
    Keyed,
    Primitive,
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(v) => Debug::fmt(v, f),
            Value::Float(v) => Debug::fmt(v, f),
            Value::Bool(v) => Debug::fmt(v, f),
            Value::String(v) => Debug::fmt(v, f),
            Value::Array(v) => f.debug_list().entries(v.iter()).finish(),
            Value::Map(v) => f.debug_map().entries(v.iter()).finish(),
            Value::Blob(v) => Debug::fmt(v.as_slice(), f),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Integer(v) => Serialize::serialize(v, serializer),
            Value::Float(v) => Serialize::serialize(v, serializer),
            Value::Bool(v) => Serialize::serialize(v, serializer),
            Value::String(v) => Serialize::serialize(v, serializer),
            Value::Array(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for element in v.iter() {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Map(v) => {
                let mut map = serializer.serialize_map(Some(v.len()))?;
                for (key, value) in v.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Blob(v) => serializer.serialize_bytes(v),
        }
    }
}

struct ValueVisitor {}

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("null, an integer, a float, a bool, a string, bytes, a sequence or a map")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Integer(i64::try_from(v).map_err(|_| {
            serde::de::Error::invalid_type(serde::de::Unexpected::Unsigned(v), &self)
        })?))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::String(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut res = Vector::new();
        while let Some(v) = seq.next_element()? {
            res.push_back(v)
        }
        Ok(Value::Array(res))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut res = OrdMap::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            res.insert(key, value);
        }
        Ok(Value::Map(res))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Blob(v.to_vec()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Blob(v))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor {})
    }
}

impl Value {
    /// Builds a map value from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a sequence value from its elements.
    pub fn array<V, I>(elements: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(elements.into_iter().map(Into::into).collect())
    }

    pub fn empty_map() -> Self {
        Value::Map(OrdMap::new())
    }

    pub fn empty_array() -> Self {
        Value::Array(Vector::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Value::Array(_) => NodeKind::Sequence,
            Value::Map(_) => NodeKind::Keyed,
            Value::Null
            | Value::Integer(_)
            | Value::Float(_)
            | Value::Bool(_)
            | Value::String(_)
            | Value::Blob(_) => NodeKind::Primitive,
        }
    }

    pub fn get(&self, path: &[PathSegment]) -> Option<&Value> {
        if let Some((this, next)) = path.split_first() {
            match self {
                Value::Map(map) => map.get(this.as_str())?.get(next),
                Value::Array(arr) => match this.to_index_token()? {
                    IndexToken::Index(index) => arr.get(index)?.get(next),
                    IndexToken::Append => None,
                },
                _ => None,
            }
        } else {
            Some(self)
        }
    }
}

/// Picks the container that a missing intermediate node is created as, from
/// the segment that will address into it next.
pub fn container_for(next: &PathSegment) -> Value {
    if next.is_index() {
        Value::empty_array()
    } else {
        Value::empty_map()
    }
}

pub fn classify(value: &Value) -> NodeKind {
    value.kind()
}

impl Default for Value {
    fn default() -> Self {
        Value::Map(OrdMap::new())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(v1), Value::Integer(v2)) => v1 == v2,
            (Value::Float(v1), Value::Float(v2)) => {
                if v1.is_nan() && v2.is_nan() {
                    true
                } else {
                    v1 == v2
                }
            }
            (Value::Bool(v1), Value::Bool(v2)) => v1 == v2,
            (Value::String(v1), Value::String(v2)) => v1 == v2,
            (Value::Blob(v1), Value::Blob(v2)) => v1 == v2,
            (Value::Array(v1), Value::Array(v2)) => v1 == v2,
            (Value::Map(v1), Value::Map(v2)) => v1 == v2,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value.into_iter().collect())
    }
}

impl From<Vector<Value>> for Value {
    fn from(value: Vector<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<OrdMap<String, Value>> for Value {
    fn from(value: OrdMap<String, Value>) -> Self {
        Value::Map(value)
    }
}
