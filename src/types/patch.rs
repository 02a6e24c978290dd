use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Serialize};

use crate::error::PatchError;

use super::{PathSegment, Value};

/// Edit operation of a [`Patch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Insert or set; on an occupied sequence slot, insert before it.
    Add,
    /// Overwrite in place.
    Replace,
    /// Delete a key, or shift-remove a sequence element.
    Remove,
}

impl Op {
    /// Compact wire code, as emitted by serialization.
    pub fn code(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Replace => "!=",
            Op::Remove => "-",
        }
    }
}

impl FromStr for Op {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "add" => Ok(Op::Add),
            "!=" | "replace" => Ok(Op::Replace),
            "-" | "remove" => Ok(Op::Remove),
            _ => Err(PatchError::UnknownOp { op: s.to_string() }),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Op {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

struct OpVisitor {}

impl de::Visitor<'_> for OpVisitor {
    type Value = Op;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("one of \"+\", \"!=\", \"-\", \"add\", \"replace\", \"remove\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(OpVisitor {})
    }
}

/// One path-addressed edit.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Patch {
    pub op: Op,
    pub path: Vec<PathSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Patch {
    pub fn new(op: Op, path: Vec<PathSegment>, value: Option<Value>) -> Self {
        Self { op, path, value }
    }

    pub fn add(path: Vec<PathSegment>, value: impl Into<Value>) -> Self {
        Self::new(Op::Add, path, Some(value.into()))
    }

    pub fn replace(path: Vec<PathSegment>, value: impl Into<Value>) -> Self {
        Self::new(Op::Replace, path, Some(value.into()))
    }

    pub fn remove(path: Vec<PathSegment>) -> Self {
        Self::new(Op::Remove, path, None)
    }

    /// Whole-value substitution: a replace with an empty path.
    pub fn is_root_replace(&self) -> bool {
        self.op == Op::Replace && self.path.is_empty()
    }
}
