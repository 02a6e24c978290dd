use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// One step of a patch path.
///
/// Segments are opaque strings: no pointer escaping is applied, so a key
/// such as `"prop/prop"` addresses exactly that key.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct PathSegment(String);

/// A segment resolved against an ordered container.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum IndexToken {
    Index(usize),
    /// The `"-"` token: one past the last element.
    Append,
}

pub const APPEND_TOKEN: &str = "-";

impl PathSegment {
    pub fn new(segment: impl Into<String>) -> Self {
        Self(segment.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True when the segment is a run of ASCII digits. Decides which kind of
    /// container gets created for a missing intermediate node.
    pub fn is_index(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn is_append(&self) -> bool {
        self.0 == APPEND_TOKEN
    }

    pub fn to_index_token(&self) -> Option<IndexToken> {
        if self.is_append() {
            Some(IndexToken::Append)
        } else if self.is_index() {
            self.0.parse().ok().map(IndexToken::Index)
        } else {
            None
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for PathSegment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds a path from anything segment-like, e.g. `path(["a", "0"])`.
pub fn path<I, S>(segments: I) -> Vec<PathSegment>
where
    I: IntoIterator<Item = S>,
    S: Into<PathSegment>,
{
    segments.into_iter().map(Into::into).collect()
}

struct PathSegmentVisitor {}

impl serde::de::Visitor<'_> for PathSegmentVisitor {
    type Value = PathSegment;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("either a string or a non-negative integer")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let index = u64::try_from(v).map_err(|_| {
            serde::de::Error::invalid_value(serde::de::Unexpected::Signed(v), &self)
        })?;
        Ok(PathSegment(index.to_string()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(PathSegment(v.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(PathSegment(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(PathSegment(v))
    }
}

impl<'de> Deserialize<'de> for PathSegment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(PathSegmentVisitor {})
    }
}

impl Serialize for PathSegment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl Debug for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use serde_test::{assert_de_tokens, assert_tokens, Token};

    use super::{IndexToken, PathSegment};

    #[test]
    fn test_segment_ser_de() {
        assert_tokens(&PathSegment::new("name"), &[Token::Str("name")]);
    }

    #[test]
    fn test_integer_segment_de() {
        assert_de_tokens(&PathSegment::new("1337"), &[Token::U64(1337)]);
        assert_de_tokens(&PathSegment::new("7"), &[Token::I64(7)]);
    }

    #[test]
    fn test_index_detection() {
        assert!(PathSegment::new("0").is_index());
        assert!(PathSegment::new("042").is_index());
        assert!(!PathSegment::new("").is_index());
        assert!(!PathSegment::new("-").is_index());
        assert!(!PathSegment::new("1a").is_index());
        assert!(!PathSegment::new("-1").is_index());
    }

    #[test]
    fn test_index_token() {
        assert_eq!(
            PathSegment::new("12").to_index_token(),
            Some(IndexToken::Index(12))
        );
        assert_eq!(
            PathSegment::new("-").to_index_token(),
            Some(IndexToken::Append)
        );
        assert_eq!(PathSegment::new("prop/prop").to_index_token(), None);
        // too large for usize
        assert_eq!(
            PathSegment::new("99999999999999999999999999").to_index_token(),
            None
        );
    }
}
