use thiserror::Error;

use crate::types::PathSegment;

#[derive(Debug, Error)]
pub enum Error {
    #[cfg(feature = "cbor")]
    #[error(transparent)]
    CborDe(#[from] ciborium::de::Error<std::io::Error>),
    #[cfg(feature = "cbor")]
    #[error(transparent)]
    CborSer(#[from] ciborium::ser::Error<std::io::Error>),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Failure of a single patch. The carried path ends at the segment that
/// could not be resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("unknown op: {op:?}")]
    UnknownOp { op: String },
    #[error("invalid sequence index at {path:?}")]
    InvalidIndex { path: Vec<PathSegment> },
    #[error("index {index} out of bounds (len: {len}) at {path:?}")]
    IndexOutOfBounds {
        path: Vec<PathSegment>,
        index: usize,
        len: usize,
    },
    #[error("append token is only valid as the last segment of an add, at {path:?}")]
    AppendNotAllowed { path: Vec<PathSegment> },
    #[error("nothing to descend into at {path:?}")]
    NotFound { path: Vec<PathSegment> },
    #[error("cannot descend into a primitive at {path:?}")]
    NotAContainer { path: Vec<PathSegment> },
}

impl PatchError {
    pub fn path(&self) -> &[PathSegment] {
        match self {
            PatchError::UnknownOp { .. } => &[],
            PatchError::InvalidIndex { path }
            | PatchError::IndexOutOfBounds { path, .. }
            | PatchError::AppendNotAllowed { path }
            | PatchError::NotFound { path }
            | PatchError::NotAContainer { path } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
