pub mod apply;
#[cfg(feature = "cbor")]
pub mod codec;
pub mod error;
pub mod options;
pub mod types;

pub use apply::{apply_all, apply_all_with, apply_patch, ApplyPatch};
pub use error::{Error, PatchError, Result};
pub use options::ApplyOptions;
pub use types::{path, NodeKind, Op, Patch, PathSegment, Value};
