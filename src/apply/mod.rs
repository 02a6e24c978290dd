//! Applies patch batches to [`Value`] trees.
//!
//! Application is persistent: the input tree is never touched, every call
//! returns a new root that shares all untouched subtrees with the input.

use tracing::{debug, trace};

use crate::{
    error::PatchError,
    options::ApplyOptions,
    types::{patch::Op, Patch, PathSegment, Value},
};

pub mod keyed;
pub mod primitive;
pub mod sequence;

pub trait ApplyPatch {
    fn apply_with(&self, value: &Value, options: &ApplyOptions) -> Result<Value, PatchError>;

    fn apply(&self, value: &Value) -> Result<Value, PatchError> {
        self.apply_with(value, &ApplyOptions::default())
    }
}

impl ApplyPatch for Patch {
    fn apply_with(&self, value: &Value, options: &ApplyOptions) -> Result<Value, PatchError> {
        apply_patch(value, self, options)
    }
}

impl ApplyPatch for [Patch] {
    fn apply_with(&self, value: &Value, options: &ApplyOptions) -> Result<Value, PatchError> {
        apply_all_with(value, self, options)
    }
}

impl ApplyPatch for Vec<Patch> {
    fn apply_with(&self, value: &Value, options: &ApplyOptions) -> Result<Value, PatchError> {
        apply_all_with(value, self, options)
    }
}

/// The patch being applied, shared by every level of the descent.
pub(crate) struct Cursor<'a> {
    pub op: Op,
    pub path: &'a [PathSegment],
    pub value: &'a Value,
    pub options: &'a ApplyOptions,
}

impl Cursor<'_> {
    /// Path up to and including the segment at `depth`.
    pub fn prefix(&self, depth: usize) -> Vec<PathSegment> {
        self.path[..=depth].to_vec()
    }

    pub fn rest(&self, depth: usize) -> &[PathSegment] {
        &self.path[depth + 1..]
    }
}

/// Applies the cursor's patch to `node`, which sits at `path[..depth]`.
pub(crate) fn dispatch(node: &Value, depth: usize, cursor: &Cursor<'_>) -> Result<Value, PatchError> {
    if depth == cursor.path.len() {
        return Ok(primitive::apply(cursor.op, cursor.value));
    }
    match node {
        Value::Array(seq) => sequence::apply(seq, depth, cursor).map(Value::Array),
        Value::Map(map) => keyed::apply(map, depth, cursor).map(Value::Map),
        _ if cursor.options.strict => Err(PatchError::NotAContainer {
            path: cursor.prefix(depth),
        }),
        // leftover segments are ignored once a leaf is reached
        _ => Ok(primitive::apply(cursor.op, cursor.value)),
    }
}

/// Applies a single patch. Unlike [`apply_all_with`] there is no whole-value
/// shortcut, although a root replace ends up with the same result.
pub fn apply_patch(value: &Value, patch: &Patch, options: &ApplyOptions) -> Result<Value, PatchError> {
    trace!(op = %patch.op, path = ?patch.path, "applying patch");
    let null = Value::Null;
    let cursor = Cursor {
        op: patch.op,
        path: &patch.path,
        value: patch.value.as_ref().unwrap_or(&null),
        options,
    };
    dispatch(value, 0, &cursor)
}

/// Applies `patches` left to right, each one seeing the result of the
/// previous ones. Stops at the first failing patch.
pub fn apply_all_with(
    root: &Value,
    patches: &[Patch],
    options: &ApplyOptions,
) -> Result<Value, PatchError> {
    if let [only] = patches {
        if only.is_root_replace() {
            debug!(from = ?root.kind(), "substituting whole value");
            return Ok(only.value.clone().unwrap_or(Value::Null));
        }
    }
    debug!(patches = patches.len(), strict = options.strict, "applying patch batch");
    patches
        .iter()
        .enumerate()
        .try_fold(root.clone(), |value, (index, patch)| {
            apply_patch(&value, patch, options).map_err(|err| {
                debug!(index, error = %err, "patch batch aborted");
                err
            })
        })
}

/// [`apply_all_with`] using strict addressing.
pub fn apply_all(root: &Value, patches: &[Patch]) -> Result<Value, PatchError> {
    apply_all_with(root, patches, &ApplyOptions::default())
}
