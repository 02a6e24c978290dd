use serde::{Deserialize, Serialize};

/// How the applier treats addresses that do not resolve cleanly.
///
/// Strict addressing rejects out-of-range indexes, descents through missing
/// nodes, and paths that continue past a primitive. Lenient addressing pads
/// sequences with `Null`, treats missing nodes as `Null` leaves, and ignores
/// path segments left over once a primitive is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyOptions {
    pub strict: bool,
    /// Most `Null` slots lenient addressing pads a sequence with in one step.
    /// Indexes further past the end are out of bounds in either mode.
    pub max_gap: usize,
}

pub const DEFAULT_MAX_GAP: usize = 1024;

impl ApplyOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            max_gap: DEFAULT_MAX_GAP,
        }
    }

    pub fn lenient() -> Self {
        Self {
            strict: false,
            max_gap: DEFAULT_MAX_GAP,
        }
    }

    pub fn with_max_gap(mut self, max_gap: usize) -> Self {
        self.max_gap = max_gap;
        self
    }
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self::strict()
    }
}
