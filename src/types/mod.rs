pub mod path_segment;
pub use path_segment::{path, IndexToken, PathSegment};

pub mod value;
pub use value::{NodeKind, Value};

pub mod patch;
pub use patch::{Op, Patch};
