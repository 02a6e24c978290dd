use crate::types::{patch::Op, Value};

/// Terminal operation, used once the path is exhausted or a leaf is reached.
/// Add and replace substitute the node, remove leaves `Null` behind.
pub fn apply(op: Op, value: &Value) -> Value {
    match op {
        Op::Add | Op::Replace => value.clone(),
        Op::Remove => Value::Null,
    }
}
