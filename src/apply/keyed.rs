use im::OrdMap;

use crate::{
    error::PatchError,
    types::{patch::Op, value::container_for, Value},
};

use super::{dispatch, Cursor};

/// Applies the cursor's op to the key at `depth` of `map`.
pub(crate) fn apply(
    map: &OrdMap<String, Value>,
    depth: usize,
    cursor: &Cursor<'_>,
) -> Result<OrdMap<String, Value>, PatchError> {
    let key = cursor.path[depth].as_str();
    let rest = cursor.rest(depth);
    let mut map = map.clone();
    match cursor.op {
        Op::Add => {
            let child = match (map.get(key), rest.first()) {
                (None, Some(next)) => dispatch(&container_for(next), depth + 1, cursor)?,
                (Some(existing), _) => dispatch(existing, depth + 1, cursor)?,
                (None, None) => cursor.value.clone(),
            };
            map.insert(key.to_string(), child);
        }
        Op::Replace => {
            if rest.is_empty() {
                map.insert(key.to_string(), cursor.value.clone());
            } else {
                let child = match map.get(key) {
                    Some(existing) => dispatch(existing, depth + 1, cursor)?,
                    None if cursor.options.strict => {
                        return Err(PatchError::NotFound {
                            path: cursor.prefix(depth),
                        })
                    }
                    None => dispatch(&Value::Null, depth + 1, cursor)?,
                };
                map.insert(key.to_string(), child);
            }
        }
        Op::Remove => {
            if rest.is_empty() {
                map.remove(key);
            } else {
                let child = match map.get(key) {
                    Some(existing) => dispatch(existing, depth + 1, cursor)?,
                    None if cursor.options.strict => {
                        return Err(PatchError::NotFound {
                            path: cursor.prefix(depth),
                        })
                    }
                    None => dispatch(&Value::Null, depth + 1, cursor)?,
                };
                map.insert(key.to_string(), child);
            }
        }
    }
    Ok(map)
}
