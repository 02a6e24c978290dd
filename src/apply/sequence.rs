use im::Vector;

use crate::{
    error::PatchError,
    types::{path_segment::IndexToken, patch::Op, value::container_for, Value},
};

use super::{dispatch, Cursor};

/// Applies the cursor's op to the element addressed at `depth` of `seq`.
///
/// An add on an occupied index with nothing left of the path inserts before
/// that element, shifting the tail right. An add on a free slot places the
/// value there instead, which is how a list grows one index at a time.
pub(crate) fn apply(
    seq: &Vector<Value>,
    depth: usize,
    cursor: &Cursor<'_>,
) -> Result<Vector<Value>, PatchError> {
    let rest = cursor.rest(depth);
    let token = cursor.path[depth]
        .to_index_token()
        .ok_or_else(|| PatchError::InvalidIndex {
            path: cursor.prefix(depth),
        })?;
    let mut seq = seq.clone();
    let index = match token {
        IndexToken::Index(index) => index,
        IndexToken::Append if cursor.op == Op::Add && rest.is_empty() => {
            seq.push_back(cursor.value.clone());
            return Ok(seq);
        }
        IndexToken::Append => {
            return Err(PatchError::AppendNotAllowed {
                path: cursor.prefix(depth),
            })
        }
    };
    let len = seq.len();
    match cursor.op {
        Op::Add => {
            if index < len {
                if rest.is_empty() {
                    seq.insert(index, cursor.value.clone());
                } else {
                    let child = dispatch(&seq[index], depth + 1, cursor)?;
                    seq.set(index, child);
                }
            } else {
                check_slot(index, len, depth, cursor)?;
                let child = match rest.first() {
                    Some(next) => dispatch(&container_for(next), depth + 1, cursor)?,
                    None => cursor.value.clone(),
                };
                place(&mut seq, index, child);
            }
        }
        Op::Replace => {
            if index < len {
                let child = if rest.is_empty() {
                    cursor.value.clone()
                } else {
                    dispatch(&seq[index], depth + 1, cursor)?
                };
                seq.set(index, child);
            } else if cursor.options.strict {
                return Err(out_of_bounds(index, len, depth, cursor));
            } else {
                check_slot(index, len, depth, cursor)?;
                let child = dispatch(&Value::Null, depth + 1, cursor)?;
                place(&mut seq, index, child);
            }
        }
        Op::Remove => {
            if index < len {
                if rest.is_empty() {
                    seq.remove(index);
                } else {
                    let child = dispatch(&seq[index], depth + 1, cursor)?;
                    seq.set(index, child);
                }
            } else if cursor.options.strict {
                return Err(out_of_bounds(index, len, depth, cursor));
            } else if !rest.is_empty() {
                check_slot(index, len, depth, cursor)?;
                let child = dispatch(&Value::Null, depth + 1, cursor)?;
                place(&mut seq, index, child);
            }
        }
    }
    Ok(seq)
}

/// A free slot may sit right past the end; further out only when lenient,
/// and then no more than `max_gap` slots out.
fn check_slot(
    index: usize,
    len: usize,
    depth: usize,
    cursor: &Cursor<'_>,
) -> Result<(), PatchError> {
    let gap = index.saturating_sub(len);
    if gap > 0 && (cursor.options.strict || gap > cursor.options.max_gap) {
        Err(out_of_bounds(index, len, depth, cursor))
    } else {
        Ok(())
    }
}

/// Puts `child` at `index >= seq.len()`, padding any gap with `Null`.
fn place(seq: &mut Vector<Value>, index: usize, child: Value) {
    while seq.len() < index {
        seq.push_back(Value::Null);
    }
    seq.push_back(child);
}

fn out_of_bounds(index: usize, len: usize, depth: usize, cursor: &Cursor<'_>) -> PatchError {
    PatchError::IndexOutOfBounds {
        path: cursor.prefix(depth),
        index,
        len,
    }
}

#[cfg(test)]
mod test {
    use crate::{
        apply::{apply_all, apply_all_with},
        error::PatchError,
        options::ApplyOptions,
        types::{path_segment::path, Patch, Value},
    };

    fn list(elements: &[i64]) -> Value {
        Value::array(elements.iter().copied())
    }

    #[test]
    fn test_append_token() {
        let res = apply_all(&list(&[1, 2, 3]), &[Patch::add(path(["-"]), 4)]).unwrap();
        assert_eq!(res, list(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_insert_shifts_right() {
        let res = apply_all(&list(&[1, 2, 3]), &[Patch::add(path(["0"]), 9)]).unwrap();
        assert_eq!(res, list(&[9, 1, 2, 3]));
        let res = apply_all(&list(&[1, 2, 3]), &[Patch::add(path(["2"]), 9)]).unwrap();
        assert_eq!(res, list(&[1, 2, 9, 3]));
    }

    #[test]
    fn test_add_past_end_places() {
        let res = apply_all(&list(&[1, 2, 3]), &[Patch::add(path(["3"]), 4)]).unwrap();
        assert_eq!(res, list(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_remove_shifts_left() {
        let res = apply_all(&list(&[1, 2, 3, 4]), &[Patch::remove(path(["0"]))]).unwrap();
        assert_eq!(res, list(&[2, 3, 4]));
        let res = apply_all(&list(&[1, 2, 3, 4]), &[Patch::remove(path(["3"]))]).unwrap();
        assert_eq!(res, list(&[1, 2, 3]));
    }

    #[test]
    fn test_replace_in_place() {
        let res = apply_all(&list(&[1, 2, 3]), &[Patch::replace(path(["0"]), 10)]).unwrap();
        assert_eq!(res, list(&[10, 2, 3]));
    }

    #[test]
    fn test_gap_strict_and_lenient() {
        let patches = [Patch::add(path(["5"]), 1)];
        assert_eq!(
            apply_all(&list(&[0]), &patches).unwrap_err(),
            PatchError::IndexOutOfBounds {
                path: path(["5"]),
                index: 5,
                len: 1
            }
        );
        let res = apply_all_with(&list(&[0]), &patches, &ApplyOptions::lenient()).unwrap();
        assert_eq!(
            res,
            Value::array([
                Value::from(0),
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::from(1)
            ])
        );
    }

    #[test]
    fn test_vivify_in_gap_lenient() {
        let res = apply_all_with(
            &Value::empty_array(),
            &[Patch::add(path(["1", "a"]), 1)],
            &ApplyOptions::lenient(),
        )
        .unwrap();
        assert_eq!(res, Value::array([Value::Null, Value::map([("a", 1)])]));
    }

    #[test]
    fn test_replace_and_remove_out_of_bounds() {
        let value = list(&[1, 2]);
        assert!(matches!(
            apply_all(&value, &[Patch::replace(path(["2"]), 3)]),
            Err(PatchError::IndexOutOfBounds { index: 2, len: 2, .. })
        ));
        assert!(matches!(
            apply_all(&value, &[Patch::remove(path(["7"]))]),
            Err(PatchError::IndexOutOfBounds { index: 7, len: 2, .. })
        ));
        let lenient = ApplyOptions::lenient();
        assert_eq!(
            apply_all_with(&value, &[Patch::replace(path(["2"]), 3)], &lenient).unwrap(),
            list(&[1, 2, 3])
        );
        assert_eq!(
            apply_all_with(&value, &[Patch::remove(path(["7"]))], &lenient).unwrap(),
            value
        );
    }

    #[test]
    fn test_lenient_gap_is_bounded() {
        let lenient = ApplyOptions::lenient().with_max_gap(2);
        let res = apply_all_with(&list(&[0]), &[Patch::add(path(["3"]), 1)], &lenient).unwrap();
        assert_eq!(
            res,
            Value::array([Value::from(0), Value::Null, Value::Null, Value::from(1)])
        );
        assert_eq!(
            apply_all_with(&list(&[0]), &[Patch::add(path(["4"]), 1)], &lenient).unwrap_err(),
            PatchError::IndexOutOfBounds {
                path: path(["4"]),
                index: 4,
                len: 1
            }
        );
        assert!(matches!(
            apply_all_with(
                &Value::empty_array(),
                &[Patch::add(path(["18446744073709551615"]), 1)],
                &ApplyOptions::lenient(),
            ),
            Err(PatchError::IndexOutOfBounds { len: 0, .. })
        ));
        assert!(matches!(
            apply_all_with(
                &Value::empty_array(),
                &[Patch::replace(path(["5000000", "a"]), 1)],
                &ApplyOptions::lenient(),
            ),
            Err(PatchError::IndexOutOfBounds { index: 5000000, .. })
        ));
    }

    #[test]
    fn test_remove_through_missing_index() {
        let value = list(&[1]);
        let patches = [Patch::remove(path(["2", "a"]))];
        assert!(matches!(
            apply_all(&value, &patches),
            Err(PatchError::IndexOutOfBounds { index: 2, len: 1, .. })
        ));
        let res = apply_all_with(&value, &patches, &ApplyOptions::lenient()).unwrap();
        assert_eq!(res, Value::array([Value::from(1), Value::Null, Value::Null]));
    }

    #[test]
    fn test_invalid_tokens() {
        let value = Value::map([("a", list(&[1]))]);
        assert_eq!(
            apply_all(&value, &[Patch::add(path(["a", "x"]), 1)]).unwrap_err(),
            PatchError::InvalidIndex {
                path: path(["a", "x"])
            }
        );
        assert_eq!(
            apply_all(&value, &[Patch::replace(path(["a", "-"]), 1)]).unwrap_err(),
            PatchError::AppendNotAllowed {
                path: path(["a", "-"])
            }
        );
        assert_eq!(
            apply_all(&value, &[Patch::add(path(["a", "-", "b"]), 1)]).unwrap_err(),
            PatchError::AppendNotAllowed {
                path: path(["a", "-"])
            }
        );
    }
}
