//! Bracket segment parsing
//!
//! The leading byte inside `[` selects the form: `'` starts a quoted key
//! list, `?(` starts a filter predicate, anything else is an integer
//! expression (single index, `a:b` range, or `a,b,c` index list). Every
//! form except the single index marks the step ranged and aggregating.

use crate::ast::{StepFlags, StepNode};
use crate::error::{ErrorKind, JsonPathError, JsonPathResult};
use crate::filter::parser as filter_parser;

use super::steps::read_int;

/// Parse one `[...]` segment into `node`, leaving `i` one past the `]`
pub(crate) fn parse_bracket(
    path: &[u8],
    i: &mut usize,
    node: &mut StepNode,
) -> JsonPathResult<()> {
    let l = path.len();
    *i += 1; // [
    if *i < l && path[*i] == b'\'' {
        return parse_key_list(path, i, node);
    }
    node.flags.insert(StepFlags::ARRAY);
    if *i + 1 < l && path[*i] == b'?' && path[*i + 1] == b'(' {
        node.flags.insert(StepFlags::RANGED | StepFlags::AGGREGATING);
        let (expr, close) = filter_parser::parse(path, *i + 2)?;
        node.filter = Some(expr);
        *i = close + 1; // )
    } else {
        read_array_index(path, i, node)?;
    }
    if *i >= l || path[*i] != b']' {
        return Err(JsonPathError::parse(ErrorKind::PathIndexBoundMissing, *i));
    }
    *i += 1; // ]
    if *i == l {
        node.flags.insert(StepFlags::TERMINAL);
    }
    Ok(())
}

/// Parse a `'a','b',...` quoted key list up to and including the `]`
fn parse_key_list(path: &[u8], i: &mut usize, node: &mut StepNode) -> JsonPathResult<()> {
    let l = path.len();
    while *i < l && path[*i] != b']' {
        *i += 1; // opening '
        let s = *i;
        while *i < l && path[*i] != b'\'' {
            *i += 1;
        }
        if *i == l {
            return Err(JsonPathError::parse(ErrorKind::PathKeyListTerminated, *i));
        }
        node.keys.push(path[s..*i].to_vec());
        *i += 1; // closing '
        while *i < l && path[*i] != b'\'' && path[*i] != b']' {
            *i += 1;
        }
    }
    if *i == l {
        return Err(JsonPathError::parse(ErrorKind::PathKeyListTerminated, *i));
    }
    *i += 1; // ]
    if *i == l {
        node.flags.insert(StepFlags::TERMINAL);
    }
    Ok(())
}

/// Parse the integer bracket forms: `[i]`, `[a:b]`, `[i,j,k]`
///
/// An explicit right bound of 0 is only meaningful with an empty or
/// non-positive left slot (`[:0]` selects nothing); `[a:0]` with a
/// positive `a` is rejected as nonsense.
fn read_array_index(path: &[u8], i: &mut usize, node: &mut StepNode) -> JsonPathResult<()> {
    let l = path.len();
    let (left, j) = read_int(path, *i);
    if j == l || !matches!(path[j], b':' | b',' | b']') {
        return Err(JsonPathError::parse(ErrorKind::PathIndexBoundMissing, j));
    }
    let left_explicit = left.is_some();
    node.left = left.unwrap_or(0);
    *i = j;

    match path[*i] {
        b']' => {
            // single index; an empty bracket has no index to select by
            if !left_explicit {
                return Err(JsonPathError::parse(ErrorKind::PathIndexBoundMissing, *i));
            }
        }
        b',' => {
            if !left_explicit {
                return Err(JsonPathError::parse(ErrorKind::PathIndexBoundMissing, *i));
            }
            node.flags.insert(StepFlags::RANGED | StepFlags::AGGREGATING);
            node.elems.push(node.left);
            while *i < l && path[*i] != b']' {
                *i += 1; // comma
                let (elem, j) = read_int(path, *i);
                match elem {
                    Some(e) => {
                        node.elems.push(e);
                        *i = j;
                    }
                    None => {
                        return Err(JsonPathError::parse(
                            ErrorKind::PathIndexBoundMissing,
                            *i,
                        ));
                    }
                }
            }
        }
        b':' => {
            node.flags.insert(StepFlags::RANGED | StepFlags::AGGREGATING);
            *i += 1;
            let (right, j) = read_int(path, *i);
            if let Some(r) = right {
                if r == 0 && left_explicit && node.left > 0 {
                    return Err(JsonPathError::parse(ErrorKind::PathIndexNonsense, *i));
                }
                node.right = Some(r);
                *i = j;
            }
        }
        _ => {
            return Err(JsonPathError::parse(ErrorKind::PathIndexBoundMissing, *i));
        }
    }
    Ok(())
}
