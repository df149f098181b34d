//! Recursive step parsing
//!
//! Reads one path segment at a time: the key (or wildcard), the segment
//! kind (bracket form, function application, dotted descent), then
//! recurses for the rest of the query. Also used by the filter parser to
//! compile sub-paths rooted at `@` or `$`, which end at the first
//! operator or closing-parenthesis byte.

use crate::ast::{StepFlags, StepNode};
use crate::error::{ErrorKind, JsonPathError, JsonPathResult};

/// Bytes that end a key identifier
const KEY_TERMINATORS: &[u8] = b" \t.[()]<=>+-*/&|";

/// Bytes that end a whole path when met at a step boundary
const PATH_TERMINATORS: &[u8] = b" \t<=>+-*/)&|";

/// Parse the step starting at `i` and, recursively, every step after it
///
/// Returns the head of the parsed sub-chain and the offset one past the
/// last byte consumed. The chain ends either at the end of the query or
/// at a path-terminator byte (inside filter expressions).
pub(crate) fn parse_step(path: &[u8], mut i: usize) -> JsonPathResult<(Box<StepNode>, usize)> {
    let l = path.len();
    if i >= l {
        return Err(JsonPathError::parse(ErrorKind::PathUnexpectedEnd, i));
    }

    let start = i;
    if path[i] == b'*' {
        i += 1;
    } else {
        while i < l && !KEY_TERMINATORS.contains(&path[i]) {
            i += 1;
        }
    }

    let mut node = Box::new(StepNode::new());
    node.key = path[start..i].to_vec();

    if i == l {
        node.flags.insert(StepFlags::TERMINAL);
        return Ok((node, i));
    }

    let done = node_type(path, &mut i, &mut node)?;
    let tail = normalize_keys(&mut node);

    if let Some(mut tail) = tail {
        if !done {
            let (next, j) = parse_step(path, i)?;
            i = j;
            attach_next(&mut tail, next);
        }
        node.next = Some(tail);
    } else if !done {
        let (next, j) = parse_step(path, i)?;
        i = j;
        attach_next(&mut node, next);
    }
    Ok((node, i))
}

/// Link a parsed successor onto `node`
///
/// A key-less bracket segment directly after a folded single-key lookup
/// (`['book'][1]`) merges into that lookup's step, so the chain shape
/// matches the single-segment spelling `book[1]`. Otherwise the
/// successor is chained, tagging `node` as the function subject when the
/// successor is a function step.
fn attach_next(node: &mut StepNode, next: Box<StepNode>) {
    if node.has_lookup_key()
        && node.keys.is_empty()
        && !node.flags.contains(StepFlags::ARRAY)
        && node.filter.is_none()
        && next.key.is_empty()
        && next.keys.is_empty()
        && next.flags.contains(StepFlags::ARRAY)
    {
        let next = *next;
        node.flags.insert(next.flags);
        node.left = next.left;
        node.right = next.right;
        node.elems = next.elems;
        node.filter = next.filter;
        node.next = next.next;
        return;
    }
    if next.flags.contains(StepFlags::FUNCTION) {
        node.flags.insert(StepFlags::SUBJECT);
    }
    node.next = Some(next);
}

/// Classify the segment following the key and fill in the node
///
/// Returns `true` when the chain ends at this step (end of query,
/// path-terminator byte, or a function segment).
fn node_type(path: &[u8], i: &mut usize, node: &mut StepNode) -> JsonPathResult<bool> {
    let l = path.len();
    if path[*i] == b'(' && *i + 1 < l && path[*i + 1] == b')' {
        return detect_function(path, i, node);
    }
    if path[*i] == b'[' {
        super::bracket::parse_bracket(path, i, node)?;
        if node.flags.contains(StepFlags::TERMINAL) {
            return Ok(true);
        }
    }
    let ch = path[*i];
    if PATH_TERMINATORS.contains(&ch) {
        node.flags.insert(StepFlags::TERMINAL);
        return Ok(true);
    }
    if ch == b'.' {
        *i += 1;
        if *i == l {
            return Err(JsonPathError::parse(ErrorKind::PathUnexpectedEnd, *i));
        }
        if path[*i] == b'.' {
            node.flags.insert(StepFlags::DEEP);
            *i += 1;
        }
    } else if ch != b'[' {
        return Err(JsonPathError::parse(ErrorKind::PathInvalidReference, *i));
    }
    Ok(false)
}

/// Recognize a `name()` function segment
///
/// The step's own key is the function name; only `length`, `count` and
/// `size` are known, case-insensitive.
fn detect_function(path: &[u8], i: &mut usize, node: &mut StepNode) -> JsonPathResult<bool> {
    let known = [&b"length"[..], b"count", b"size"]
        .iter()
        .any(|f| node.key.eq_ignore_ascii_case(f));
    if !known {
        return Err(JsonPathError::parse(ErrorKind::PathUnknownFunction, *i));
    }
    node.flags.insert(StepFlags::FUNCTION);
    *i += 2;
    if *i == path.len() {
        node.flags.insert(StepFlags::TERMINAL);
    }
    Ok(true)
}

/// Settle a bracket key list onto the right node
///
/// A single quoted key is an ordinary child lookup: `['a']` folds into
/// the step's own key when the segment had none, and otherwise becomes a
/// plain child step after the lookup key. A multi-key list harvests into
/// a synthesized array; combined with a preceding key it splits into two
/// linked nodes so that downstream steps apply per harvested value.
fn normalize_keys(node: &mut StepNode) -> Option<Box<StepNode>> {
    if node.keys.is_empty() {
        return None;
    }
    if node.key.is_empty() {
        if node.keys.len() == 1 {
            if let Some(key) = node.keys.pop() {
                node.key = key;
            }
        } else {
            node.flags.insert(StepFlags::AGGREGATING);
        }
        return None;
    }

    let mut tail = Box::new(StepNode::new());
    if node.keys.len() == 1 {
        if let Some(key) = node.keys.pop() {
            tail.key = key;
        }
    } else {
        tail.keys = std::mem::take(&mut node.keys);
        tail.flags.insert(StepFlags::AGGREGATING);
    }
    node.keys.clear();
    if node.flags.contains(StepFlags::TERMINAL) {
        node.flags.remove(StepFlags::TERMINAL);
        tail.flags.insert(StepFlags::TERMINAL);
    }
    Some(tail)
}

/// Read an optional signed integer
///
/// Returns `None` without consuming anything when no digits are present.
pub(crate) fn read_int(path: &[u8], i: usize) -> (Option<i32>, usize) {
    let l = path.len();
    let start = i;
    let mut i = i;
    let mut sign = 1i32;
    if i < l && path[i] == b'-' {
        sign = -1;
        i += 1;
    }
    let digits = i;
    let mut num = 0i32;
    while i < l && path[i].is_ascii_digit() {
        num = num.saturating_mul(10).saturating_add((path[i] - b'0') as i32);
        i += 1;
    }
    if i == digits {
        return (None, start);
    }
    (Some(sign * num), i)
}
