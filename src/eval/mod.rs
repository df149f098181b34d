//! Streaming path evaluator
//!
//! Walks the raw JSON bytes in lockstep with the compiled step chain,
//! using the skipper to advance past values without parsing them. The
//! result is a sub-slice of the input wherever possible; only
//! aggregating steps (wildcards, ranges, lists, filters) synthesize a
//! fresh `[...]` byte sequence from non-contiguous fragments.

pub(crate) mod array;
pub(crate) mod elements;
pub(crate) mod functions;

use std::borrow::Cow;

use crate::ast::{FilterToken, Operand, OperandValue, StepFlags, StepNode};
use crate::error::{ErrorKind, JsonPathError, JsonPathResult};
use crate::filter::eval::decode_value;
use crate::skipper;

/// A per-element miss inside wildcard, filter and aggregation iteration
/// is recovery, not failure; every other error aborts the query
#[inline]
fn recoverable(err: JsonPathError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::FieldNotFound | ErrorKind::ArrayElementNotFound
    )
}

/// Evaluate the chain starting at `step` against `input`
///
/// `input` must begin (after whitespace) with `{` or `[`.
pub(crate) fn get_value<'a>(
    input: &'a [u8],
    step: &StepNode,
) -> JsonPathResult<Cow<'a, [u8]>> {
    let start = match skipper::skip_spaces(input, 0) {
        Ok(i) => i,
        Err(_) => input.len(),
    };
    let input = &input[start..];
    skipper::looks_like_json(input)?;

    if step.is_wildcard() {
        return wild_scan(input, step);
    }
    if !step.keys.is_empty() {
        let harvested = harvest_keys(input, &step.keys)?;
        return finish_aggregate(harvested, step);
    }
    let input = if step.has_lookup_key() {
        find_key_value(input, step)?
    } else {
        input
    };

    check_value_type(input, step)?;

    // here we are at the beginning of the value

    if step.flags.contains(StepFlags::SUBJECT)
        && let Some(func) = step.next.as_deref()
    {
        return functions::apply_function(input, func).map(Cow::Owned);
    }
    if step.flags.contains(StepFlags::TERMINAL) {
        return term_value(input, step);
    }
    if step.flags.contains(StepFlags::ARRAY) {
        let sliced = array::slice_array(input, step)?;
        let Some(next) = step.next.as_deref() else {
            return Ok(sliced);
        };
        if step.flags.contains(StepFlags::AGGREGATING) {
            return Ok(Cow::Owned(get_nodes(&sliced, next)?));
        }
        return match sliced {
            Cow::Borrowed(elem) => get_value(elem, next),
            Cow::Owned(elem) => get_value(&elem, next).map(|v| Cow::Owned(v.into_owned())),
        };
    }
    match step.next.as_deref() {
        Some(next) => get_value(input, next),
        None => term_value(input, step),
    }
}

/// Expand a `*` step over every object field or array element
///
/// Terminal wildcards emit each value; otherwise the rest of the chain
/// is applied per value, and elements that do not match are dropped.
fn wild_scan<'a>(input: &'a [u8], step: &StepNode) -> JsonPathResult<Cow<'a, [u8]>> {
    let mut out: Vec<u8> = vec![b'['];
    if input[0] == b'{' {
        let l = input.len();
        let mut i = 1;
        loop {
            while i < l && input[i] != b'"' && input[i] != b'}' {
                i += 1;
            }
            if i >= l || input[i] == b'}' {
                break;
            }
            let after_key = skipper::skip_string(input, i)?;
            i = skipper::seek_to_value(input, after_key)?;
            let end = skipper::skip_value(input, i)?;
            append_wild_element(&input[i..end], step, &mut out)?;
            i = skipper::skip_spaces(input, end)?;
        }
    } else {
        for span in skipper::array_scan(input)? {
            append_wild_element(&input[span.start..span.end], step, &mut out)?;
        }
    }
    out.push(b']');
    Ok(Cow::Owned(out))
}

/// Apply the wildcard step to one value, appending any match to `out`
fn append_wild_element(
    value: &[u8],
    step: &StepNode,
    out: &mut Vec<u8>,
) -> JsonPathResult<()> {
    let elem: Option<Vec<u8>> = if step.flags.contains(StepFlags::TERMINAL) {
        // any field type matches
        match term_value(value, step) {
            Ok(v) => Some(v.into_owned()),
            Err(e) if recoverable(e) => None,
            Err(e) => return Err(e),
        }
    } else {
        match (value[0], step.flags.contains(StepFlags::ARRAY), step.next.as_deref()) {
            (b'[', true, Some(next)) => wild_array_element(value, step, next)?,
            (b'{', false, Some(next)) => match get_value(value, next) {
                Ok(v) => Some(v.into_owned()),
                Err(e) if recoverable(e) => None,
                Err(e) => return Err(e),
            },
            _ => None,
        }
    };
    if let Some(elem) = elem
        && !elem.is_empty()
    {
        if out.len() > 1 {
            out.push(b',');
        }
        out.extend_from_slice(&elem);
    }
    Ok(())
}

/// Wildcard over an array-typed field: apply the step's own array
/// selection, then the rest of the chain
///
/// Aggregated results are spliced into the surrounding wildcard array
/// rather than nested.
fn wild_array_element(
    value: &[u8],
    step: &StepNode,
    next: &StepNode,
) -> JsonPathResult<Option<Vec<u8>>> {
    let sliced = match array::slice_array(value, step) {
        Ok(s) => s,
        Err(e) if recoverable(e) => return Ok(None),
        Err(e) => return Err(e),
    };
    if step.flags.contains(StepFlags::AGGREGATING) {
        let inner = get_nodes(&sliced, next)?;
        if inner.len() > 2 {
            return Ok(Some(inner[1..inner.len() - 1].to_vec()));
        }
        return Ok(None);
    }
    match get_value(&sliced, next) {
        Ok(v) => Ok(Some(v.into_owned())),
        Err(e) if recoverable(e) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Find the field named by the step and seek to its value
///
/// Key comparison folds ASCII case. Returns the rest of the buffer from
/// the value's first byte; the value is cut later, at the terminal step.
fn find_key_value<'a>(input: &'a [u8], step: &StepNode) -> JsonPathResult<&'a [u8]> {
    if input[0] != b'{' {
        return Err(JsonPathError::new(ErrorKind::ObjectExpected));
    }
    let l = input.len();
    let mut i = 1;
    loop {
        while i < l && input[i] != b'"' && input[i] != b'}' {
            i += 1;
        }
        if i >= l || input[i] == b'}' {
            break;
        }
        let key_start = i + 1;
        let after_key = skipper::skip_string(input, i)?;
        let key = &input[key_start..after_key - 1];
        i = skipper::seek_to_value(input, after_key)?;
        if step.key_matches(key) {
            return Ok(&input[i..]);
        }
        let end = skipper::skip_value(input, i)?;
        i = skipper::skip_spaces(input, end)?;
    }
    Err(JsonPathError::new(ErrorKind::FieldNotFound))
}

/// Collect the values of a `['a','b']` key list into a synthesized array
///
/// Output order follows the key list; the first occurrence of each key
/// wins; keys the object lacks are dropped.
fn harvest_keys(input: &[u8], keys: &[Vec<u8>]) -> JsonPathResult<Vec<u8>> {
    if input[0] != b'{' {
        return Err(JsonPathError::new(ErrorKind::ObjectExpected));
    }
    let l = input.len();
    let mut found: Vec<Option<skipper::ElemSpan>> = vec![None; keys.len()];
    let mut i = 1;
    loop {
        while i < l && input[i] != b'"' && input[i] != b'}' {
            i += 1;
        }
        if i >= l || input[i] == b'}' {
            break;
        }
        let key_start = i + 1;
        let after_key = skipper::skip_string(input, i)?;
        let key = &input[key_start..after_key - 1];
        i = skipper::seek_to_value(input, after_key)?;
        let end = skipper::skip_value(input, i)?;
        for (slot, wanted) in found.iter_mut().zip(keys) {
            if slot.is_none() && wanted.eq_ignore_ascii_case(key) {
                *slot = Some(skipper::ElemSpan { start: i, end });
            }
        }
        i = skipper::skip_spaces(input, end)?;
    }

    let mut out = vec![b'['];
    for span in found.into_iter().flatten() {
        if out.len() > 1 {
            out.push(b',');
        }
        out.extend_from_slice(&input[span.start..span.end]);
    }
    out.push(b']');
    Ok(out)
}

/// Route a harvested key-list array to the rest of the chain
fn finish_aggregate<'a>(
    harvested: Vec<u8>,
    step: &StepNode,
) -> JsonPathResult<Cow<'a, [u8]>> {
    match step.next.as_deref() {
        Some(func) if step.flags.contains(StepFlags::SUBJECT) => {
            functions::apply_function(&harvested, func).map(Cow::Owned)
        }
        Some(next) if !step.flags.contains(StepFlags::TERMINAL) => {
            Ok(Cow::Owned(get_nodes(&harvested, next)?))
        }
        _ => Ok(Cow::Owned(harvested)),
    }
}

/// Apply the rest of the chain to every element of an aggregate,
/// re-wrapping the per-element results in `[...]`
fn get_nodes(input: &[u8], step: &StepNode) -> JsonPathResult<Vec<u8>> {
    let mut out = vec![b'['];
    for span in skipper::array_scan(input)? {
        match get_value(&input[span.start..span.end], step) {
            Ok(value) => {
                if out.len() > 1 {
                    out.push(b',');
                }
                out.extend_from_slice(&value);
            }
            Err(e) if recoverable(e) => {}
            Err(e) => return Err(e),
        }
    }
    out.push(b']');
    Ok(out)
}

/// Cut the terminal value: the step's array selection, or one whole value
fn term_value<'a>(input: &'a [u8], step: &StepNode) -> JsonPathResult<Cow<'a, [u8]>> {
    if step.flags.contains(StepFlags::ARRAY) {
        return array::slice_array(input, step);
    }
    let end = skipper::skip_value(input, 0)?;
    Ok(Cow::Borrowed(&input[..end]))
}

/// Verify the located value has the shape the step needs to descend into
fn check_value_type(input: &[u8], step: &StepNode) -> JsonPathResult<()> {
    if input.len() < 2 {
        return Err(JsonPathError::new(ErrorKind::UnexpectedEnd));
    }
    if step.flags.contains(StepFlags::SUBJECT) || step.flags.contains(StepFlags::TERMINAL) {
        return Ok(());
    }
    let ch = input[0];
    if step.flags.contains(StepFlags::ARRAY) {
        if ch != b'[' {
            return Err(JsonPathError::new(ErrorKind::ArrayExpected));
        }
    } else if ch != b'{' {
        return Err(JsonPathError::new(ErrorKind::ObjectExpected));
    }
    Ok(())
}

/// Freeze every `$`-rooted filter operand in the chain to a literal
///
/// Root-relative operands are resolved once against the document before
/// any scanning begins, so filters over long arrays stay linear. A
/// failed resolution freezes to `Missing`.
pub(crate) fn resolve_root_operands(step: &mut StepNode, input: &[u8]) {
    let mut cursor = Some(step);
    while let Some(node) = cursor {
        if let Some(filter) = node.filter.as_mut() {
            for token in &mut filter.tokens {
                if let FilterToken::Operand(operand) = token
                    && let Operand::Path(chain) = operand
                    && chain.key == b"$"
                {
                    let frozen = match get_value(input, chain.as_ref()) {
                        Ok(bytes) => decode_value(&bytes),
                        Err(_) => OperandValue::Missing,
                    };
                    tracing::debug!(
                        target: "sliq::eval",
                        value = ?frozen,
                        "froze root-relative filter operand"
                    );
                    *operand = Operand::Literal(frozen);
                }
            }
        }
        cursor = node.next.as_deref_mut();
    }
}
