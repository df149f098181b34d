//! Array step operations
//!
//! Selection of array elements by index, range, explicit list, or filter
//! predicate. A plain single index walks elements linearly and returns a
//! sub-slice; every other form scans the element spans first and
//! synthesizes a `[...]` result.

use std::borrow::Cow;

use crate::ast::{FilterExpr, StepFlags, StepNode};
use crate::error::{ErrorKind, JsonPathError, JsonPathResult};
use crate::filter::eval::filter_match;
use crate::skipper::{self, ElemSpan};

/// Select element(s) of the array at `input[0] == '['` by the step's
/// bounds, list or filter
pub(crate) fn slice_array<'a>(
    input: &'a [u8],
    step: &StepNode,
) -> JsonPathResult<Cow<'a, [u8]>> {
    if input[0] != b'[' {
        return Err(JsonPathError::new(ErrorKind::ArrayExpected));
    }
    if !step.flags.contains(StepFlags::RANGED) {
        return select_single(input, step.left).map(Cow::Borrowed);
    }
    if let Some(filter) = step.filter.as_ref() {
        return filtered_elements(input, filter).map(Cow::Owned);
    }

    // fullscan
    let elems = skipper::array_scan(input)?;
    if !step.elems.is_empty() {
        return listed_elements(input, &elems, &step.elems).map(Cow::Owned);
    }
    match adjust_bounds(step.left, step.right, elems.len())? {
        Some((a, b)) => {
            let mut out = Vec::with_capacity(elems[b].end - elems[a].start + 2);
            out.push(b'[');
            out.extend_from_slice(&input[elems[a].start..elems[b].end]);
            out.push(b']');
            Ok(Cow::Owned(out))
        }
        None => Ok(Cow::Owned(b"[]".to_vec())),
    }
}

/// Select one element by index
///
/// A non-negative index advances element by element and stops at the
/// target; a negative index scans the whole array to resolve against
/// the element count.
pub(crate) fn select_single(input: &[u8], index: i32) -> JsonPathResult<&[u8]> {
    if index >= 0 {
        let target = index as usize;
        let l = input.len();
        let mut i = skipper::skip_spaces(input, 1)?;
        let mut ielem = 0usize;
        while i < l && input[i] != b']' {
            let end = skipper::skip_value(input, i)?;
            if ielem == target {
                return Ok(&input[i..end]);
            }
            i = skipper::skip_spaces(input, end)?;
            ielem += 1;
        }
        return Err(JsonPathError::new(ErrorKind::ArrayElementNotFound));
    }
    let elems = skipper::array_scan(input)?;
    let resolved = index as i64 + elems.len() as i64;
    if resolved < 0 {
        return Err(JsonPathError::new(ErrorKind::ArrayElementNotFound));
    }
    let span = elems[resolved as usize];
    Ok(&input[span.start..span.end])
}

/// Join the spans named by an explicit index list, end-relative entries
/// resolved against the element count
fn listed_elements(
    input: &[u8],
    spans: &[ElemSpan],
    wanted: &[i32],
) -> JsonPathResult<Vec<u8>> {
    let n = spans.len() as i64;
    let mut out = vec![b'['];
    for &w in wanted {
        let idx = if w < 0 { w as i64 + n } else { w as i64 };
        if idx < 0 || idx >= n {
            return Err(JsonPathError::new(ErrorKind::ArrayElementNotFound));
        }
        let span = spans[idx as usize];
        if out.len() > 1 {
            out.push(b',');
        }
        out.extend_from_slice(&input[span.start..span.end]);
    }
    out.push(b']');
    Ok(out)
}

/// Scan element by element, emitting the spans the predicate accepts
pub(crate) fn filtered_elements(
    input: &[u8],
    filter: &FilterExpr,
) -> JsonPathResult<Vec<u8>> {
    let l = input.len();
    let mut out = vec![b'['];
    let mut i = skipper::skip_spaces(input, 1)?;
    while i < l && input[i] != b']' {
        let end = skipper::skip_value(input, i)?;
        if filter_match(&input[i..end], filter)? {
            if out.len() > 1 {
                out.push(b',');
            }
            out.extend_from_slice(&input[i..end]);
        }
        i = skipper::skip_spaces(input, end)?;
    }
    out.push(b']');
    Ok(out)
}

/// Resolve range bounds against the element count
///
/// Returns the inclusive `(first, last)` element indexes, or `None` for
/// an empty selection (empty array, explicit right bound 0, inverted
/// range). Bounds that resolve outside the array are an error.
pub(crate) fn adjust_bounds(
    left: i32,
    right: Option<i32>,
    n: usize,
) -> JsonPathResult<Option<(usize, usize)>> {
    let n = n as i64;
    if n == 0 {
        return Ok(None);
    }
    let mut a = left as i64;
    let mut b = match right {
        None => n,
        Some(r) => r as i64,
    };
    if a < 0 {
        a += n;
    }
    if b < 0 {
        b += n;
    }
    if a < 0 || a >= n || b < 0 || b > n {
        return Err(JsonPathError::new(ErrorKind::ArrayElementNotFound));
    }
    if b <= a {
        return Ok(None);
    }
    Ok(Some((a as usize, (b - 1) as usize)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_resolve_negatives() {
        assert_eq!(adjust_bounds(0, None, 4).expect("ok"), Some((0, 3)));
        assert_eq!(adjust_bounds(-2, None, 4).expect("ok"), Some((2, 3)));
        assert_eq!(adjust_bounds(1, Some(-1), 4).expect("ok"), Some((1, 2)));
    }

    #[test]
    fn bounds_empty_cases() {
        assert_eq!(adjust_bounds(0, Some(3), 0).expect("ok"), None);
        assert_eq!(adjust_bounds(0, Some(0), 4).expect("ok"), None);
        assert_eq!(adjust_bounds(2, Some(2), 4).expect("ok"), None);
    }

    #[test]
    fn bounds_out_of_range() {
        assert_eq!(
            adjust_bounds(0, Some(9), 4).map_err(|e| e.kind()),
            Err(ErrorKind::ArrayElementNotFound)
        );
        assert_eq!(
            adjust_bounds(-5, None, 4).map_err(|e| e.kind()),
            Err(ErrorKind::ArrayElementNotFound)
        );
    }
}
