//! Element-span collection for `get_array_elements`
//!
//! A restricted walk that keeps every result a sub-slice of the input:
//! the chain may only descend through keys and single indexes, and its
//! terminal step must resolve to an array, whose selected element spans
//! are returned as a list.

use crate::ast::{StepFlags, StepNode};
use crate::error::{ErrorKind, JsonPathError, JsonPathResult};
use crate::filter::eval::filter_match;
use crate::skipper;

use super::array;

/// Reject chain shapes whose results could not be input sub-slices
pub(crate) fn validate_chain(step: &StepNode) -> JsonPathResult<()> {
    let mut cursor = Some(step);
    while let Some(node) = cursor {
        if node.is_wildcard() {
            return Err(JsonPathError::new(ErrorKind::WildcardsNotSupported));
        }
        if node.flags.contains(StepFlags::FUNCTION) || node.flags.contains(StepFlags::SUBJECT) {
            return Err(JsonPathError::new(ErrorKind::FunctionsNotSupported));
        }
        let terminal = node.flags.contains(StepFlags::TERMINAL) || node.next.is_none();
        if terminal {
            if node.flags.contains(StepFlags::ARRAY) && !node.flags.contains(StepFlags::RANGED) {
                // a single index selects one element, not an array
                return Err(JsonPathError::new(ErrorKind::TerminalNodeArray));
            }
            if !node.keys.is_empty() {
                return Err(JsonPathError::new(ErrorKind::TerminalNodeArray));
            }
        } else if node.flags.contains(StepFlags::AGGREGATING) {
            return Err(JsonPathError::new(ErrorKind::SubSlicingNotSupported));
        }
        cursor = node.next.as_deref();
    }
    Ok(())
}

/// Walk the chain and push the selected terminal element spans
pub(crate) fn collect_elements<'a>(
    input: &'a [u8],
    step: &StepNode,
    out: &mut Vec<&'a [u8]>,
) -> JsonPathResult<()> {
    let start = match skipper::skip_spaces(input, 0) {
        Ok(i) => i,
        Err(_) => input.len(),
    };
    let input = &input[start..];
    skipper::looks_like_json(input)?;

    let input = if step.has_lookup_key() {
        super::find_key_value(input, step)?
    } else {
        input
    };

    let terminal = step.flags.contains(StepFlags::TERMINAL) || step.next.is_none();
    if terminal {
        if input.is_empty() || input[0] != b'[' {
            return Err(JsonPathError::new(ErrorKind::ArrayExpected));
        }
        let spans = skipper::array_scan(input)?;
        if let Some(filter) = step.filter.as_ref() {
            for span in spans {
                let elem = &input[span.start..span.end];
                if filter_match(elem, filter)? {
                    out.push(elem);
                }
            }
        } else if !step.elems.is_empty() {
            let n = spans.len() as i64;
            for &w in &step.elems {
                let idx = if w < 0 { w as i64 + n } else { w as i64 };
                if idx < 0 || idx >= n {
                    return Err(JsonPathError::new(ErrorKind::ArrayElementNotFound));
                }
                let span = spans[idx as usize];
                out.push(&input[span.start..span.end]);
            }
        } else if step.flags.contains(StepFlags::RANGED) {
            if let Some((a, b)) = array::adjust_bounds(step.left, step.right, spans.len())? {
                for span in &spans[a..=b] {
                    out.push(&input[span.start..span.end]);
                }
            }
        } else {
            for span in spans {
                out.push(&input[span.start..span.end]);
            }
        }
        return Ok(());
    }

    let Some(next) = step.next.as_deref() else {
        return Ok(());
    };
    if step.flags.contains(StepFlags::ARRAY) {
        if input[0] != b'[' {
            return Err(JsonPathError::new(ErrorKind::ArrayExpected));
        }
        let elem = array::select_single(input, step.left)?;
        return collect_elements(elem, next, out);
    }
    collect_elements(input, next, out)
}
