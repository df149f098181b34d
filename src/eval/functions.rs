//! Function step application
//!
//! `length()` and `count()` report the element count of an array or the
//! byte length of a string's quoted span; `size()` reports the raw byte
//! length of any value's span, braces and quotes included. Results are
//! decimal ASCII bytes.

use crate::ast::StepNode;
use crate::error::{ErrorKind, JsonPathError, JsonPathResult};
use crate::skipper;

/// Apply the function step to the subject value at `input[0]`
pub(crate) fn apply_function(input: &[u8], func: &StepNode) -> JsonPathResult<Vec<u8>> {
    if input.is_empty() {
        return Err(JsonPathError::new(ErrorKind::UnexpectedEnd));
    }
    let result = if func.key.eq_ignore_ascii_case(b"size") {
        skipper::skip_value(input, 0)?
    } else {
        match input[0] {
            b'"' => skipper::skip_string(input, 0)?,
            b'[' => skipper::array_scan(input)?.len(),
            _ => return Err(JsonPathError::new(ErrorKind::InvalidLengthUsage)),
        }
    };
    Ok(result.to_string().into_bytes())
}
