//! Token-aware value skimmer
//!
//! Byte-level primitives that advance past one JSON value without parsing
//! it into a value model. The skipper is JSON-structure-aware but
//! non-validating: it assumes well-formed input beyond the bytes it has
//! to inspect to find a value boundary. Commas count as whitespace so
//! callers can traverse array element boundaries uniformly.

use crate::error::{ErrorKind, JsonPathError, JsonPathResult};

/// Byte offsets of one array element within the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElemSpan {
    /// Offset of the element's first byte
    pub start: usize,
    /// Offset one past the element's last byte
    pub end: usize,
}

/// Advance past whitespace and commas, returning the offset of the next
/// significant byte
///
/// # Errors
/// `UnexpectedEnd` when only skippable bytes remain.
#[inline]
pub fn skip_spaces(input: &[u8], mut i: usize) -> JsonPathResult<usize> {
    let l = input.len();
    while i < l && matches!(input[i], b' ' | b',' | b'\t' | b'\r' | b'\n') {
        i += 1;
    }
    if i == l {
        return Err(JsonPathError::new(ErrorKind::UnexpectedEnd));
    }
    Ok(i)
}

/// Return the offset immediately after the value starting at or after `i`
///
/// Leading whitespace and commas are allowed. Dispatches on the first
/// significant byte: string, object/array, number, or bare keyword.
///
/// # Errors
/// `UnexpectedEnd` when the input terminates mid-value,
/// `UnrecognizedValue` when a bare token is not `true`, `false` or `null`.
pub fn skip_value(input: &[u8], i: usize) -> JsonPathResult<usize> {
    let i = skip_spaces(input, i)?;
    match input[i] {
        b'"' => skip_string(input, i),
        b'{' | b'[' => skip_object(input, i),
        b'0'..=b'9' | b'-' | b'.' => Ok(skip_number(input, i)),
        _ => skip_bool_null(input, i),
    }
}

/// Consume a JSON string starting at the quote at `i`
///
/// A backslash immediately before the closing quote does not terminate
/// the string; escapes are otherwise left uninterpreted.
pub fn skip_string(input: &[u8], i: usize) -> JsonPathResult<usize> {
    let bound = input[i];
    let mut prev = bound;
    let mut i = i + 1;
    let l = input.len();
    while i < l {
        let ch = input[i];
        i += 1;
        if ch == bound && prev != b'\\' {
            return Ok(i);
        }
        prev = ch;
    }
    Err(JsonPathError::new(ErrorKind::UnexpectedEnd))
}

/// Consume a balanced `{...}` or `[...]` starting at `i`, respecting
/// string interiors and the one-level escape rule
pub fn skip_object(input: &[u8], i: usize) -> JsonPathResult<usize> {
    let l = input.len();
    let mark = input[i];
    let unmark = mark + 2; // '{' -> '}', '[' -> ']'
    let mut nested = 0u32;
    let mut instr = false;
    let mut prev = mark;
    let mut i = i + 1;
    while i < l {
        let ch = input[i];
        if ch == unmark && nested == 0 && !instr {
            return Ok(i + 1);
        }
        if ch == b'"' {
            if prev != b'\\' {
                instr = !instr;
            }
        } else if !instr {
            if ch == mark {
                nested += 1;
            } else if ch == unmark {
                nested -= 1;
            }
        }
        prev = ch;
        i += 1;
    }
    Err(JsonPathError::new(ErrorKind::UnexpectedEnd))
}

/// Greedily consume number bytes (`[0-9.\-Ee]`), no structural validation
#[inline]
#[must_use]
pub fn skip_number(input: &[u8], mut i: usize) -> usize {
    let l = input.len();
    while i < l && matches!(input[i], b'0'..=b'9' | b'.' | b'-' | b'E' | b'e') {
        i += 1;
    }
    i
}

/// Consume a bare `true`, `false` or `null` keyword
pub fn skip_bool_null(input: &[u8], i: usize) -> JsonPathResult<usize> {
    for needle in [&b"true"[..], b"false", b"null"] {
        if input[i..].starts_with(needle) {
            return Ok(i + needle.len());
        }
    }
    Err(JsonPathError::new(ErrorKind::UnrecognizedValue))
}

/// From just past an object key, advance over the `:` separator to the
/// first byte of the field's value
///
/// # Errors
/// `ColonExpected` when the next significant byte is not `:`.
pub fn seek_to_value(input: &[u8], i: usize) -> JsonPathResult<usize> {
    let i = skip_spaces(input, i)?;
    if input[i] != b':' {
        return Err(JsonPathError::new(ErrorKind::ColonExpected));
    }
    skip_spaces(input, i + 1)
}

/// Scan the array starting at `input[0] == '['` and return the span of
/// every element
///
/// Spans are value-exact: surrounding whitespace and commas are excluded.
pub fn array_scan(input: &[u8]) -> JsonPathResult<Vec<ElemSpan>> {
    let l = input.len();
    let mut elems = Vec::with_capacity(32);
    let mut i = skip_spaces(input, 1)?;
    while i < l && input[i] != b']' {
        let e = skip_value(input, i)?;
        elems.push(ElemSpan { start: i, end: e });
        i = skip_spaces(input, e)?;
    }
    Ok(elems)
}

/// Reject input that cannot be traversed: it must begin with `{` or `[`
#[inline]
pub fn looks_like_json(input: &[u8]) -> JsonPathResult<()> {
    if input.is_empty() {
        return Err(JsonPathError::new(ErrorKind::UnexpectedEnd));
    }
    if input[0] != b'{' && input[0] != b'[' {
        return Err(JsonPathError::new(ErrorKind::ObjectOrArrayExpected));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_scalars() {
        assert_eq!(skip_value(b"  42,", 0), Ok(4));
        assert_eq!(skip_value(b"-1.5e3]", 0), Ok(6));
        assert_eq!(skip_value(b"true}", 0), Ok(4));
        assert_eq!(skip_value(b"null ", 0), Ok(4));
    }

    #[test]
    fn skips_strings_with_escapes() {
        assert_eq!(skip_value(br#""plain" "#, 0), Ok(7));
        assert_eq!(skip_value(br#""a\"b":1"#, 0), Ok(6));
        assert_eq!(skip_value(br#""br ] ace}""#, 0), Ok(11));
    }

    #[test]
    fn skips_nested_containers() {
        let buf = br#"{"a":[1,{"b":"]"}],"c":2},"tail""#;
        assert_eq!(skip_value(buf, 0), Ok(25));
        assert_eq!(skip_value(b"[[],[[]]] ", 0), Ok(9));
    }

    #[test]
    fn commas_are_whitespace() {
        assert_eq!(skip_spaces(b",, \t1", 0), Ok(4));
    }

    #[test]
    fn rejects_bare_garbage() {
        assert_eq!(
            skip_value(b"verdad", 0).map_err(|e| e.kind()),
            Err(ErrorKind::UnrecognizedValue)
        );
    }

    #[test]
    fn rejects_truncation() {
        assert_eq!(
            skip_value(br#"{"a":1"#, 0).map_err(|e| e.kind()),
            Err(ErrorKind::UnexpectedEnd)
        );
        assert_eq!(
            skip_value(br#""open"#, 0).map_err(|e| e.kind()),
            Err(ErrorKind::UnexpectedEnd)
        );
    }

    #[test]
    fn scans_element_spans() {
        let buf = b"[1, \"two\" ,[3]]";
        let spans = array_scan(buf).expect("scan");
        let got: Vec<&[u8]> = spans.iter().map(|s| &buf[s.start..s.end]).collect();
        assert_eq!(got, vec![&b"1"[..], b"\"two\"", b"[3]"]);
    }

    #[test]
    fn scans_empty_array() {
        assert_eq!(array_scan(b"[]").expect("scan").len(), 0);
        assert_eq!(array_scan(b"[  ]").expect("scan").len(), 0);
    }
}
