//! Slice a fragment out of raw JSON bytes with a JSONPath query
//!
//! `sliq` evaluates a JSONPath-like expression directly against a raw
//! JSON byte buffer, without materializing the document into a value
//! tree. A path compiler turns the query into a chain of step nodes; a
//! streaming evaluator walks the input in lockstep with that chain,
//! skimming past values it does not need. The result is a sub-slice of
//! the input whenever the selection is contiguous, and a freshly
//! synthesized `[...]` byte sequence only when a step aggregates
//! non-contiguous fragments.
//!
//! # Examples
//!
//! ```rust
//! let doc = br#"{"sku":[{"id":1,"price":160},{"id":2,"price":280}]}"#;
//!
//! let price = sliq::get(doc, "$.sku[0].price").expect("lookup");
//! assert_eq!(price.as_ref(), b"160");
//!
//! let ids = sliq::get(doc, "$.sku[?(@.price > 200)].id").expect("filter");
//! assert_eq!(ids.as_ref(), b"[2]");
//! ```
//!
//! Supported selectors: child keys (`.key`, `['key']`), wildcards
//! (`.*`), indexes (`[0]`, `[-1]`), ranges (`[1:3]`), index lists
//! (`[0,2]`), key lists (`['a','b']`), the functions `length()`,
//! `count()` and `size()`, and filter predicates (`[?(@.price > 10)]`)
//! with comparison, arithmetic, logical and regex-match operators.

pub mod ast;
pub mod compiler;
pub mod error;
pub mod eval;
pub mod filter;
pub mod skipper;

use std::borrow::Cow;

pub use ast::{FilterExpr, FilterOp, FilterToken, Operand, OperandValue, StepFlags, StepNode};
pub use compiler::PathCompiler;
pub use error::{ErrorKind, JsonPathError, JsonPathResult};

/// Retrieve the part of `input` matching `path`
///
/// The sole retrieval primitive. `Cow::Borrowed` results are verbatim
/// sub-slices of `input`; aggregating queries (wildcards, ranges, index
/// and key lists, filters) return a synthesized `Cow::Owned` array.
///
/// # Arguments
///
/// * `input` - raw JSON bytes
/// * `path` - query beginning with `$`; the query `"$"` returns the
///   input verbatim
///
/// # Errors
///
/// `PathEmpty` for an empty query, `PathRootExpected` when it does not
/// begin with `$`, the `Path*` kinds for compile failures, and the
/// evaluation kinds of [`ErrorKind`] when the document does not have the
/// queried shape.
pub fn get<'a>(input: &'a [u8], path: &str) -> JsonPathResult<Cow<'a, [u8]>> {
    if path.is_empty() {
        return Err(JsonPathError::new(ErrorKind::PathEmpty));
    }
    if path == "$" {
        return Ok(Cow::Borrowed(input));
    }
    if !path.starts_with('$') {
        return Err(JsonPathError::new(ErrorKind::PathRootExpected));
    }

    let mut chain = PathCompiler::compile(path)?;
    eval::resolve_root_operands(&mut chain, input);
    eval::get_value(input, &chain)
}

/// Retrieve the elements of the array matching `path` as sub-slices
///
/// Behaves like [`get`] but requires the query to resolve to an array,
/// and returns the element spans individually, each a verbatim
/// sub-slice of `input`. `capacity` sizes the result vector up front.
///
/// # Errors
///
/// Everything [`get`] reports, plus `WildcardsNotSupported`,
/// `FunctionsNotSupported` and `SubSlicingNotSupported` for chain shapes
/// whose results could not be input sub-slices, `TerminalNodeArray` when
/// the terminal step selects a single element, and `ArrayExpected` when
/// the resolved value is not an array.
pub fn get_array_elements<'a>(
    input: &'a [u8],
    path: &str,
    capacity: usize,
) -> JsonPathResult<Vec<&'a [u8]>> {
    if path.is_empty() {
        return Err(JsonPathError::new(ErrorKind::PathEmpty));
    }
    if !path.starts_with('$') {
        return Err(JsonPathError::new(ErrorKind::PathRootExpected));
    }

    let mut chain = PathCompiler::compile(path)?;
    eval::elements::validate_chain(&chain)?;
    eval::resolve_root_operands(&mut chain, input);

    let mut out = Vec::with_capacity(capacity);
    eval::elements::collect_elements(input, &chain, &mut out)?;
    Ok(out)
}
