//! Filter predicate evaluator
//!
//! Runs a compiled postfix token list against one candidate element,
//! producing a boolean. Sub-path operands stay unresolved on the value
//! stack until an operator needs them, so `&&`/`||` short-circuit
//! without resolving the skipped side. A sub-path that fails to resolve
//! becomes `Missing`, which is distinct from an explicit `null`.

use crate::ast::{FilterExpr, FilterOp, FilterToken, Operand, OperandValue, StepNode};
use crate::error::{ErrorKind, JsonPathError, JsonPathResult};
use crate::skipper;

/// Value-stack slot: resolved value, pending sub-path, or regex pattern
enum Slot<'t> {
    Value(OperandValue),
    Path(&'t StepNode),
    Pattern(&'t regex::bytes::Regex),
}

/// Evaluate the predicate against one candidate element
///
/// Total over well-formed token lists: every predicate yields a boolean
/// or a typed error, never a panic.
///
/// # Errors
/// `NotEnoughArguments` for operand underflow, the arithmetic/regex/
/// ordering errors of [`ErrorKind`] for operand kind violations.
pub(crate) fn filter_match(candidate: &[u8], expr: &FilterExpr) -> JsonPathResult<bool> {
    let mut stack: Vec<Slot<'_>> = Vec::with_capacity(expr.tokens.len());

    for token in &expr.tokens {
        match token {
            FilterToken::Operand(Operand::Literal(value)) => {
                stack.push(Slot::Value(value.clone()));
            }
            FilterToken::Operand(Operand::Path(chain)) => {
                stack.push(Slot::Path(chain.as_ref()));
            }
            FilterToken::Operand(Operand::Regex(regex)) => {
                stack.push(Slot::Pattern(regex));
            }
            FilterToken::Operator(op) => {
                let right = stack
                    .pop()
                    .ok_or(JsonPathError::new(ErrorKind::NotEnoughArguments))?;
                let left = stack
                    .pop()
                    .ok_or(JsonPathError::new(ErrorKind::NotEnoughArguments))?;
                let value = apply_operator(candidate, *op, left, right)?;
                stack.push(Slot::Value(value));
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(slot), true) => Ok(slot_truthy(candidate, slot)),
        (Some(_), false) => Err(JsonPathError::new(ErrorKind::NotEnoughArguments)),
        (None, _) => Err(JsonPathError::new(ErrorKind::EmptyFilter)),
    }
}

fn apply_operator(
    candidate: &[u8],
    op: FilterOp,
    left: Slot<'_>,
    right: Slot<'_>,
) -> JsonPathResult<OperandValue> {
    if op.is_logical() {
        let lhs = slot_truthy(candidate, left);
        let outcome = match op {
            FilterOp::And if !lhs => false,
            FilterOp::Or if lhs => true,
            _ => slot_truthy(candidate, right),
        };
        return Ok(OperandValue::Bool(outcome));
    }
    if op.is_arithmetic() {
        return apply_arithmetic(candidate, op, left, right);
    }
    if op == FilterOp::Match {
        return apply_match(candidate, left, right);
    }

    let lhs = resolve(candidate, left);
    let rhs = resolve(candidate, right);
    match op {
        FilterOp::Eq | FilterOp::Ne => Ok(OperandValue::Bool(match same_kind_eq(&lhs, &rhs) {
            // mismatched kinds never compare, under either operator
            None => false,
            Some(eq) => {
                if op == FilterOp::Eq {
                    eq
                } else {
                    !eq
                }
            }
        })),
        _ => apply_ordering(op, &lhs, &rhs),
    }
}

fn apply_arithmetic(
    candidate: &[u8],
    op: FilterOp,
    left: Slot<'_>,
    right: Slot<'_>,
) -> JsonPathResult<OperandValue> {
    let (OperandValue::Number(a), OperandValue::Number(b)) =
        (resolve(candidate, left), resolve(candidate, right))
    else {
        return Err(JsonPathError::new(ErrorKind::InvalidArithmetic));
    };
    let result = match op {
        FilterOp::Add => a + b,
        FilterOp::Sub => a - b,
        FilterOp::Mul => a * b,
        _ => a / b,
    };
    Ok(OperandValue::Number(result))
}

fn apply_match(
    candidate: &[u8],
    left: Slot<'_>,
    right: Slot<'_>,
) -> JsonPathResult<OperandValue> {
    let Slot::Pattern(regex) = right else {
        return Err(JsonPathError::new(ErrorKind::InvalidRegexp));
    };
    match resolve(candidate, left) {
        OperandValue::String(s) => Ok(OperandValue::Bool(regex.is_match(&s))),
        OperandValue::Missing => Ok(OperandValue::Bool(false)),
        _ => Err(JsonPathError::new(ErrorKind::InvalidRegexp)),
    }
}

/// Ordering comparison: numbers only; strings are rejected outright, a
/// missing operand is simply no match
fn apply_ordering(
    op: FilterOp,
    lhs: &OperandValue,
    rhs: &OperandValue,
) -> JsonPathResult<OperandValue> {
    if matches!(lhs, OperandValue::Missing) || matches!(rhs, OperandValue::Missing) {
        return Ok(OperandValue::Bool(false));
    }
    if matches!(lhs, OperandValue::String(_)) || matches!(rhs, OperandValue::String(_)) {
        return Err(JsonPathError::new(
            ErrorKind::OperatorNotApplicableToStrings,
        ));
    }
    let (OperandValue::Number(a), OperandValue::Number(b)) = (lhs, rhs) else {
        return Err(JsonPathError::new(ErrorKind::OperandTypesMismatch));
    };
    let outcome = match op {
        FilterOp::Lt => a < b,
        FilterOp::Le => a <= b,
        FilterOp::Gt => a > b,
        _ => a >= b,
    };
    Ok(OperandValue::Bool(outcome))
}

/// Same-kind equality; `None` when the kinds cannot be compared
///
/// Explicit nulls compare equal only to null; `Missing` matches nothing,
/// not even another `Missing`. Non-scalars compare byte-for-byte.
fn same_kind_eq(lhs: &OperandValue, rhs: &OperandValue) -> Option<bool> {
    match (lhs, rhs) {
        (OperandValue::Number(a), OperandValue::Number(b)) => Some(a == b),
        (OperandValue::String(a), OperandValue::String(b)) => Some(a == b),
        (OperandValue::Bool(a), OperandValue::Bool(b)) => Some(a == b),
        (OperandValue::Null, OperandValue::Null) => Some(true),
        (OperandValue::Raw(a), OperandValue::Raw(b)) => Some(a == b),
        _ => None,
    }
}

/// Resolve a slot to a typed value against the candidate
fn resolve(candidate: &[u8], slot: Slot<'_>) -> OperandValue {
    match slot {
        Slot::Value(value) => value,
        Slot::Path(chain) => match crate::eval::get_value(candidate, chain) {
            Ok(bytes) => decode_value(&bytes),
            Err(_) => OperandValue::Missing,
        },
        Slot::Pattern(_) => OperandValue::Missing,
    }
}

/// Truthiness of a slot in boolean position
///
/// A bare sub-path is truthy iff it resolves, regardless of the value it
/// resolves to.
fn slot_truthy(candidate: &[u8], slot: Slot<'_>) -> bool {
    match slot {
        Slot::Path(chain) => crate::eval::get_value(candidate, chain).is_ok(),
        Slot::Value(value) => value_truthy(&value),
        Slot::Pattern(_) => false,
    }
}

fn value_truthy(value: &OperandValue) -> bool {
    match value {
        OperandValue::Number(n) => *n != 0.0,
        OperandValue::String(s) => !s.is_empty(),
        OperandValue::Bool(b) => *b,
        OperandValue::Null | OperandValue::Missing => false,
        OperandValue::Raw(_) => true,
    }
}

/// Classify raw result bytes into a typed operand value
///
/// Strings keep their JSON escapes unprocessed; arrays and objects stay
/// raw for byte-equality; digits parse as an IEEE double. Anything that
/// fails to classify stays raw.
pub(crate) fn decode_value(raw: &[u8]) -> OperandValue {
    let Ok(start) = skipper::skip_spaces(raw, 0) else {
        return OperandValue::Missing;
    };
    let raw = &raw[start..];
    match raw[0] {
        b'"' => match skipper::skip_string(raw, 0) {
            Ok(end) => OperandValue::String(raw[1..end - 1].to_vec()),
            Err(_) => OperandValue::Missing,
        },
        b'{' | b'[' => OperandValue::Raw(raw.to_vec()),
        b't' if raw.starts_with(b"true") => OperandValue::Bool(true),
        b'f' if raw.starts_with(b"false") => OperandValue::Bool(false),
        b'n' if raw.starts_with(b"null") => OperandValue::Null,
        _ => {
            let end = skipper::skip_number(raw, 0);
            std::str::from_utf8(&raw[..end])
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .map_or_else(|| OperandValue::Raw(raw.to_vec()), OperandValue::Number)
        }
    }
}
