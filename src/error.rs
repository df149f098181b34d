//! Error types for path compilation and query evaluation
//!
//! A flat taxonomy of stable, human-readable error identifiers. Path-parse
//! errors carry the byte offset within the query at which compilation
//! failed; evaluation errors carry no offset.

use std::error::Error;
use std::fmt;

/// Error taxonomy for every failure the engine can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty query string
    PathEmpty,
    /// Query does not begin with `$`
    PathRootExpected,
    /// Query ended in the middle of a step
    PathUnexpectedEnd,
    /// Step starts with a byte that cannot begin a selector
    PathInvalidReference,
    /// Function name is not `length`, `count` or `size`
    PathUnknownFunction,
    /// Bracket form is missing its index or closing `]`
    PathIndexBoundMissing,
    /// Quoted key list ended without a closing quote or `]`
    PathKeyListTerminated,
    /// Explicit right bound 0 with a positive left bound
    PathIndexNonsense,
    /// Array index or range resolved outside the element count
    ArrayElementNotFound,
    /// Object has no field with the requested key
    FieldNotFound,
    /// Value is not the array the step requires
    ArrayExpected,
    /// Value is not the object the step requires
    ObjectExpected,
    /// Input does not start with `{` or `[`
    ObjectOrArrayExpected,
    /// Object key is not followed by `:`
    ColonExpected,
    /// Bare token is neither `true`, `false` nor `null`
    UnrecognizedValue,
    /// Input terminated mid-value
    UnexpectedEnd,
    /// `length()`/`count()` applied to a non-array, non-string value
    InvalidLengthUsage,
    /// Wildcard step in a `get_array_elements` query
    WildcardsNotSupported,
    /// Function step in a `get_array_elements` query
    FunctionsNotSupported,
    /// `get_array_elements` terminal step selects a single element
    TerminalNodeArray,
    /// Range/list/filter on a non-terminal `get_array_elements` step
    SubSlicingNotSupported,
    /// Filter expression ended mid-token
    UnexpectedEOT,
    /// Byte sequence is not a known filter token
    UnknownToken,
    /// String literal in a filter ended without its closing quote
    UnexpectedStringEnd,
    /// Bare filter word starting with `t`/`f` is not `true`/`false`
    InvalidBoolean,
    /// Filter contains no tokens
    EmptyFilter,
    /// Operator popped with fewer operands than it needs
    NotEnoughArguments,
    /// Operator spelling is not recognized
    UnknownOperator,
    /// Arithmetic operator applied to non-numeric operands
    InvalidArithmetic,
    /// `=~` applied to a non-string subject or non-regex pattern
    InvalidRegexp,
    /// Ordering comparison between incomparable kinds
    OperandTypesMismatch,
    /// Ordering comparison applied to strings
    OperatorNotApplicableToStrings,
}

impl ErrorKind {
    /// Stable identifier text for this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::PathEmpty => "path: empty",
            ErrorKind::PathRootExpected => "path: $ expected",
            ErrorKind::PathUnexpectedEnd => "path: unexpected end of path",
            ErrorKind::PathInvalidReference => "path: invalid element reference",
            ErrorKind::PathUnknownFunction => "path: unknown function",
            ErrorKind::PathIndexBoundMissing => "path: index bound missing",
            ErrorKind::PathKeyListTerminated => "path: key list terminated unexpectedly",
            ErrorKind::PathIndexNonsense => "path: 0 as a second bound does not make sense",
            ErrorKind::ArrayElementNotFound => "specified array element not found",
            ErrorKind::FieldNotFound => "field not found",
            ErrorKind::ArrayExpected => "array expected",
            ErrorKind::ObjectExpected => "object expected",
            ErrorKind::ObjectOrArrayExpected => "object or array expected",
            ErrorKind::ColonExpected => "':' expected",
            ErrorKind::UnrecognizedValue => {
                "unrecognized value: true, false or null expected"
            }
            ErrorKind::UnexpectedEnd => "unexpected end of input",
            ErrorKind::InvalidLengthUsage => {
                "length() is only applicable to array or string"
            }
            ErrorKind::WildcardsNotSupported => {
                "wildcards are not supported in get_array_elements"
            }
            ErrorKind::FunctionsNotSupported => {
                "functions are not supported in get_array_elements"
            }
            ErrorKind::TerminalNodeArray => "terminal node must be an array",
            ErrorKind::SubSlicingNotSupported => {
                "sub-slicing is not supported in get_array_elements"
            }
            ErrorKind::UnexpectedEOT => "unexpected end of token",
            ErrorKind::UnknownToken => "unknown token",
            ErrorKind::UnexpectedStringEnd => "unexpected end of string",
            ErrorKind::InvalidBoolean => "invalid boolean value",
            ErrorKind::EmptyFilter => "empty filter",
            ErrorKind::NotEnoughArguments => "not enough arguments",
            ErrorKind::UnknownOperator => "unknown operator",
            ErrorKind::InvalidArithmetic => "invalid operands for arithmetic operator",
            ErrorKind::InvalidRegexp => "invalid operands for regexp match",
            ErrorKind::OperandTypesMismatch => "operand types do not match",
            ErrorKind::OperatorNotApplicableToStrings => {
                "operator is not applicable to strings"
            }
        }
    }
}

/// Error produced by path compilation or query evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonPathError {
    kind: ErrorKind,
    offset: Option<usize>,
}

/// Result type for all engine operations
pub type JsonPathResult<T> = Result<T, JsonPathError>;

impl JsonPathError {
    /// Create an evaluation error (no query offset)
    #[inline]
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self { kind, offset: None }
    }

    /// Create a compile error carrying the query byte offset at which
    /// parsing failed
    #[inline]
    #[must_use]
    pub const fn parse(kind: ErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset: Some(offset),
        }
    }

    /// The taxonomy identifier for this error
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset within the query, present on compile errors only
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl fmt::Display for JsonPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(pos) => write!(f, "{} at {}", self.kind.as_str(), pos),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

impl Error for JsonPathError {}
