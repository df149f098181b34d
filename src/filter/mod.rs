//! Filter predicate subsystem
//!
//! Compiles the predicate between `?(` and its matching `)` into a
//! postfix token list, and evaluates that list against candidate element
//! bytes. Sub-path operands are themselves compiled step chains; those
//! rooted at `$` are frozen to literals before scanning begins.

pub(crate) mod eval;
pub(crate) mod parser;
pub(crate) mod regex_cache;

pub use regex_cache::{REGEX_CACHE, RegexCache};
