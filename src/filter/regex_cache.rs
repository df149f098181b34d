//! Regex compilation cache for the `=~` filter operator
//!
//! Patterns are compiled once at filter-compile time and shared
//! process-wide. The byte-oriented engine is used so candidate slices
//! are matched without UTF-8 conversion.

use std::collections::HashMap;
use std::sync::RwLock;

use regex::bytes::Regex;

use crate::error::{ErrorKind, JsonPathError, JsonPathResult};

/// Bounded cache of compiled patterns
const CACHE_LIMIT: usize = 32;

/// Regex compilation cache keyed by the full pattern text
pub struct RegexCache {
    cache: RwLock<HashMap<String, Regex>>,
}

impl RegexCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get a compiled regex from the cache, compiling and caching on miss
    pub fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        if let Ok(cache) = self.cache.read()
            && let Some(regex) = cache.get(pattern)
        {
            return Ok(regex.clone());
        }

        let regex = Regex::new(pattern)?;
        tracing::debug!(target: "sliq::filter", pattern, "regex cache miss");

        if let Ok(mut cache) = self.cache.write()
            && cache.len() < CACHE_LIMIT
        {
            cache.insert(pattern.to_string(), regex.clone());
        }
        Ok(regex)
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    /// Process-wide pattern cache shared by every compiled filter
    pub static ref REGEX_CACHE: RegexCache = RegexCache::new();
}

/// Compile a `/pattern/flags` literal
///
/// Trailing flags become inline groups; `i`, `m`, `s` and `x` are
/// supported, anything else fails the compile.
///
/// # Errors
/// `InvalidRegexp` (with the query offset) for a non-UTF-8 pattern, an
/// unknown flag, or a pattern the engine rejects.
pub(crate) fn compile_with_flags(
    pattern: &[u8],
    flags: &[u8],
    offset: usize,
) -> JsonPathResult<Regex> {
    let Ok(pattern) = std::str::from_utf8(pattern) else {
        return Err(JsonPathError::parse(ErrorKind::InvalidRegexp, offset));
    };
    let mut inline = String::new();
    for &flag in flags {
        match flag {
            b'i' | b'm' | b's' | b'x' => inline.push(flag as char),
            _ => return Err(JsonPathError::parse(ErrorKind::InvalidRegexp, offset)),
        }
    }
    let keyed = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{inline}){pattern}")
    };
    REGEX_CACHE
        .get_or_compile(&keyed)
        .map_err(|_| JsonPathError::parse(ErrorKind::InvalidRegexp, offset))
}
