//! Query compiler entry point
//!
//! Compiles a JSONPath expression into a linked chain of step nodes
//! optimized for single-pass streaming evaluation. Compilation is
//! performed once; evaluation walks the chain against raw input bytes.

pub(crate) mod bracket;
pub(crate) mod steps;

use crate::ast::StepNode;
use crate::error::{ErrorKind, JsonPathError, JsonPathResult};

/// JSONPath expression compiler
pub struct PathCompiler;

impl PathCompiler {
    /// Compile a query into a step chain
    ///
    /// # Arguments
    ///
    /// * `path` - query string beginning with `$` (e.g. `"$.data[0]"`,
    ///   `"$.items[?(@.active)]"`)
    ///
    /// # Errors
    ///
    /// `PathEmpty` for an empty query, `PathRootExpected` when the query
    /// does not begin with `$`, and the `Path*` compile errors of
    /// [`ErrorKind`] for syntax failures, each carrying the byte offset
    /// at which parsing stopped.
    pub fn compile(path: &str) -> JsonPathResult<Box<StepNode>> {
        if path.is_empty() {
            return Err(JsonPathError::new(ErrorKind::PathEmpty));
        }
        let bytes = path.as_bytes();
        if bytes[0] != b'$' {
            return Err(JsonPathError::new(ErrorKind::PathRootExpected));
        }

        let (chain, _) = steps::parse_step(bytes, 0)?;
        tracing::debug!(
            target: "sliq::compiler",
            query = path,
            steps = chain.chain_len(),
            "compiled path"
        );
        Ok(chain)
    }

    /// Validate query syntax without keeping the chain
    pub fn validate(path: &str) -> JsonPathResult<()> {
        Self::compile(path).map(|_| ())
    }
}
