//! Error types for parsing and optimization.
//!
//! Every error is fatal to the call that produced it: the optimizer never
//! returns a partial result.

use thiserror::Error;

/// Error raised while reading the textual index form.
///
/// Positions are byte offsets into the input string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token other than the expected one was found.
    #[error("expected {expected} at position {position}, found '{found}'")]
    Unexpected {
        position: usize,
        expected: &'static str,
        found: char,
    },
    /// The input ended before the index was closed.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    /// Characters remained after a complete index.
    #[error("trailing input at position {position}")]
    TrailingInput { position: usize },
}

impl ParseError {
    /// Byte offset the error points at, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Unexpected { position, .. } | ParseError::TrailingInput { position } => {
                Some(*position)
            }
            ParseError::UnexpectedEnd { .. } => None,
        }
    }
}

/// Error raised by [`crate::IndexOptimizer`].
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A pair whose contained side is longer than its containing side
    /// reached the search. This is a programming error and aborts the search.
    #[error("containment invariant violated: {contained} cannot be contained in {containing}")]
    ContainmentInvariant {
        contained: String,
        containing: String,
    },

    /// The selection strategy returned no winner for a non-empty candidate set.
    #[error("selection strategy '{strategy}' returned no candidate")]
    EmptySelection { strategy: String },

    /// The worker pool could not be created.
    #[error("worker pool error: {0}")]
    WorkerPool(String),

    /// A search task panicked.
    #[error("search worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Convenience alias used across the crate.
pub type Result<T, E = OptimizerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_position() {
        let err = ParseError::Unexpected {
            position: 3,
            expected: "'{'",
            found: 'x',
        };
        assert_eq!(err.position(), Some(3));
        assert_eq!(err.to_string(), "expected '{' at position 3, found 'x'");
        assert_eq!(ParseError::UnexpectedEnd { expected: "'}'" }.position(), None);
    }

    #[test]
    fn parse_error_converts_into_optimizer_error() {
        let err: OptimizerError = ParseError::TrailingInput { position: 7 }.into();
        assert!(matches!(err, OptimizerError::Parse(ParseError::TrailingInput { position: 7 })));
        assert!(err.to_string().contains("position 7"));
    }
}
