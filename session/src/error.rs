//! Session error types.

use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Pattern definition or matching error.
    #[error("pattern error: {0}")]
    PatternError(#[from] kestrel_pattern::PatternError),

    /// Mutation error.
    #[error("mutation error: {0}")]
    MutationError(#[from] kestrel_mutation::MutationError),

    /// Storage or index error.
    #[error("graph error: {0}")]
    GraphError(#[from] kestrel_core::GraphError),
}

impl SessionError {
    /// True for errors raised before the statement touched the graph.
    pub fn is_definition_error(&self) -> bool {
        match self {
            Self::PatternError(e) => e.is_definition_error(),
            Self::MutationError(kestrel_mutation::MutationError::Pattern(e)) => {
                e.is_definition_error()
            }
            _ => false,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
