//! Mutation error types.

use kestrel_core::{EntityRef, GraphError};
use kestrel_pattern::PatternError;
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur during mutation execution.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Unbound variable: {name}")]
    UnboundVariable { name: String },

    #[error("Bound variable '{var}' does not satisfy its pattern constraints")]
    BoundConstraintViolation { var: String },

    #[error("Relationship variable '{var}' is already bound and cannot be created")]
    BoundRelationship { var: String },

    #[error("Entity {entity} bound to '{var}' was deleted earlier in this statement")]
    DeletedEntity { var: String, entity: EntityRef },

    #[error("Invalid update on '{var}': {message}")]
    InvalidUpdate { var: String, message: String },

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl MutationError {
    pub fn unbound_variable(name: impl Into<String>) -> Self {
        Self::UnboundVariable { name: name.into() }
    }

    pub fn bound_constraint_violation(var: impl Into<String>) -> Self {
        Self::BoundConstraintViolation { var: var.into() }
    }

    pub fn bound_relationship(var: impl Into<String>) -> Self {
        Self::BoundRelationship { var: var.into() }
    }

    pub fn deleted_entity(var: impl Into<String>, entity: EntityRef) -> Self {
        Self::DeletedEntity {
            var: var.into(),
            entity,
        }
    }

    pub fn invalid_update(var: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUpdate {
            var: var.into(),
            message: message.into(),
        }
    }
}
