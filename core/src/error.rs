//! Common error types for Kestrel.

use crate::{NodeId, RelId};
use thiserror::Error;

/// Errors that can occur during graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Node not found.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Relationship not found.
    #[error("Relationship not found: {0}")]
    RelationshipNotFound(RelId),

    /// An index on this label and property is already declared.
    #[error("Index already exists: :{label}({property})")]
    IndexAlreadyExists { label: String, property: String },

    /// No index is declared on this label and property.
    #[error("Index not found: :{label}({property})")]
    IndexNotFound { label: String, property: String },

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl GraphError {
    pub fn index_already_exists(label: impl Into<String>, property: impl Into<String>) -> Self {
        Self::IndexAlreadyExists {
            label: label.into(),
            property: property.into(),
        }
    }

    pub fn index_not_found(label: impl Into<String>, property: impl Into<String>) -> Self {
        Self::IndexNotFound {
            label: label.into(),
            property: property.into(),
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
