//! Pattern error types.

use kestrel_core::GraphError;
use thiserror::Error;

/// Errors that can occur while compiling or matching a pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern has no descriptors.
    #[error("Pattern is empty")]
    EmptyPattern,

    /// Relationship descriptors do not sit between node descriptors.
    #[error("Path with {nodes} node(s) cannot hold {rels} relationship(s)")]
    MalformedPath { nodes: usize, rels: usize },

    /// A relationship descriptor without a type.
    #[error("Relationship descriptor requires a type")]
    MissingRelType,

    /// Two different literals for one property of one variable.
    #[error("Conflicting values for property '{key}' of '{var}'")]
    ConflictingProperty { var: String, key: String },

    /// Null used as a property literal.
    #[error("Null literal for property '{key}' of '{var}'")]
    NullProperty { var: String, key: String },

    /// One name used for a node and for a relationship.
    #[error("Variable '{name}' is used both as a node and as a relationship")]
    VariableKindConflict { name: String },

    /// One relationship variable used twice in a pattern.
    #[error("Relationship variable '{name}' is used more than once")]
    DuplicateRelVariable { name: String },

    /// A pre-bound variable holds the wrong kind of entity.
    #[error("Variable '{name}' is bound to a {found}, expected a {expected}")]
    BindingKindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Graph error.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl PatternError {
    pub fn conflicting_property(var: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ConflictingProperty {
            var: var.into(),
            key: key.into(),
        }
    }

    pub fn null_property(var: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NullProperty {
            var: var.into(),
            key: key.into(),
        }
    }

    pub fn variable_kind_conflict(name: impl Into<String>) -> Self {
        Self::VariableKindConflict { name: name.into() }
    }

    pub fn duplicate_rel_variable(name: impl Into<String>) -> Self {
        Self::DuplicateRelVariable { name: name.into() }
    }

    /// Whether the error was raised while compiling the pattern.
    pub fn is_definition_error(&self) -> bool {
        !matches!(
            self,
            PatternError::BindingKindMismatch { .. } | PatternError::Graph(_)
        )
    }
}

/// Result type for pattern operations.
pub type PatternResult<T> = Result<T, PatternError>;
