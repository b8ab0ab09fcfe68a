//! Mutation operation implementations.
//!
//! Pattern creation and each update action live in their own module.

mod create;
mod delete;
mod set;

pub(crate) use create::create_pattern;
pub(crate) use delete::delete_entity;
pub(crate) use set::{add_label, remove_label, set_property};

use kestrel_core::Value;

/// One update applied to the entity bound to `var` in each row.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOp {
    pub var: String,
    pub action: UpdateAction,
}

/// The update actions of the stage following MERGE, CREATE or MATCH.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// `SET var.key = value`; null removes the property.
    SetProperty { key: String, value: Value },
    /// `REMOVE var.key`
    RemoveProperty { key: String },
    /// `SET var:Label`
    AddLabel { label: String },
    /// `REMOVE var:Label`
    RemoveLabel { label: String },
    /// `DETACH DELETE var`
    Delete,
}

impl UpdateOp {
    pub fn set(var: impl Into<String>, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            var: var.into(),
            action: UpdateAction::SetProperty {
                key: key.into(),
                value: value.into(),
            },
        }
    }

    pub fn remove(var: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            action: UpdateAction::RemoveProperty { key: key.into() },
        }
    }

    pub fn add_label(var: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            action: UpdateAction::AddLabel {
                label: label.into(),
            },
        }
    }

    pub fn remove_label(var: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            action: UpdateAction::RemoveLabel {
                label: label.into(),
            },
        }
    }

    pub fn delete(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            action: UpdateAction::Delete,
        }
    }
}
