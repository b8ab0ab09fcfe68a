//! Variable bindings for pattern matching.

use kestrel_core::{EntityRef, NodeId, RelId};
use std::fmt;

/// What a pattern variable is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Reference to a node.
    Node(NodeId),
    /// Reference to a relationship.
    Relationship(RelId),
}

impl Binding {
    /// Get as node ID if this is a node binding.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Binding::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as relationship ID if this is a relationship binding.
    pub fn as_relationship(&self) -> Option<RelId> {
        match self {
            Binding::Relationship(id) => Some(*id),
            _ => None,
        }
    }

    pub fn entity(&self) -> EntityRef {
        match self {
            Binding::Node(id) => EntityRef::Node(*id),
            Binding::Relationship(id) => EntityRef::Relationship(*id),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Binding::Node(_) => "node",
            Binding::Relationship(_) => "relationship",
        }
    }
}

impl From<NodeId> for Binding {
    fn from(id: NodeId) -> Self {
        Binding::Node(id)
    }
}

impl From<RelId> for Binding {
    fn from(id: RelId) -> Self {
        Binding::Relationship(id)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Node(id) => write!(f, "{}", id),
            Binding::Relationship(id) => write!(f, "{}", id),
        }
    }
}

/// One row of variable bindings, in binding order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingRow {
    entries: Vec<(String, Binding)>,
}

impl BindingRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row with a single entry.
    pub fn with(name: impl Into<String>, binding: impl Into<Binding>) -> Self {
        let mut row = Self::new();
        row.insert(name, binding);
        row
    }

    /// Bind a variable. Rebinding keeps the variable's position.
    pub fn insert(&mut self, name: impl Into<String>, binding: impl Into<Binding>) {
        let name = name.into();
        let binding = binding.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = binding,
            None => self.entries.push((name, binding)),
        }
    }

    /// Get a binding by name.
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| *b)
    }

    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.get(name).and_then(|b| b.as_node())
    }

    pub fn relationship(&self, name: &str) -> Option<RelId> {
        self.get(name).and_then(|b| b.as_relationship())
    }

    /// Check if a variable is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Variable names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Clone with an additional binding.
    pub fn extend_with(&self, name: impl Into<String>, binding: impl Into<Binding>) -> Self {
        let mut row = self.clone();
        row.insert(name, binding);
        row
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over bindings in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Binding)> {
        self.entries.iter().map(|(n, b)| (n.as_str(), *b))
    }
}

impl fmt::Display for BindingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, binding)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, binding)?;
        }
        write!(f, "}}")
    }
}
