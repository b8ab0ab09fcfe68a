//! Identity types for Kestrel entities.
//!
//! Identifiers are 64-bit values assigned by the graph store. They are
//! unique among live entities of their kind and immutable once assigned.

use std::fmt;

/// Unique identifier for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Unique identifier for a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelId(pub u64);

impl RelId {
    /// Create a new RelId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Reference to either a node or a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Node(NodeId),
    Relationship(RelId),
}

impl EntityRef {
    /// Returns true if this refers to a node.
    pub fn is_node(&self) -> bool {
        matches!(self, EntityRef::Node(_))
    }

    /// Returns true if this refers to a relationship.
    pub fn is_relationship(&self) -> bool {
        matches!(self, EntityRef::Relationship(_))
    }

    /// Get as a NodeId if this is a node reference.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            EntityRef::Node(id) => Some(*id),
            EntityRef::Relationship(_) => None,
        }
    }

    /// Get as a RelId if this is a relationship reference.
    pub fn as_relationship(&self) -> Option<RelId> {
        match self {
            EntityRef::Node(_) => None,
            EntityRef::Relationship(id) => Some(*id),
        }
    }
}

impl From<NodeId> for EntityRef {
    fn from(id: NodeId) -> Self {
        EntityRef::Node(id)
    }
}

impl From<RelId> for EntityRef {
    fn from(id: RelId) -> Self {
        EntityRef::Relationship(id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Node(id) => write!(f, "{}", id),
            EntityRef::Relationship(id) => write!(f, "{}", id),
        }
    }
}
