//! Entity structures for Kestrel.
//!
//! Nodes carry a set of labels and a property map; relationships carry
//! exactly one type and connect a source node to a target node.

use crate::{NodeId, Properties, RelId, Value};

/// A node in the property graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// Labels in attachment order, without duplicates.
    pub labels: Vec<String>,
    /// Property values.
    pub properties: Properties,
}

impl Node {
    /// Create a new node. Duplicate labels and null properties are dropped.
    pub fn new(id: NodeId, labels: Vec<String>, properties: Properties) -> Self {
        let mut node = Self {
            id,
            labels: Vec::with_capacity(labels.len()),
            properties: Properties::new(),
        };
        for label in labels {
            node.add_label(label);
        }
        for (key, value) in properties {
            node.set_property(key, value);
        }
        node
    }

    /// Check whether the node carries a label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Attach a label. Returns false if it was already attached.
    pub fn add_label(&mut self, label: String) -> bool {
        if self.has_label(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// Detach a label. Returns false if it was not attached.
    pub fn remove_label(&mut self, label: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l != label);
        self.labels.len() != before
    }

    /// Get a property value by key.
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a property, returning the previous value. Null removes the key.
    pub fn set_property(&mut self, key: String, value: Value) -> Option<Value> {
        write_property(&mut self.properties, key, value)
    }
}

/// A directed, typed relationship between two nodes.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Unique identifier for this relationship.
    pub id: RelId,
    /// Relationship type name.
    pub rel_type: String,
    /// Source node.
    pub src: NodeId,
    /// Target node.
    pub dst: NodeId,
    /// Property values.
    pub properties: Properties,
}

impl Relationship {
    /// Create a new relationship. Null properties are dropped.
    pub fn new(
        id: RelId,
        rel_type: impl Into<String>,
        src: NodeId,
        dst: NodeId,
        properties: Properties,
    ) -> Self {
        Self {
            id,
            rel_type: rel_type.into(),
            src,
            dst,
            properties: properties.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        }
    }

    /// Check if this relationship touches a node at either end.
    pub fn involves(&self, node_id: NodeId) -> bool {
        self.src == node_id || self.dst == node_id
    }

    /// Get a property value by key.
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a property, returning the previous value. Null removes the key.
    pub fn set_property(&mut self, key: String, value: Value) -> Option<Value> {
        write_property(&mut self.properties, key, value)
    }
}

fn write_property(properties: &mut Properties, key: String, value: Value) -> Option<Value> {
    if value.is_null() {
        properties.remove(&key)
    } else {
        properties.insert(key, value)
    }
}
