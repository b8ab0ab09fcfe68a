//! Label catalog.

use std::collections::HashSet;

/// Every label string ever attached to a node of this graph.
///
/// Membership is append-only: a label stays in the catalog after the last
/// node carrying it loses it or is deleted.
#[derive(Debug, Default)]
pub struct LabelCatalog {
    labels: HashSet<String>,
    order: Vec<String>,
}

impl LabelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a label has ever been attached.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Record a label. Returns true if it was not yet known.
    pub fn register(&mut self, label: &str) -> bool {
        if self.labels.contains(label) {
            return false;
        }
        self.labels.insert(label.to_string());
        self.order.push(label.to_string());
        true
    }

    /// Labels in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
