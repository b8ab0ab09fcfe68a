//! Statement statistics.

use std::collections::HashSet;
use std::fmt;

/// What a statement changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Distinct label names attached that the graph had never seen before.
    pub labels_added: usize,
    pub nodes_created: usize,
    pub relationships_created: usize,
    /// Property writes, from creation maps and from the update stage.
    pub properties_set: usize,
    pub nodes_deleted: usize,
    pub relationships_deleted: usize,
    pub indices_created: usize,
    pub indices_deleted: usize,
}

impl Statistics {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn entries(&self) -> [(&'static str, usize); 8] {
        [
            ("Labels added", self.labels_added),
            ("Nodes created", self.nodes_created),
            ("Relationships created", self.relationships_created),
            ("Properties set", self.properties_set),
            ("Nodes deleted", self.nodes_deleted),
            ("Relationships deleted", self.relationships_deleted),
            ("Indices created", self.indices_created),
            ("Indices deleted", self.indices_deleted),
        ]
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, count) in self.entries().into_iter().filter(|(_, c)| *c > 0) {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, count)?;
            first = false;
        }
        if first {
            write!(f, "no changes")?;
        }
        Ok(())
    }
}

/// Counts changes as a statement executes.
#[derive(Debug, Default)]
pub(crate) struct StatsCollector {
    stats: Statistics,
    new_labels: HashSet<String>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A label is about to be attached. `known` tells whether the catalog
    /// already held it.
    pub fn label_attached(&mut self, label: &str, known: bool) {
        if !known && self.new_labels.insert(label.to_string()) {
            self.stats.labels_added += 1;
        }
    }

    pub fn node_created(&mut self, properties: usize) {
        self.stats.nodes_created += 1;
        self.stats.properties_set += properties;
    }

    pub fn relationship_created(&mut self, properties: usize) {
        self.stats.relationships_created += 1;
        self.stats.properties_set += properties;
    }

    pub fn property_set(&mut self) {
        self.stats.properties_set += 1;
    }

    pub fn node_deleted(&mut self, detached: usize) {
        self.stats.nodes_deleted += 1;
        self.stats.relationships_deleted += detached;
    }

    pub fn relationship_deleted(&mut self) {
        self.stats.relationships_deleted += 1;
    }

    pub fn snapshot(&self) -> Statistics {
        self.stats
    }

    pub fn finish(self) -> Statistics {
        self.stats
    }
}
