//! Core graph storage implementation.

use crate::catalog::LabelCatalog;
use crate::config::GraphConfig;
use crate::index::{AdjacencyIndex, IndexManager, LabelIndex};
use crate::scan::CompareOp;
use kestrel_core::{
    EntityRef, GraphError, GraphResult, Node, NodeId, Properties, RelId, Relationship, Value,
};
use log::{debug, error};
use std::collections::HashMap;

/// ID allocator for nodes and relationships.
#[derive(Debug)]
struct IdAllocator {
    next_node_id: u64,
    next_rel_id: u64,
    recycle: bool,
    free_nodes: Vec<NodeId>,
    free_rels: Vec<RelId>,
}

impl IdAllocator {
    fn new(recycle: bool) -> Self {
        Self {
            next_node_id: 1,
            next_rel_id: 1,
            recycle,
            free_nodes: Vec::new(),
            free_rels: Vec::new(),
        }
    }

    fn alloc_node_id(&mut self) -> NodeId {
        if let Some(id) = self.free_nodes.pop() {
            return id;
        }
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    fn alloc_rel_id(&mut self) -> RelId {
        if let Some(id) = self.free_rels.pop() {
            return id;
        }
        let id = RelId::new(self.next_rel_id);
        self.next_rel_id += 1;
        id
    }

    fn release_node_id(&mut self, id: NodeId) {
        if self.recycle {
            self.free_nodes.push(id);
        }
    }

    fn release_rel_id(&mut self, id: RelId) {
        if self.recycle {
            self.free_rels.push(id);
        }
    }
}

/// The in-memory property graph.
///
/// Every mutation goes through this type so that the label, adjacency and
/// property indexes always reflect the stored entities.
#[derive(Debug)]
pub struct Graph {
    config: GraphConfig,
    /// Node storage
    nodes: HashMap<NodeId, Node>,
    /// Relationship storage
    relationships: HashMap<RelId, Relationship>,
    id_alloc: IdAllocator,
    catalog: LabelCatalog,
    label_index: LabelIndex,
    adj_index: AdjacencyIndex,
    indexes: IndexManager,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            id_alloc: IdAllocator::new(config.recycle_ids),
            config,
            nodes: HashMap::new(),
            relationships: HashMap::new(),
            catalog: LabelCatalog::new(),
            label_index: LabelIndex::new(),
            adj_index: AdjacencyIndex::new(),
            indexes: IndexManager::new(),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // ==================== Node Operations ====================

    /// Create a node with the given labels and properties.
    ///
    /// Duplicate labels and null properties are dropped. Labels not seen
    /// before are registered in the catalog.
    pub fn create_node(&mut self, labels: Vec<String>, properties: Properties) -> NodeId {
        let id = self.id_alloc.alloc_node_id();
        let node = Node::new(id, labels, properties);

        for label in &node.labels {
            self.catalog.register(label);
            self.label_index.insert(label, id);
        }
        self.indexes.on_node_created(&node);
        debug!("created node {} {:?}", id, node.labels);

        self.nodes.insert(id, node);
        self.check_indexes();
        id
    }

    /// Get a node by ID.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Attach a label. Returns false if the node already carried it.
    pub fn add_label(&mut self, id: NodeId, label: &str) -> GraphResult<bool> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        if !node.add_label(label.to_string()) {
            return Ok(false);
        }
        self.catalog.register(label);
        self.label_index.insert(label, id);
        self.indexes.on_label_added(node, label);
        self.check_indexes();
        Ok(true)
    }

    /// Detach a label. Returns false if the node did not carry it.
    pub fn remove_label(&mut self, id: NodeId, label: &str) -> GraphResult<bool> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        if !node.remove_label(label) {
            return Ok(false);
        }
        self.label_index.remove(label, id);
        self.indexes.on_label_removed(node, label);
        self.check_indexes();
        Ok(true)
    }

    /// Delete a node and every relationship touching it.
    ///
    /// Returns the ids of the relationships removed along with the node.
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<Vec<RelId>> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }

        let rels = self.adj_index.edges_involving(id);
        for rel_id in &rels {
            self.delete_relationship(*rel_id)?;
        }

        let node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
        for label in &node.labels {
            self.label_index.remove(label, id);
        }
        self.indexes.on_node_deleted(&node);
        self.id_alloc.release_node_id(id);
        debug!("deleted node {} and {} relationships", id, rels.len());

        self.check_indexes();
        Ok(rels)
    }

    /// Set a property on a node or relationship, returning the previous
    /// value. Setting null removes the property.
    pub fn set_property(
        &mut self,
        target: EntityRef,
        key: &str,
        value: Value,
    ) -> GraphResult<Option<Value>> {
        match target {
            EntityRef::Node(id) => {
                let node = self
                    .nodes
                    .get_mut(&id)
                    .ok_or(GraphError::NodeNotFound(id))?;
                let old = node.set_property(key.to_string(), value);
                self.indexes
                    .on_property_set(node, key, old.as_ref(), node.get_property(key));
                self.check_indexes();
                Ok(old)
            }
            EntityRef::Relationship(id) => {
                let rel = self
                    .relationships
                    .get_mut(&id)
                    .ok_or(GraphError::RelationshipNotFound(id))?;
                Ok(rel.set_property(key.to_string(), value))
            }
        }
    }

    /// Read a property of a node or relationship.
    pub fn property(&self, target: EntityRef, key: &str) -> Option<&Value> {
        match target {
            EntityRef::Node(id) => self.nodes.get(&id)?.get_property(key),
            EntityRef::Relationship(id) => self.relationships.get(&id)?.get_property(key),
        }
    }

    pub fn contains(&self, target: EntityRef) -> bool {
        match target {
            EntityRef::Node(id) => self.nodes.contains_key(&id),
            EntityRef::Relationship(id) => self.relationships.contains_key(&id),
        }
    }

    // ==================== Relationship Operations ====================

    /// Create a relationship of the given type from `src` to `dst`.
    pub fn create_relationship(
        &mut self,
        rel_type: &str,
        src: NodeId,
        dst: NodeId,
        properties: Properties,
    ) -> GraphResult<RelId> {
        if rel_type.is_empty() {
            return Err(GraphError::InvalidOperation(
                "relationship type must not be empty".into(),
            ));
        }
        for endpoint in [src, dst] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GraphError::NodeNotFound(endpoint));
            }
        }

        let id = self.id_alloc.alloc_rel_id();
        let rel = Relationship::new(id, rel_type, src, dst, properties);

        self.adj_index.insert(id, rel_type, src, dst);
        debug!("created relationship {} ({})-[:{}]->({})", id, src, rel_type, dst);

        self.relationships.insert(id, rel);
        Ok(id)
    }

    /// Get a relationship by ID.
    pub fn get_relationship(&self, id: RelId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Delete a relationship.
    pub fn delete_relationship(&mut self, id: RelId) -> GraphResult<()> {
        let rel = self
            .relationships
            .remove(&id)
            .ok_or(GraphError::RelationshipNotFound(id))?;

        self.adj_index.remove(id, &rel.rel_type, rel.src, rel.dst);
        self.id_alloc.release_rel_id(id);
        Ok(())
    }

    // ==================== Query Operations ====================

    /// Nodes carrying a label, ascending by id.
    pub fn nodes_with_label(&self, label: &str) -> impl Iterator<Item = NodeId> + '_ {
        self.label_index.get(label)
    }

    pub fn label_count(&self, label: &str) -> usize {
        self.label_index.count(label)
    }

    /// Relationships leaving a node, optionally of one type.
    pub fn edges_from(&self, node_id: NodeId, rel_type: Option<&str>) -> Vec<RelId> {
        self.adj_index.edges_from(node_id, rel_type)
    }

    /// Relationships entering a node, optionally of one type.
    pub fn edges_to(&self, node_id: NodeId, rel_type: Option<&str>) -> Vec<RelId> {
        self.adj_index.edges_to(node_id, rel_type)
    }

    /// Relationships from `src` to `dst`, optionally of one type.
    pub fn relationships_between(
        &self,
        src: NodeId,
        dst: NodeId,
        rel_type: Option<&str>,
    ) -> Vec<RelId> {
        self.adj_index
            .edges_from(src, rel_type)
            .into_iter()
            .filter(|id| self.relationships.get(id).is_some_and(|r| r.dst == dst))
            .collect()
    }

    /// The catalog of every label ever attached.
    pub fn label_catalog(&self) -> &LabelCatalog {
        &self.catalog
    }

    // ==================== Property Indexes ====================

    /// Declare an index on (label, property) and fill it from the
    /// existing nodes.
    pub fn create_index(&mut self, label: &str, property: &str) -> GraphResult<()> {
        self.indexes
            .create_index(label, property, self.nodes.values())
    }

    pub fn drop_index(&mut self, label: &str, property: &str) -> GraphResult<()> {
        self.indexes.drop_index(label, property)
    }

    pub fn has_index(&self, label: &str, property: &str) -> bool {
        self.indexes.has_index(label, property)
    }

    /// Declared indexes as (label, property), sorted.
    pub fn indexes(&self) -> Vec<(String, String)> {
        self.indexes.list()
    }

    /// Nodes in the (label, property) index whose value satisfies
    /// `value <op> operand`.
    pub fn range_scan(
        &self,
        label: &str,
        property: &str,
        op: CompareOp,
        operand: &Value,
    ) -> GraphResult<Vec<NodeId>> {
        self.indexes
            .range_scan(label, property, op, operand)
            .ok_or_else(|| GraphError::index_not_found(label, property))
    }

    /// Compare every property index with a rebuild from the stored nodes.
    pub fn verify_indexes(&self) -> Result<(), String> {
        self.indexes.verify(self.nodes.values())
    }

    fn check_indexes(&self) {
        if !self.config.verify_indexes || self.indexes.is_empty() {
            return;
        }
        if let Err(msg) = self.verify_indexes() {
            error!("index verification failed: {}", msg);
            debug_assert!(false, "index verification failed: {}", msg);
        }
    }

    // ==================== Statistics ====================

    /// Get the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of relationships in the graph.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Get all node IDs, in no particular order.
    pub fn all_node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }
}
