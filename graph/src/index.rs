//! Indexes for efficient graph lookups.
//!
//! The label, relationship-type and adjacency indexes are maintained for
//! every entity. Property indexes exist only for declared (label, property)
//! pairs and are kept in sync through the [`IndexManager`] callbacks.

use crate::scan::CompareOp;
use kestrel_core::{GraphError, GraphResult, Node, NodeId, RelId, Value};
use log::{info, trace};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Membership index: name -> ordered set of ids.
#[derive(Debug)]
pub struct MemberIndex<Id> {
    index: HashMap<String, BTreeSet<Id>>,
}

impl<Id> Default for MemberIndex<Id> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
        }
    }
}

impl<Id: Ord + Copy> MemberIndex<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, id: Id) {
        self.index.entry(name.to_string()).or_default().insert(id);
    }

    pub fn remove(&mut self, name: &str, id: Id) {
        if let Some(set) = self.index.get_mut(name) {
            set.remove(&id);
            if set.is_empty() {
                self.index.remove(name);
            }
        }
    }

    /// Ids under a name, ascending.
    pub fn get(&self, name: &str) -> impl Iterator<Item = Id> + '_ {
        self.index
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn count(&self, name: &str) -> usize {
        self.index.get(name).map_or(0, BTreeSet::len)
    }
}

/// Label -> nodes carrying it.
pub type LabelIndex = MemberIndex<NodeId>;

type TypedRels = HashMap<String, BTreeSet<RelId>>;

/// Adjacency index: NodeId -> { outgoing: Map<type, Set<RelId>>, incoming: ... }
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    outgoing: HashMap<NodeId, TypedRels>,
    incoming: HashMap<NodeId, TypedRels>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rel_id: RelId, rel_type: &str, src: NodeId, dst: NodeId) {
        self.outgoing
            .entry(src)
            .or_default()
            .entry(rel_type.to_string())
            .or_default()
            .insert(rel_id);
        self.incoming
            .entry(dst)
            .or_default()
            .entry(rel_type.to_string())
            .or_default()
            .insert(rel_id);
    }

    pub fn remove(&mut self, rel_id: RelId, rel_type: &str, src: NodeId, dst: NodeId) {
        Self::remove_from(&mut self.outgoing, src, rel_type, rel_id);
        Self::remove_from(&mut self.incoming, dst, rel_type, rel_id);
    }

    fn remove_from(side: &mut HashMap<NodeId, TypedRels>, node: NodeId, rel_type: &str, rel_id: RelId) {
        if let Some(type_map) = side.get_mut(&node) {
            if let Some(set) = type_map.get_mut(rel_type) {
                set.remove(&rel_id);
                if set.is_empty() {
                    type_map.remove(rel_type);
                }
            }
            if type_map.is_empty() {
                side.remove(&node);
            }
        }
    }

    /// Relationships leaving a node, ascending by id.
    pub fn edges_from(&self, node_id: NodeId, rel_type: Option<&str>) -> Vec<RelId> {
        Self::collect(&self.outgoing, node_id, rel_type)
    }

    /// Relationships entering a node, ascending by id.
    pub fn edges_to(&self, node_id: NodeId, rel_type: Option<&str>) -> Vec<RelId> {
        Self::collect(&self.incoming, node_id, rel_type)
    }

    /// Every relationship touching a node. Self-loops appear once.
    pub fn edges_involving(&self, node_id: NodeId) -> Vec<RelId> {
        let mut all: BTreeSet<RelId> = self.edges_from(node_id, None).into_iter().collect();
        all.extend(self.edges_to(node_id, None));
        all.into_iter().collect()
    }

    fn collect(side: &HashMap<NodeId, TypedRels>, node_id: NodeId, rel_type: Option<&str>) -> Vec<RelId> {
        let Some(type_map) = side.get(&node_id) else {
            return Vec::new();
        };
        let mut rels: Vec<RelId> = match rel_type {
            Some(t) => type_map
                .get(t)
                .into_iter()
                .flat_map(|set| set.iter().copied())
                .collect(),
            None => type_map.values().flat_map(|set| set.iter().copied()).collect(),
        };
        rels.sort();
        rels
    }
}

/// A property value ordered by [`Value::index_cmp`].
#[derive(Debug, Clone)]
pub struct IndexKey(pub Value);

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.index_cmp(&other.0)
    }
}

/// Ordered index over one property of the nodes carrying one label.
///
/// Holds exactly the nodes that carry the label and have a non-null value
/// for the property, keyed by that value. Values equal under
/// [`Value::index_cmp`] (such as `1` and `1.0`, or `0.0` and `-0.0`) share
/// an entry.
#[derive(Debug)]
pub struct PropertyIndex {
    label: String,
    property: String,
    entries: BTreeMap<IndexKey, BTreeSet<NodeId>>,
    len: usize,
}

impl PropertyIndex {
    pub fn new(label: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            property: property.into(),
            entries: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Number of (value, node) entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: &Value, node_id: NodeId) {
        if value.is_null() {
            return;
        }
        if self
            .entries
            .entry(IndexKey(value.clone()))
            .or_default()
            .insert(node_id)
        {
            self.len += 1;
        }
    }

    pub fn remove(&mut self, value: &Value, node_id: NodeId) {
        let key = IndexKey(value.clone());
        if let Some(set) = self.entries.get_mut(&key) {
            if set.remove(&node_id) {
                self.len -= 1;
            }
            if set.is_empty() {
                self.entries.remove(&key);
            }
        }
    }

    /// Nodes whose value satisfies `value <op> operand`, ascending by value
    /// then by node id.
    pub fn scan(&self, op: CompareOp, operand: &Value) -> Vec<NodeId> {
        if operand.is_null() {
            return Vec::new();
        }
        let key = IndexKey(operand.clone());
        let rank = operand.rank();
        let candidates: Box<dyn Iterator<Item = (&IndexKey, &BTreeSet<NodeId>)> + '_> = match op {
            CompareOp::Eq => Box::new(self.entries.range(key.clone()..=key)),
            CompareOp::Lt | CompareOp::Le => Box::new(
                self.entries
                    .range(..=key)
                    .skip_while(move |(k, _)| k.0.rank() != rank),
            ),
            CompareOp::Gt | CompareOp::Ge => Box::new(
                self.entries
                    .range(key..)
                    .take_while(move |(k, _)| k.0.rank() == rank),
            ),
            CompareOp::Ne => Box::new(self.entries.iter()),
        };
        candidates
            .filter(|(k, _)| op.matches(&k.0, operand))
            .flat_map(|(_, set)| set.iter().copied())
            .collect()
    }

    /// Every (value, node) entry in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, NodeId)> + '_ {
        self.entries
            .iter()
            .flat_map(|(k, set)| set.iter().map(move |id| (&k.0, *id)))
    }
}

/// Registry of declared property indexes and their maintenance hooks.
///
/// The graph calls one hook per primitive mutation, after the entity
/// reflects the change.
#[derive(Debug, Default)]
pub struct IndexManager {
    indexes: HashMap<String, HashMap<String, PropertyIndex>>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_index(&self, label: &str, property: &str) -> bool {
        self.get(label, property).is_some()
    }

    pub fn get(&self, label: &str, property: &str) -> Option<&PropertyIndex> {
        self.indexes.get(label).and_then(|props| props.get(property))
    }

    /// Declared indexes as (label, property), sorted.
    pub fn list(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .indexes
            .iter()
            .flat_map(|(label, props)| props.keys().map(move |p| (label.clone(), p.clone())))
            .collect();
        out.sort();
        out
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Declare an index and populate it from the given nodes.
    pub fn create_index<'a>(
        &mut self,
        label: &str,
        property: &str,
        nodes: impl Iterator<Item = &'a Node>,
    ) -> GraphResult<()> {
        if self.has_index(label, property) {
            return Err(GraphError::index_already_exists(label, property));
        }
        let mut index = PropertyIndex::new(label, property);
        for node in nodes.filter(|n| n.has_label(label)) {
            if let Some(value) = node.get_property(property) {
                index.insert(value, node.id);
            }
        }
        info!(
            "created index :{}({}) with {} entries",
            label,
            property,
            index.len()
        );
        self.indexes
            .entry(label.to_string())
            .or_default()
            .insert(property.to_string(), index);
        Ok(())
    }

    pub fn drop_index(&mut self, label: &str, property: &str) -> GraphResult<()> {
        let props = self
            .indexes
            .get_mut(label)
            .ok_or_else(|| GraphError::index_not_found(label, property))?;
        props
            .remove(property)
            .ok_or_else(|| GraphError::index_not_found(label, property))?;
        if props.is_empty() {
            self.indexes.remove(label);
        }
        info!("dropped index :{}({})", label, property);
        Ok(())
    }

    /// Scan one index. `None` if the index is not declared.
    pub fn range_scan(
        &self,
        label: &str,
        property: &str,
        op: CompareOp,
        operand: &Value,
    ) -> Option<Vec<NodeId>> {
        self.get(label, property).map(|index| index.scan(op, operand))
    }

    pub fn on_node_created(&mut self, node: &Node) {
        for label in &node.labels {
            self.insert_all(node, label);
        }
    }

    /// A property changed from `old` to `new`; `None` means absent.
    pub fn on_property_set(
        &mut self,
        node: &Node,
        key: &str,
        old: Option<&Value>,
        new: Option<&Value>,
    ) {
        for label in &node.labels {
            let Some(index) = self
                .indexes
                .get_mut(label)
                .and_then(|props| props.get_mut(key))
            else {
                continue;
            };
            trace!("index :{}({}) update on {}", label, key, node.id);
            if let Some(old) = old {
                index.remove(old, node.id);
            }
            if let Some(new) = new {
                index.insert(new, node.id);
            }
        }
    }

    pub fn on_label_added(&mut self, node: &Node, label: &str) {
        self.insert_all(node, label);
    }

    pub fn on_label_removed(&mut self, node: &Node, label: &str) {
        self.remove_all(node, label);
    }

    pub fn on_node_deleted(&mut self, node: &Node) {
        for label in &node.labels {
            self.remove_all(node, label);
        }
    }

    fn insert_all(&mut self, node: &Node, label: &str) {
        let Some(props) = self.indexes.get_mut(label) else {
            return;
        };
        for (property, index) in props.iter_mut() {
            if let Some(value) = node.get_property(property) {
                trace!("index :{}({}) insert {}", label, property, node.id);
                index.insert(value, node.id);
            }
        }
    }

    fn remove_all(&mut self, node: &Node, label: &str) {
        let Some(props) = self.indexes.get_mut(label) else {
            return;
        };
        for (property, index) in props.iter_mut() {
            if let Some(value) = node.get_property(property) {
                trace!("index :{}({}) remove {}", label, property, node.id);
                index.remove(value, node.id);
            }
        }
    }

    /// Check every index against a rebuild from the given nodes.
    pub fn verify<'a>(&self, nodes: impl Iterator<Item = &'a Node> + Clone) -> Result<(), String> {
        for (label, props) in &self.indexes {
            for (property, index) in props {
                let mut expected: Vec<(NodeId, Value)> = nodes
                    .clone()
                    .filter(|n| n.has_label(label))
                    .filter_map(|n| n.get_property(property).map(|v| (n.id, v.clone())))
                    .collect();
                expected.sort_by_key(|(id, _)| *id);

                let mut actual: Vec<(NodeId, Value)> =
                    index.iter().map(|(v, id)| (id, v.clone())).collect();
                actual.sort_by_key(|(id, _)| *id);

                if expected.len() != actual.len() {
                    return Err(format!(
                        "index :{}({}) holds {} entries, expected {}",
                        label,
                        property,
                        actual.len(),
                        expected.len()
                    ));
                }
                for ((eid, ev), (aid, av)) in expected.iter().zip(actual.iter()) {
                    if eid != aid || ev.index_cmp(av) != Ordering::Equal {
                        return Err(format!(
                            "index :{}({}) maps {} to {}, node holds {} = {}",
                            label, property, aid, av, eid, ev
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
