//! Path pattern descriptors and their compiled form.

use crate::{Binding, BindingRow, PatternError, PatternResult};
use kestrel_core::{Node, NodeId, Properties, RelId, Relationship, Value};
use kestrel_graph::PropertyPredicate;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Direction of a relationship descriptor, read left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(a)-[]->(b)`
    Outgoing,
    /// `(a)<-[]-(b)`
    Incoming,
}

/// Node descriptor: `(var:Label {key: value, ...})`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePattern {
    pub var: Option<String>,
    pub label: Option<String>,
    pub properties: Vec<(String, Value)>,
}

impl NodePattern {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn named(var: impl Into<String>) -> Self {
        Self {
            var: Some(var.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }
}

/// Relationship descriptor: `-[var:TYPE {key: value, ...}]->`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelPattern {
    pub var: Option<String>,
    pub rel_type: String,
    pub direction: Direction,
    pub properties: Vec<(String, Value)>,
}

impl RelPattern {
    pub fn new(rel_type: impl Into<String>, direction: Direction) -> Self {
        Self {
            var: None,
            rel_type: rel_type.into(),
            direction,
            properties: Vec::new(),
        }
    }

    pub fn outgoing(rel_type: impl Into<String>) -> Self {
        Self::new(rel_type, Direction::Outgoing)
    }

    pub fn incoming(rel_type: impl Into<String>) -> Self {
        Self::new(rel_type, Direction::Incoming)
    }

    pub fn with_var(mut self, var: impl Into<String>) -> Self {
        self.var = Some(var.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }
}

/// A chain of node descriptors joined by relationship descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathPattern {
    pub nodes: Vec<NodePattern>,
    pub rels: Vec<RelPattern>,
}

impl PathPattern {
    pub fn start(node: NodePattern) -> Self {
        Self {
            nodes: vec![node],
            rels: Vec::new(),
        }
    }

    /// Extend the path by one hop from its last node.
    pub fn then(mut self, rel: RelPattern, node: NodePattern) -> Self {
        self.rels.push(rel);
        self.nodes.push(node);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One distinct node of a compiled pattern.
///
/// Every occurrence of a named variable shares one slot; anonymous
/// descriptors get a slot each.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSlot {
    pub var: Option<String>,
    pub labels: Vec<String>,
    pub properties: Vec<(String, Value)>,
}

impl NodeSlot {
    /// Equality predicates for the slot's property constraints.
    pub fn predicates(&self) -> Vec<PropertyPredicate> {
        self.properties
            .iter()
            .map(|(k, v)| PropertyPredicate::eq(k.as_str(), v.clone()))
            .collect()
    }

    /// Whether an existing node satisfies every constraint of the slot.
    pub fn accepts(&self, node: &Node) -> bool {
        self.labels.iter().all(|l| node.has_label(l))
            && properties_hold(&self.properties, &node.properties)
    }

    pub fn creation_properties(&self) -> Properties {
        self.properties.iter().cloned().collect()
    }

    pub fn display_name(&self) -> &str {
        self.var.as_deref().unwrap_or("_")
    }
}

/// One relationship of a compiled pattern, endpoints as node slots.
#[derive(Debug, Clone, PartialEq)]
pub struct RelSlot {
    pub var: Option<String>,
    pub rel_type: String,
    pub src: usize,
    pub dst: usize,
    pub properties: Vec<(String, Value)>,
}

impl RelSlot {
    /// Whether an existing relationship satisfies the type and property
    /// constraints. Endpoints are checked by the matcher.
    pub fn accepts(&self, rel: &Relationship) -> bool {
        rel.rel_type == self.rel_type && properties_hold(&self.properties, &rel.properties)
    }

    pub fn creation_properties(&self) -> Properties {
        self.properties.iter().cloned().collect()
    }

    pub fn display_name(&self) -> &str {
        self.var.as_deref().unwrap_or("_")
    }
}

fn properties_hold(constraints: &[(String, Value)], properties: &Properties) -> bool {
    constraints
        .iter()
        .all(|(k, v)| properties.get(k).is_some_and(|actual| actual.equals(v)))
}

/// Slot reference in first-occurrence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotRef {
    Node(usize),
    Rel(usize),
}

/// A validated pattern ready for matching or creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPattern {
    pub nodes: Vec<NodeSlot>,
    pub rels: Vec<RelSlot>,
    order: Vec<SlotRef>,
}

impl CompiledPattern {
    /// Compile a single path.
    pub fn compile(path: &PathPattern) -> PatternResult<Self> {
        Self::compile_paths(std::slice::from_ref(path))
    }

    /// Compile several comma-separated paths sharing their variables.
    pub fn compile_paths(paths: &[PathPattern]) -> PatternResult<Self> {
        if paths.iter().all(PathPattern::is_empty) {
            return Err(PatternError::EmptyPattern);
        }

        let mut compiler = Compiler::default();
        for path in paths {
            compiler.add_path(path)?;
        }
        Ok(compiler.finish())
    }

    pub fn node_slot(&self, var: &str) -> Option<usize> {
        self.nodes.iter().position(|s| s.var.as_deref() == Some(var))
    }

    pub fn rel_slot(&self, var: &str) -> Option<usize> {
        self.rels.iter().position(|s| s.var.as_deref() == Some(var))
    }

    /// Named variables in order of first occurrence.
    pub fn variables(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|slot| match slot {
                SlotRef::Node(i) => self.nodes[*i].var.as_deref(),
                SlotRef::Rel(i) => self.rels[*i].var.as_deref(),
            })
            .collect()
    }

    /// Number of distinct entities the pattern describes.
    pub fn descriptor_count(&self) -> usize {
        self.nodes.len() + self.rels.len()
    }

    /// Extend `upstream` with the named variables of one assignment, in
    /// order of first occurrence. Unassigned slots are skipped.
    pub fn bind_row(
        &self,
        upstream: &BindingRow,
        nodes: &[Option<NodeId>],
        rels: &[Option<RelId>],
    ) -> BindingRow {
        let mut row = upstream.clone();
        for slot in &self.order {
            let (var, binding) = match *slot {
                SlotRef::Node(i) => (&self.nodes[i].var, nodes[i].map(Binding::Node)),
                SlotRef::Rel(i) => (&self.rels[i].var, rels[i].map(Binding::Relationship)),
            };
            if let (Some(var), Some(binding)) = (var, binding) {
                row.insert(var.clone(), binding);
            }
        }
        row
    }
}

#[derive(Default)]
struct Compiler {
    nodes: Vec<NodeSlot>,
    rels: Vec<RelSlot>,
    order: Vec<SlotRef>,
    node_vars: HashMap<String, usize>,
    rel_vars: HashSet<String>,
}

impl Compiler {
    fn add_path(&mut self, path: &PathPattern) -> PatternResult<()> {
        if path.is_empty() && path.rels.is_empty() {
            return Ok(());
        }
        if path.rels.len() + 1 != path.nodes.len() {
            return Err(PatternError::MalformedPath {
                nodes: path.nodes.len(),
                rels: path.rels.len(),
            });
        }

        let mut left = self.add_node(&path.nodes[0])?;
        for (rel, node) in path.rels.iter().zip(&path.nodes[1..]) {
            // the relationship precedes its right-hand node in path order
            let mark = self.order.len();
            let right = self.add_node(node)?;
            let (src, dst) = match rel.direction {
                Direction::Outgoing => (left, right),
                Direction::Incoming => (right, left),
            };
            let slot = self.add_rel(rel, src, dst)?;
            self.order.insert(mark, SlotRef::Rel(slot));
            left = right;
        }
        Ok(())
    }

    fn add_node(&mut self, node: &NodePattern) -> PatternResult<usize> {
        let display = node.var.as_deref().unwrap_or("_");
        let slot = match &node.var {
            Some(var) if self.rel_vars.contains(var) => {
                return Err(PatternError::variable_kind_conflict(var));
            }
            Some(var) => match self.node_vars.get(var) {
                Some(&slot) => slot,
                None => {
                    self.node_vars.insert(var.clone(), self.nodes.len());
                    self.push_node(node.var.clone())
                }
            },
            None => self.push_node(None),
        };

        let entry = &mut self.nodes[slot];
        if let Some(label) = &node.label {
            if !entry.labels.contains(label) {
                entry.labels.push(label.clone());
            }
        }
        merge_properties(display, &mut entry.properties, &node.properties)?;
        Ok(slot)
    }

    fn push_node(&mut self, var: Option<String>) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(NodeSlot {
            var,
            labels: Vec::new(),
            properties: Vec::new(),
        });
        self.order.push(SlotRef::Node(slot));
        slot
    }

    fn add_rel(&mut self, rel: &RelPattern, src: usize, dst: usize) -> PatternResult<usize> {
        if rel.rel_type.is_empty() {
            return Err(PatternError::MissingRelType);
        }
        if let Some(var) = &rel.var {
            if self.node_vars.contains_key(var) {
                return Err(PatternError::variable_kind_conflict(var));
            }
            if !self.rel_vars.insert(var.clone()) {
                return Err(PatternError::duplicate_rel_variable(var));
            }
        }

        let mut properties = Vec::new();
        merge_properties(
            rel.var.as_deref().unwrap_or("_"),
            &mut properties,
            &rel.properties,
        )?;

        let slot = self.rels.len();
        self.rels.push(RelSlot {
            var: rel.var.clone(),
            rel_type: rel.rel_type.clone(),
            src,
            dst,
            properties,
        });
        Ok(slot)
    }

    fn finish(self) -> CompiledPattern {
        CompiledPattern {
            nodes: self.nodes,
            rels: self.rels,
            order: self.order,
        }
    }
}

/// Add literals to a constraint list. A repeated key must repeat its value.
fn merge_properties(
    var: &str,
    into: &mut Vec<(String, Value)>,
    from: &[(String, Value)],
) -> PatternResult<()> {
    for (key, value) in from {
        if value.is_null() {
            return Err(PatternError::null_property(var, key));
        }
        match into.iter().find(|(k, _)| k == key) {
            Some((_, existing)) if existing.index_cmp(value) == Ordering::Equal => {}
            Some(_) => return Err(PatternError::conflicting_property(var, key)),
            None => into.push((key.clone(), value.clone())),
        }
    }
    Ok(())
}
