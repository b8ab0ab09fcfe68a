//! Pattern creation - instantiates every unbound entity of a pattern.

use kestrel_core::{EntityRef, GraphError, NodeId};
use kestrel_graph::Graph;
use kestrel_pattern::{BindingRow, CompiledPattern, PatternError};
use log::debug;
use std::collections::HashSet;

use crate::error::{MutationError, MutationResult};
use crate::stats::StatsCollector;

/// Create one instance of the pattern around the upstream row's bindings.
///
/// Pre-bound nodes are reused and must satisfy their descriptors; every
/// other node and every relationship is created fresh. Validation happens
/// before the first write.
///
/// Ids handed out here may be recycled from entities deleted earlier in
/// the statement, so they are dropped from `deleted`.
pub fn create_pattern(
    graph: &mut Graph,
    stats: &mut StatsCollector,
    deleted: &mut HashSet<EntityRef>,
    pattern: &CompiledPattern,
    upstream: &BindingRow,
) -> MutationResult<BindingRow> {
    let mut nodes: Vec<Option<NodeId>> = Vec::with_capacity(pattern.nodes.len());
    for slot in &pattern.nodes {
        let bound = match slot.var.as_deref().and_then(|v| upstream.get(v)) {
            Some(binding) => {
                let var = slot.display_name();
                let id = binding.as_node().ok_or_else(|| PatternError::BindingKindMismatch {
                    name: var.to_string(),
                    expected: "node",
                    found: binding.kind(),
                })?;
                let node = graph.get_node(id).ok_or(GraphError::NodeNotFound(id))?;
                if !slot.accepts(node) {
                    return Err(MutationError::bound_constraint_violation(var));
                }
                Some(id)
            }
            None => None,
        };
        nodes.push(bound);
    }
    if let Some(rel) = pattern
        .rels
        .iter()
        .find(|r| r.var.as_deref().is_some_and(|v| upstream.contains(v)))
    {
        return Err(MutationError::bound_relationship(rel.display_name()));
    }

    let mut created = Vec::with_capacity(pattern.nodes.len());
    for (slot, bound) in pattern.nodes.iter().zip(nodes) {
        let id = match bound {
            Some(id) => id,
            None => {
                for label in &slot.labels {
                    stats.label_attached(label, graph.label_catalog().contains(label));
                }
                let properties = slot.creation_properties();
                stats.node_created(properties.len());
                let id = graph.create_node(slot.labels.clone(), properties);
                deleted.remove(&EntityRef::from(id));
                id
            }
        };
        created.push(id);
    }

    let mut rels = Vec::with_capacity(pattern.rels.len());
    for slot in &pattern.rels {
        let properties = slot.creation_properties();
        let count = properties.len();
        let id = graph.create_relationship(
            &slot.rel_type,
            created[slot.src],
            created[slot.dst],
            properties,
        )?;
        stats.relationship_created(count);
        deleted.remove(&EntityRef::from(id));
        rels.push(Some(id));
    }

    let nodes: Vec<Option<NodeId>> = created.into_iter().map(Some).collect();
    let row = pattern.bind_row(upstream, &nodes, &rels);
    debug!("created pattern instance {}", row);
    Ok(row)
}
