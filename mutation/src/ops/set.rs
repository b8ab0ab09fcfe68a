//! SET and REMOVE - property and label updates.

use kestrel_core::{EntityRef, Value};
use kestrel_graph::Graph;

use crate::error::{MutationError, MutationResult};
use crate::stats::StatsCollector;

/// Write a property. Every write counts, changed or not.
pub fn set_property(
    graph: &mut Graph,
    stats: &mut StatsCollector,
    target: EntityRef,
    key: &str,
    value: Value,
) -> MutationResult<()> {
    graph.set_property(target, key, value)?;
    stats.property_set();
    Ok(())
}

pub fn add_label(
    graph: &mut Graph,
    stats: &mut StatsCollector,
    var: &str,
    target: EntityRef,
    label: &str,
) -> MutationResult<()> {
    let node = target
        .as_node()
        .ok_or_else(|| MutationError::invalid_update(var, "labels apply to nodes only"))?;
    let known = graph.label_catalog().contains(label);
    if graph.add_label(node, label)? {
        stats.label_attached(label, known);
    }
    Ok(())
}

pub fn remove_label(graph: &mut Graph, var: &str, target: EntityRef, label: &str) -> MutationResult<()> {
    let node = target
        .as_node()
        .ok_or_else(|| MutationError::invalid_update(var, "labels apply to nodes only"))?;
    graph.remove_label(node, label)?;
    Ok(())
}
