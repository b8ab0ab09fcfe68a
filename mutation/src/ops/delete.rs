//! DELETE - removes nodes (detaching their relationships) and relationships.

use kestrel_core::EntityRef;
use kestrel_graph::Graph;
use std::collections::HashSet;

use crate::error::MutationResult;
use crate::stats::StatsCollector;

/// Delete an entity and remember it, along with any relationship it took
/// down, in `deleted`.
pub fn delete_entity(
    graph: &mut Graph,
    stats: &mut StatsCollector,
    deleted: &mut HashSet<EntityRef>,
    target: EntityRef,
) -> MutationResult<()> {
    match target {
        EntityRef::Node(id) => {
            let detached = graph.delete_node(id)?;
            stats.node_deleted(detached.len());
            deleted.extend(detached.into_iter().map(EntityRef::Relationship));
        }
        EntityRef::Relationship(id) => {
            graph.delete_relationship(id)?;
            stats.relationship_deleted();
        }
    }
    deleted.insert(target);
    Ok(())
}
