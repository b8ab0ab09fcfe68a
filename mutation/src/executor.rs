//! Mutation executor - coordinates mutation operations for one statement.
//!
//! The executor delegates to specialized operation modules in `ops/`:
//! - `ops/create.rs` - pattern instantiation (MERGE fallback, CREATE)
//! - `ops/set.rs` - property and label updates
//! - `ops/delete.rs` - node and relationship deletion

use kestrel_core::EntityRef;
use kestrel_graph::Graph;
use kestrel_pattern::{BindingRow, CompiledPattern, Matcher};
use log::debug;
use std::collections::HashSet;

use crate::error::{MutationError, MutationResult};
use crate::merge::MergeStream;
use crate::ops::{self, UpdateAction, UpdateOp};
use crate::stats::{Statistics, StatsCollector};

/// Mutation executor.
///
/// One executor runs one statement: its statistics cover every pattern
/// instance and every upstream row handled through it.
pub struct MutationExecutor<'g> {
    graph: &'g mut Graph,
    stats: StatsCollector,
    deleted: HashSet<EntityRef>,
}

impl<'g> MutationExecutor<'g> {
    /// Create a new executor.
    pub fn new(graph: &'g mut Graph) -> Self {
        Self {
            graph,
            stats: StatsCollector::new(),
            deleted: HashSet::new(),
        }
    }

    /// Read access to the graph between mutations.
    pub fn graph(&self) -> &Graph {
        &*self.graph
    }

    /// MERGE for one upstream row.
    ///
    /// Returns one row per existing assignment of the whole pattern. If
    /// there is none, the pattern is created as a unit (reusing only the
    /// pre-bound nodes) and the single new row is returned.
    pub fn merge(
        &mut self,
        pattern: &CompiledPattern,
        upstream: &BindingRow,
    ) -> MutationResult<Vec<BindingRow>> {
        let rows = Matcher::new(&*self.graph).find_all(pattern, upstream)?;
        if !rows.is_empty() {
            debug!("MERGE matched {} existing assignment(s)", rows.len());
            return Ok(rows);
        }

        debug!("MERGE found no assignment, creating the pattern");
        let row = ops::create_pattern(
            self.graph,
            &mut self.stats,
            &mut self.deleted,
            pattern,
            upstream,
        )?;
        Ok(vec![row])
    }

    /// MERGE over a sequence of upstream rows, one row at a time.
    pub fn merge_stream<'e, I>(
        &'e mut self,
        pattern: &'e CompiledPattern,
        upstream: I,
    ) -> MergeStream<'e, 'g, I::IntoIter>
    where
        I: IntoIterator<Item = BindingRow>,
    {
        MergeStream::new(self, pattern, upstream.into_iter())
    }

    /// CREATE for one upstream row: always a fresh pattern instance.
    pub fn create(
        &mut self,
        pattern: &CompiledPattern,
        upstream: &BindingRow,
    ) -> MutationResult<BindingRow> {
        ops::create_pattern(
            self.graph,
            &mut self.stats,
            &mut self.deleted,
            pattern,
            upstream,
        )
    }

    /// Apply the update stage to one row, in order.
    pub fn apply(&mut self, row: &BindingRow, updates: &[UpdateOp]) -> MutationResult<()> {
        for update in updates {
            self.apply_one(row, update)?;
        }
        Ok(())
    }

    fn apply_one(&mut self, row: &BindingRow, update: &UpdateOp) -> MutationResult<()> {
        let var = update.var.as_str();
        let target = row
            .get(var)
            .ok_or_else(|| MutationError::unbound_variable(var))?
            .entity();

        if self.deleted.contains(&target) {
            return match update.action {
                UpdateAction::Delete => Ok(()),
                _ => Err(MutationError::deleted_entity(var, target)),
            };
        }

        match &update.action {
            UpdateAction::SetProperty { key, value } => {
                ops::set_property(self.graph, &mut self.stats, target, key, value.clone())
            }
            UpdateAction::RemoveProperty { key } => ops::set_property(
                self.graph,
                &mut self.stats,
                target,
                key,
                kestrel_core::Value::Null,
            ),
            UpdateAction::AddLabel { label } => {
                ops::add_label(self.graph, &mut self.stats, var, target, label)
            }
            UpdateAction::RemoveLabel { label } => ops::remove_label(self.graph, var, target, label),
            UpdateAction::Delete => {
                ops::delete_entity(self.graph, &mut self.stats, &mut self.deleted, target)
            }
        }
    }

    /// DELETE one entity outside a binding row.
    pub fn delete(&mut self, target: EntityRef) -> MutationResult<()> {
        if self.deleted.contains(&target) {
            return Ok(());
        }
        ops::delete_entity(self.graph, &mut self.stats, &mut self.deleted, target)
    }

    /// Counters so far.
    pub fn stats(&self) -> Statistics {
        self.stats.snapshot()
    }

    /// End the statement and return its statistics.
    pub fn finish(self) -> Statistics {
        let stats = self.stats.finish();
        debug!("statement finished: {}", stats);
        stats
    }
}
