//! Session: statement entry points over one graph.

use kestrel_core::NodeId;
use kestrel_graph::{Graph, GraphConfig, PropertyPredicate, ScanPlan};
use kestrel_mutation::{MutationExecutor, Statistics, UpdateOp};
use kestrel_pattern::{BindingRow, CompiledPattern, MatchPlan, Matcher, PathPattern};
use log::{debug, info};

use crate::error::SessionResult;
use crate::result::StatementResult;

/// A Kestrel session.
///
/// Statements run one at a time against the owned graph; each takes
/// `&mut self` for its whole duration.
pub struct Session {
    graph: Graph,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session over an empty graph.
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Create a session over an empty graph with the given configuration.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            graph: Graph::with_config(config),
        }
    }

    /// Get a reference to the graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Get a mutable reference to the graph.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    // ==================== MERGE ====================

    /// MERGE as the first stage of a statement.
    pub fn merge(&mut self, pattern: &PathPattern) -> SessionResult<StatementResult> {
        self.merge_with(pattern, [BindingRow::new()], &[])
    }

    /// MERGE once per upstream row, then run `updates` on every output row.
    ///
    /// Each output row is updated before the next upstream row is merged,
    /// so later rows observe entities created and written by earlier ones.
    pub fn merge_with<I>(
        &mut self,
        pattern: &PathPattern,
        upstream: I,
        updates: &[UpdateOp],
    ) -> SessionResult<StatementResult>
    where
        I: IntoIterator<Item = BindingRow>,
    {
        let compiled = CompiledPattern::compile(pattern)?;
        let mut executor = MutationExecutor::new(&mut self.graph);
        let mut rows = Vec::new();
        {
            let mut stream = executor.merge_stream(&compiled, upstream);
            while let Some(row) = stream.next() {
                let row = row?;
                stream.executor().apply(&row, updates)?;
                rows.push(row);
            }
        }

        Ok(Self::finish("MERGE", rows, executor.finish()))
    }

    // ==================== CREATE ====================

    /// CREATE every path as one pattern instance, then run `updates` on
    /// the new row.
    pub fn create(
        &mut self,
        paths: &[PathPattern],
        updates: &[UpdateOp],
    ) -> SessionResult<StatementResult> {
        let compiled = CompiledPattern::compile_paths(paths)?;
        let mut executor = MutationExecutor::new(&mut self.graph);

        let row = executor.create(&compiled, &BindingRow::new())?;
        executor.apply(&row, updates)?;

        Ok(Self::finish("CREATE", vec![row], executor.finish()))
    }

    // ==================== MATCH ====================

    /// MATCH once per upstream row.
    pub fn match_pattern<I>(
        &self,
        pattern: &PathPattern,
        upstream: I,
    ) -> SessionResult<StatementResult>
    where
        I: IntoIterator<Item = BindingRow>,
    {
        let compiled = CompiledPattern::compile(pattern)?;
        let matcher = Matcher::new(&self.graph);
        let mut rows = Vec::new();
        for row in upstream {
            rows.extend(matcher.find_all(&compiled, &row)?);
        }
        debug!("MATCH produced {} row(s)", rows.len());
        Ok(StatementResult::new(rows, Statistics::default()))
    }

    /// MATCH, then run `updates` on every matched row.
    ///
    /// All rows are matched before the first update runs.
    pub fn match_update(
        &mut self,
        pattern: &PathPattern,
        updates: &[UpdateOp],
    ) -> SessionResult<StatementResult> {
        let compiled = CompiledPattern::compile(pattern)?;
        let rows = Matcher::new(&self.graph).find_all(&compiled, &BindingRow::new())?;

        let mut executor = MutationExecutor::new(&mut self.graph);
        for row in &rows {
            executor.apply(row, updates)?;
        }

        Ok(Self::finish("MATCH", rows, executor.finish()))
    }

    /// The step plan MATCH would run for `pattern` with nothing pre-bound.
    pub fn explain_pattern(&self, pattern: &PathPattern) -> SessionResult<MatchPlan> {
        let compiled = CompiledPattern::compile(pattern)?;
        Ok(Matcher::new(&self.graph).explain(&compiled, &BindingRow::new())?)
    }

    // ==================== Indexes ====================

    pub fn create_index(&mut self, label: &str, property: &str) -> SessionResult<StatementResult> {
        self.graph.create_index(label, property)?;
        Ok(Self::finish(
            "CREATE INDEX",
            Vec::new(),
            Statistics {
                indices_created: 1,
                ..Default::default()
            },
        ))
    }

    pub fn drop_index(&mut self, label: &str, property: &str) -> SessionResult<StatementResult> {
        self.graph.drop_index(label, property)?;
        Ok(Self::finish(
            "DROP INDEX",
            Vec::new(),
            Statistics {
                indices_deleted: 1,
                ..Default::default()
            },
        ))
    }

    pub fn has_index(&self, label: &str, property: &str) -> bool {
        self.graph.has_index(label, property)
    }

    /// Nodes with `label` (any node when `None`) satisfying every predicate.
    pub fn find_nodes(&self, label: Option<&str>, predicates: &[PropertyPredicate]) -> Vec<NodeId> {
        self.graph.scan(label, predicates)
    }

    /// The scan strategy `find_nodes` would use.
    pub fn explain(&self, label: Option<&str>, predicates: &[PropertyPredicate]) -> ScanPlan {
        self.graph.plan_scan(label, predicates)
    }

    fn finish(kind: &str, rows: Vec<BindingRow>, stats: Statistics) -> StatementResult {
        info!("{}: {} row(s), {}", kind, rows.len(), stats);
        StatementResult::new(rows, stats)
    }
}
