//! Pattern matching against the graph.
//!
//! Matching runs in two phases. Planning orders the pattern into steps so
//! that every step after the first seed connects to something already
//! bound, and fills a candidate arena for the slots that have to be seeded
//! by a scan. Execution is a depth-first join over the steps: each step
//! extends the partial assignment or prunes it, so only assignments
//! satisfying the whole pattern at once reach the output.

use crate::{Binding, BindingRow, CompiledPattern, PatternError, PatternResult};
use kestrel_core::{GraphError, NodeId, RelId};
use kestrel_graph::{Graph, ScanPlan};
use log::debug;
use std::fmt;

/// One step of a match plan.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchStep {
    /// A node slot fixed by the upstream row.
    BoundNode { slot: usize, node: NodeId },
    /// A relationship slot fixed by the upstream row; binds its endpoints.
    BoundRel { rel: usize, id: RelId },
    /// Seed a node slot from a scan.
    Scan { slot: usize, plan: ScanPlan },
    /// Follow a relationship slot from the bound node slot `from` to `to`.
    Expand { rel: usize, from: usize, to: usize },
    /// Both endpoints bound: look for a connecting relationship.
    Check { rel: usize },
}

/// Ordered steps plus the candidate arena of the scanned slots.
#[derive(Debug, Clone)]
pub struct MatchPlan {
    pub steps: Vec<MatchStep>,
    arena: Vec<Option<Vec<NodeId>>>,
}

impl MatchPlan {
    /// Candidates gathered for a scanned slot.
    pub fn candidates(&self, slot: usize) -> Option<&[NodeId]> {
        self.arena.get(slot).and_then(|c| c.as_deref())
    }

    /// Whether any scan step uses a property index.
    pub fn uses_index(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, MatchStep::Scan { plan, .. } if plan.is_index_scan()))
    }
}

impl fmt::Display for MatchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match step {
                MatchStep::BoundNode { slot, node } => write!(f, "Bound #{} = {}", slot, node)?,
                MatchStep::BoundRel { rel, id } => write!(f, "Bound rel #{} = {}", rel, id)?,
                MatchStep::Scan { slot, plan } => write!(f, "{} #{}", plan, slot)?,
                MatchStep::Expand { rel, from, to } => {
                    write!(f, "Expand #{} -[#{}]- #{}", from, rel, to)?
                }
                MatchStep::Check { rel } => write!(f, "Check rel #{}", rel)?,
            }
        }
        Ok(())
    }
}

/// A complete assignment of entities to pattern slots.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment {
    nodes: Vec<Option<NodeId>>,
    rels: Vec<Option<RelId>>,
}

/// Pattern matcher that finds all whole-pattern assignments in a graph.
pub struct Matcher<'g> {
    graph: &'g Graph,
}

impl<'g> Matcher<'g> {
    /// Create a new matcher.
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Find every assignment of the pattern, with the upstream row's
    /// variables held fixed.
    ///
    /// Each output row is the upstream row extended by the pattern's named
    /// variables.
    pub fn find_all(
        &self,
        pattern: &CompiledPattern,
        upstream: &BindingRow,
    ) -> PatternResult<Vec<BindingRow>> {
        let plan = self.plan(pattern, upstream)?;
        let assignments = self.execute(pattern, &plan, usize::MAX);
        debug!("pattern matched {} time(s)", assignments.len());
        Ok(assignments
            .iter()
            .map(|a| self.to_row(pattern, a, upstream))
            .collect())
    }

    /// Check if any assignment exists.
    pub fn exists(&self, pattern: &CompiledPattern, upstream: &BindingRow) -> PatternResult<bool> {
        let plan = self.plan(pattern, upstream)?;
        Ok(!self.execute(pattern, &plan, 1).is_empty())
    }

    /// The plan `find_all` would run.
    pub fn explain(
        &self,
        pattern: &CompiledPattern,
        upstream: &BindingRow,
    ) -> PatternResult<MatchPlan> {
        self.plan(pattern, upstream)
    }

    fn plan(&self, pattern: &CompiledPattern, upstream: &BindingRow) -> PatternResult<MatchPlan> {
        let mut steps = Vec::new();
        let mut arena: Vec<Option<Vec<NodeId>>> = vec![None; pattern.nodes.len()];
        let mut bound = vec![false; pattern.nodes.len()];
        let mut placed = vec![false; pattern.rels.len()];

        for (slot, node_slot) in pattern.nodes.iter().enumerate() {
            let Some(var) = &node_slot.var else { continue };
            let Some(binding) = upstream.get(var) else {
                continue;
            };
            let node = binding.as_node().ok_or_else(|| kind_mismatch(var, "node", binding))?;
            if !self.graph.contains_node(node) {
                return Err(GraphError::NodeNotFound(node).into());
            }
            steps.push(MatchStep::BoundNode { slot, node });
            bound[slot] = true;
        }

        for (rel, rel_slot) in pattern.rels.iter().enumerate() {
            let Some(var) = &rel_slot.var else { continue };
            let Some(binding) = upstream.get(var) else {
                continue;
            };
            let id = binding
                .as_relationship()
                .ok_or_else(|| kind_mismatch(var, "relationship", binding))?;
            if self.graph.get_relationship(id).is_none() {
                return Err(GraphError::RelationshipNotFound(id).into());
            }
            steps.push(MatchStep::BoundRel { rel, id });
            placed[rel] = true;
            bound[rel_slot.src] = true;
            bound[rel_slot.dst] = true;
        }

        loop {
            let closed = (0..pattern.rels.len()).find(|&i| {
                let r = &pattern.rels[i];
                !placed[i] && bound[r.src] && bound[r.dst]
            });
            if let Some(rel) = closed {
                steps.push(MatchStep::Check { rel });
                placed[rel] = true;
                continue;
            }

            let frontier = (0..pattern.rels.len()).find(|&i| {
                let r = &pattern.rels[i];
                !placed[i] && (bound[r.src] || bound[r.dst])
            });
            if let Some(rel) = frontier {
                let r = &pattern.rels[rel];
                let (from, to) = if bound[r.src] { (r.src, r.dst) } else { (r.dst, r.src) };
                steps.push(MatchStep::Expand { rel, from, to });
                placed[rel] = true;
                bound[to] = true;
                continue;
            }

            let unbound: Vec<usize> = (0..pattern.nodes.len()).filter(|s| !bound[*s]).collect();
            if unbound.is_empty() {
                break;
            }

            // Seed the next component from its cheapest slot.
            let mut best: Option<(usize, ScanPlan, usize)> = None;
            for slot in unbound {
                let plan = self.scan_plan(pattern, slot);
                let candidates = arena[slot].get_or_insert_with(|| self.graph.execute_scan(&plan));
                let size = candidates.len();
                if best.as_ref().map_or(true, |(_, _, s)| size < *s) {
                    best = Some((slot, plan, size));
                }
            }
            if let Some((slot, plan, _)) = best {
                steps.push(MatchStep::Scan { slot, plan });
                bound[slot] = true;
            }
        }

        // Only seeded slots keep their candidates.
        for (slot, candidates) in arena.iter_mut().enumerate() {
            let seeded = steps
                .iter()
                .any(|s| matches!(s, MatchStep::Scan { slot: seeded, .. } if *seeded == slot));
            if !seeded {
                *candidates = None;
            }
        }

        let plan = MatchPlan { steps, arena };
        debug!("match plan:\n{}", plan);
        Ok(plan)
    }

    /// Scan for a node slot, driven by its rarest label.
    fn scan_plan(&self, pattern: &CompiledPattern, slot: usize) -> ScanPlan {
        let node_slot = &pattern.nodes[slot];
        let label = node_slot
            .labels
            .iter()
            .min_by_key(|l| self.graph.label_count(l))
            .map(String::as_str);
        self.graph.plan_scan(label, &node_slot.predicates())
    }

    fn execute(&self, pattern: &CompiledPattern, plan: &MatchPlan, limit: usize) -> Vec<Assignment> {
        let mut state = Assignment {
            nodes: vec![None; pattern.nodes.len()],
            rels: vec![None; pattern.rels.len()],
        };
        let mut out = Vec::new();
        self.search(pattern, plan, 0, &mut state, &mut out, limit);
        out
    }

    fn search(
        &self,
        pattern: &CompiledPattern,
        plan: &MatchPlan,
        depth: usize,
        state: &mut Assignment,
        out: &mut Vec<Assignment>,
        limit: usize,
    ) {
        if out.len() >= limit {
            return;
        }
        let Some(step) = plan.steps.get(depth) else {
            out.push(state.clone());
            return;
        };

        match step {
            MatchStep::BoundNode { slot, node } => {
                if self.node_fits(pattern, *slot, *node) {
                    state.nodes[*slot] = Some(*node);
                    self.search(pattern, plan, depth + 1, state, out, limit);
                    state.nodes[*slot] = None;
                }
            }
            MatchStep::BoundRel { rel, id } => {
                self.try_rel(pattern, plan, depth, state, out, limit, *rel, *id);
            }
            MatchStep::Scan { slot, .. } => {
                for &node in plan.candidates(*slot).unwrap_or_default() {
                    if out.len() >= limit {
                        break;
                    }
                    if self.node_fits(pattern, *slot, node) {
                        state.nodes[*slot] = Some(node);
                        self.search(pattern, plan, depth + 1, state, out, limit);
                    }
                }
                state.nodes[*slot] = None;
            }
            MatchStep::Expand { rel, from, .. } => {
                let Some(from_node) = state.nodes[*from] else {
                    return;
                };
                let rel_slot = &pattern.rels[*rel];
                let rels = if *from == rel_slot.src {
                    self.graph.edges_from(from_node, Some(&rel_slot.rel_type))
                } else {
                    self.graph.edges_to(from_node, Some(&rel_slot.rel_type))
                };
                for id in rels {
                    if out.len() >= limit {
                        break;
                    }
                    self.try_rel(pattern, plan, depth, state, out, limit, *rel, id);
                }
            }
            MatchStep::Check { rel } => {
                let rel_slot = &pattern.rels[*rel];
                let (Some(src), Some(dst)) = (state.nodes[rel_slot.src], state.nodes[rel_slot.dst])
                else {
                    return;
                };
                for id in self
                    .graph
                    .relationships_between(src, dst, Some(&rel_slot.rel_type))
                {
                    if out.len() >= limit {
                        break;
                    }
                    self.try_rel(pattern, plan, depth, state, out, limit, *rel, id);
                }
            }
        }
    }

    /// Bind relationship slot `rel` to `id` and its endpoints, then recurse.
    #[allow(clippy::too_many_arguments)]
    fn try_rel(
        &self,
        pattern: &CompiledPattern,
        plan: &MatchPlan,
        depth: usize,
        state: &mut Assignment,
        out: &mut Vec<Assignment>,
        limit: usize,
        rel: usize,
        id: RelId,
    ) {
        let rel_slot = &pattern.rels[rel];
        let Some(relationship) = self.graph.get_relationship(id) else {
            return;
        };
        if !rel_slot.accepts(relationship) || state.rels.contains(&Some(id)) {
            return;
        }

        let saved = (state.nodes[rel_slot.src], state.nodes[rel_slot.dst]);
        for (slot, node) in [(rel_slot.src, relationship.src), (rel_slot.dst, relationship.dst)] {
            match state.nodes[slot] {
                Some(existing) if existing != node => {
                    (state.nodes[rel_slot.src], state.nodes[rel_slot.dst]) = saved;
                    return;
                }
                Some(_) => {}
                None if self.node_fits(pattern, slot, node) => state.nodes[slot] = Some(node),
                None => {
                    (state.nodes[rel_slot.src], state.nodes[rel_slot.dst]) = saved;
                    return;
                }
            }
        }

        state.rels[rel] = Some(id);
        self.search(pattern, plan, depth + 1, state, out, limit);
        state.rels[rel] = None;
        (state.nodes[rel_slot.src], state.nodes[rel_slot.dst]) = saved;
    }

    fn node_fits(&self, pattern: &CompiledPattern, slot: usize, node: NodeId) -> bool {
        self.graph
            .get_node(node)
            .is_some_and(|n| pattern.nodes[slot].accepts(n))
    }

    fn to_row(&self, pattern: &CompiledPattern, a: &Assignment, upstream: &BindingRow) -> BindingRow {
        pattern.bind_row(upstream, &a.nodes, &a.rels)
    }
}

fn kind_mismatch(var: &str, expected: &'static str, found: Binding) -> PatternError {
    PatternError::BindingKindMismatch {
        name: var.to_string(),
        expected,
        found: found.kind(),
    }
}
