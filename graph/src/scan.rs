//! Node scans: predicates, strategy selection and execution.
//!
//! A scan looks for nodes carrying an optional label whose properties
//! satisfy a conjunction of comparison predicates. The graph picks one of
//! three strategies:
//! - Index scan: one predicate is answered by a property index and the rest
//!   are applied as residual filters
//! - Label scan: every node carrying the label is filtered
//! - All node scan: no label given, every node is filtered

use crate::Graph;
use kestrel_core::{NodeId, Value};
use log::debug;
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a property predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Evaluate `value <op> operand`.
    ///
    /// Ordering operators only hold between values of the same type rank.
    /// A null on either side never matches.
    pub fn matches(&self, value: &Value, operand: &Value) -> bool {
        if value.is_null() || operand.is_null() {
            return false;
        }
        match self {
            CompareOp::Eq => value.equals(operand),
            CompareOp::Ne => !value.equals(operand),
            CompareOp::Lt => value.compare(operand) == Some(Ordering::Less),
            CompareOp::Le => matches!(
                value.compare(operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            CompareOp::Gt => value.compare(operand) == Some(Ordering::Greater),
            CompareOp::Ge => matches!(
                value.compare(operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    // Lower is better when picking the predicate an index answers.
    fn selectivity_rank(&self) -> u8 {
        match self {
            CompareOp::Eq => 0,
            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => 1,
            CompareOp::Ne => 2,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `property <op> value` on a scanned node.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPredicate {
    pub key: String,
    pub op: CompareOp,
    pub value: Value,
}

impl PropertyPredicate {
    pub fn new(key: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, CompareOp::Eq, value)
    }

    /// Evaluate against a node's property, absent properties being null.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        value.is_some_and(|v| self.op.matches(v, &self.value))
    }
}

impl fmt::Display for PropertyPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.key, self.op, self.value)
    }
}

/// The strategy chosen for a node scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPlan {
    /// Answer `index` through the property index on (label, index.key).
    IndexScan {
        label: String,
        index: PropertyPredicate,
        residual: Vec<PropertyPredicate>,
    },
    /// Filter every node carrying the label.
    LabelScan {
        label: String,
        filters: Vec<PropertyPredicate>,
    },
    /// Filter every node in the graph.
    AllNodesScan { filters: Vec<PropertyPredicate> },
}

impl ScanPlan {
    pub fn is_index_scan(&self) -> bool {
        matches!(self, ScanPlan::IndexScan { .. })
    }

    /// Short operator name, as shown in execution plans.
    pub fn name(&self) -> &'static str {
        match self {
            ScanPlan::IndexScan { .. } => "Index Scan",
            ScanPlan::LabelScan { .. } => "Label Scan",
            ScanPlan::AllNodesScan { .. } => "All Node Scan",
        }
    }
}

impl fmt::Display for ScanPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters = match self {
            ScanPlan::IndexScan {
                label,
                index,
                residual,
            } => {
                write!(f, "{} | :{}({})", self.name(), label, index)?;
                residual
            }
            ScanPlan::LabelScan { label, filters } => {
                write!(f, "{} | :{}", self.name(), label)?;
                filters
            }
            ScanPlan::AllNodesScan { filters } => {
                write!(f, "{}", self.name())?;
                filters
            }
        };
        for filter in filters {
            write!(f, " | Filter {}", filter)?;
        }
        Ok(())
    }
}

impl Graph {
    /// Choose how to find nodes with `label` satisfying every predicate.
    pub fn plan_scan(&self, label: Option<&str>, predicates: &[PropertyPredicate]) -> ScanPlan {
        let Some(label) = label else {
            return ScanPlan::AllNodesScan {
                filters: predicates.to_vec(),
            };
        };

        let indexed = predicates
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.value.is_null() && self.has_index(label, &p.key))
            .min_by_key(|(_, p)| p.op.selectivity_rank())
            .map(|(i, _)| i);

        let plan = match indexed {
            Some(i) => {
                let mut residual = predicates.to_vec();
                let index = residual.remove(i);
                ScanPlan::IndexScan {
                    label: label.to_string(),
                    index,
                    residual,
                }
            }
            None => ScanPlan::LabelScan {
                label: label.to_string(),
                filters: predicates.to_vec(),
            },
        };
        debug!("scan plan: {}", plan);
        plan
    }

    /// Run a scan plan.
    ///
    /// Index scans return nodes ascending by the indexed value, label and
    /// full scans ascending by id.
    pub fn execute_scan(&self, plan: &ScanPlan) -> Vec<NodeId> {
        match plan {
            ScanPlan::IndexScan {
                label,
                index,
                residual,
            } => self
                .range_scan(label, &index.key, index.op, &index.value)
                .unwrap_or_default()
                .into_iter()
                .filter(|id| self.node_matches(*id, residual))
                .collect(),
            ScanPlan::LabelScan { label, filters } => self
                .nodes_with_label(label)
                .filter(|id| self.node_matches(*id, filters))
                .collect(),
            ScanPlan::AllNodesScan { filters } => {
                let mut ids: Vec<NodeId> = self
                    .all_node_ids()
                    .filter(|id| self.node_matches(*id, filters))
                    .collect();
                ids.sort();
                ids
            }
        }
    }

    /// Plan and run a scan in one step.
    pub fn scan(&self, label: Option<&str>, predicates: &[PropertyPredicate]) -> Vec<NodeId> {
        let plan = self.plan_scan(label, predicates);
        self.execute_scan(&plan)
    }

    fn node_matches(&self, id: NodeId, predicates: &[PropertyPredicate]) -> bool {
        self.get_node(id).is_some_and(|node| {
            predicates
                .iter()
                .all(|p| p.matches(node.get_property(&p.key)))
        })
    }
}
