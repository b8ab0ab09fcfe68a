//! Session result types.

use kestrel_mutation::Statistics;
use kestrel_pattern::BindingRow;

/// Result of executing a statement: its output rows and what it changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    /// Output binding rows, in production order.
    pub rows: Vec<BindingRow>,
    /// Statement statistics.
    pub stats: Statistics,
}

impl StatementResult {
    pub fn new(rows: Vec<BindingRow>, stats: Statistics) -> Self {
        Self { rows, stats }
    }

    /// A result carrying only statistics (index DDL).
    pub fn stats_only(stats: Statistics) -> Self {
        Self {
            rows: Vec::new(),
            stats,
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
