//! Kestrel Pattern
//!
//! Describe path patterns, compile them and match them against the graph.
//!
//! Responsibilities:
//! - Build node/relationship descriptors into path patterns
//! - Reject contradictory patterns before anything is executed
//! - Find every whole-pattern assignment, honouring pre-bound variables
//! - Carry binding rows between pipeline stages

mod binding;
mod error;
mod matcher;
mod pattern;

pub use binding::{Binding, BindingRow};
pub use error::{PatternError, PatternResult};
pub use matcher::{MatchPlan, MatchStep, Matcher};
pub use pattern::{
    CompiledPattern, Direction, NodePattern, NodeSlot, PathPattern, RelPattern, RelSlot,
};
