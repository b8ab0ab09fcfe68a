//! Kestrel Mutation
//!
//! Execute write operations: MERGE, CREATE and the update stage that
//! follows them (SET/REMOVE/DELETE).
//!
//! Responsibilities:
//! - Match-or-create a whole pattern per upstream row
//! - Create pattern instances around pre-bound variables
//! - Apply per-row updates, detaching relationships on node deletion
//! - Count what a statement changed
//!
//! # Module Structure
//!
//! - `executor` - Main MutationExecutor that coordinates operations
//! - `merge` - Lazy per-row MERGE stream
//! - `ops/` - Individual operation implementations (create, set, delete)
//! - `stats` - Statement statistics
//! - `error` - Error types for mutation failures

mod error;
mod executor;
mod merge;
mod ops;
mod stats;

pub use error::{MutationError, MutationResult};
pub use executor::MutationExecutor;
pub use merge::MergeStream;
pub use ops::{UpdateAction, UpdateOp};
pub use stats::Statistics;
