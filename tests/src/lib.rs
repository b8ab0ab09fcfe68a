//! Kestrel Scenario Test Framework
//!
//! A fluent API for running statements against a session and checking
//! the statistics and rows each one reports.
//!
//! # Example
//!
//! ```ignore
//! use kestrel_tests::prelude::*;
//!
//! #[test]
//! fn test() {
//!     Scenario::new("critic")
//!         .step("merge", |s| s.merge(&critic()), |a| a.labels_added(1).nodes_created(1))
//!         .step("merge_again", |s| s.merge(&critic()), |a| a.no_changes())
//!         .run()
//!         .unwrap();
//! }
//! ```

mod error;
mod scenario;

pub use assertion::{Assertion, AssertionBuilder};
pub use error::{ScenarioError, ScenarioResult};
pub use scenario::{Scenario, Step};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::assertion::{Assertion, AssertionBuilder};
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::init_logging;
    pub use crate::scenario::Scenario;
    pub use kestrel_core::{props, NodeId, Value};
    pub use kestrel_graph::{CompareOp, Graph, GraphConfig, PropertyPredicate};
    pub use kestrel_mutation::{Statistics, UpdateOp};
    pub use kestrel_pattern::{BindingRow, NodePattern, PathPattern, RelPattern};
    pub use kestrel_session::{Session, SessionError, StatementResult};
}

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
