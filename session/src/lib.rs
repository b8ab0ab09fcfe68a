//! Kestrel Session
//!
//! Statement-level entry points for the query pipeline.
//!
//! Responsibilities:
//! - Own the graph and run one statement at a time
//! - Compile patterns and route them to the matcher or mutation executor
//! - Report rows and statistics per statement

mod error;
mod result;
mod session;

pub use error::{SessionError, SessionResult};
pub use result::StatementResult;
pub use session::Session;
