//! Kestrel Core Types
//!
//! This crate provides the foundational types used throughout Kestrel:
//! - Identity types (NodeId, RelId, EntityRef)
//! - Value types (the tagged scalar Value and its index ordering)
//! - Entity structures (Node, Relationship)
//! - Common error types

mod entity;
mod error;
mod id;
mod value;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use value::*;
