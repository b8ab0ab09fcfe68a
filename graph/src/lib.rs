//! Kestrel Graph Storage
//!
//! This crate provides the property graph storage with indexed access:
//! - Node and relationship storage
//! - Label index
//! - Adjacency index: find relationships from/to a node
//! - Property indexes on (label, property) pairs, kept in sync with every
//!   node mutation
//! - Node scans choosing between index, label and full scans

mod catalog;
mod config;
mod graph;
mod index;
mod scan;

pub use catalog::*;
pub use config::*;
pub use graph::*;
pub use index::*;
pub use scan::*;
