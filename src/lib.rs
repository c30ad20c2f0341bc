//! Labeled CSR graph storage and indexing for subgraph matching.

pub mod data;
pub mod error;
pub mod memory_manager;
pub mod types;

pub(crate) mod tools;
