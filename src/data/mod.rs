//! The data graph.
//!
//! A [`GraphLoader`] reads a graph from the text format or the binary layout
//! into an [`Adjacency`], then derives the [`LabelIndex`] and, in optimized
//! mode, the [`Nlf`] and [`LabelOffsets`]. The resulting [`Graph`] never
//! changes and can be shared between threads.

pub use adjacency::Adjacency;
pub use binary::{BinaryGraph, BinaryPaths, INT_SIZE};
pub use core_table::CoreTable;
pub use graph::{Graph, GraphLoader, DEFAULT_LABEL_LIMIT};
pub use info::GraphInfo;
pub use label_index::LabelIndex;
pub use nlf::{LabelOffsets, Nlf};
pub use verify::{verify, Violation};

mod adjacency;
mod binary;
mod core_table;
mod graph;
mod info;
mod label_index;
mod nlf;
mod text;
mod verify;
