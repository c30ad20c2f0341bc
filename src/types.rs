//! Various types related to the data graph.

/// The vertex id type.
pub type VId = u32;

/// The vertex label type.
pub type VLabel = u32;
