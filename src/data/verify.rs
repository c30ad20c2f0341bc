//! Invariant checks over a loaded graph.
//!
//! The graph is shared read-only between the rayon workers.

use super::Graph;
use crate::types::{VId, VLabel};
use derive_more::Display;
use itertools::Itertools;
use rayon::prelude::*;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Violation {
    #[display(fmt = "offsets do not span 2|E| = {} entries", _0)]
    Offsets(usize),
    #[display(fmt = "adjacency of {} is not strictly ascending", _0)]
    Unsorted(VId),
    #[display(fmt = "vertex {} has neighbor {} out of range", _0, _1)]
    OutOfRange(VId, VId),
    #[display(fmt = "edge ({}, {}) is missing its reverse", _0, _1)]
    Asymmetric(VId, VId),
    #[display(fmt = "vertex {} is misplaced in the bucket of label {}", _0, _1)]
    LabelIndex(VId, VLabel),
    #[display(fmt = "label buckets hold {} vertices", _0)]
    LabelIndexSize(usize),
    #[display(fmt = "neighbor label counts of {} do not sum to its degree", _0)]
    NeighborLabels(VId),
}

impl std::error::Error for Violation {}

/// Checks the structural invariants of `graph`, reporting one violation if any.
pub fn verify(graph: &Graph) -> Result<(), Violation> {
    let offsets = graph.adjacency().offsets();
    let num_slots = 2 * graph.num_edges();
    if offsets.first() != Some(&0) || offsets.last() != Some(&num_slots) {
        return Err(Violation::Offsets(num_slots));
    }
    let found = (0..graph.num_vertices() as VId)
        .into_par_iter()
        .find_map_any(|v| verify_vertex(graph, v).err());
    if let Some(violation) = found {
        return Err(violation);
    }
    let found = (0..graph.num_labels() as VLabel)
        .into_par_iter()
        .find_map_any(|label| verify_label(graph, label).err());
    if let Some(violation) = found {
        return Err(violation);
    }
    let size: usize = (0..graph.num_labels() as VLabel)
        .map(|label| graph.vertices_by_label(label).len())
        .sum();
    if size != graph.num_vertices() {
        return Err(Violation::LabelIndexSize(size));
    }
    Ok(())
}

fn verify_vertex(graph: &Graph, v: VId) -> Result<(), Violation> {
    let neighbors = graph.neighbors(v);
    if neighbors.iter().tuple_windows().any(|(a, b)| a >= b) {
        return Err(Violation::Unsorted(v));
    }
    for &n in neighbors {
        if n as usize >= graph.num_vertices() {
            return Err(Violation::OutOfRange(v, n));
        }
        if graph.neighbors(n).binary_search(&v).is_err() {
            return Err(Violation::Asymmetric(v, n));
        }
    }
    if let Some(histogram) = graph.neighbor_label_histogram(v) {
        if histogram.values().sum::<usize>() != graph.degree(v) {
            return Err(Violation::NeighborLabels(v));
        }
    }
    Ok(())
}

fn verify_label(graph: &Graph, label: VLabel) -> Result<(), Violation> {
    let vertices = graph.vertices_by_label(label);
    match vertices
        .iter()
        .tuple_windows()
        .find(|(a, b)| a >= b)
        .map(|(_, &b)| b)
        .or_else(|| vertices.iter().copied().find(|&v| graph.label(v) != label))
    {
        Some(v) => Err(Violation::LabelIndex(v, label)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{Adjacency, GraphLoader},
        error::Source,
    };

    #[test]
    fn test_verify() {
        let input = "t 4 4 v 0 3 2 v 1 1 3 v 2 3 2 v 3 0 1 e 0 1 e 1 2 e 2 0 e 3 1";
        for &optimized in &[false, true] {
            let graph = GraphLoader::new()
                .optimized(optimized)
                .parse_text(input)
                .unwrap();
            assert_eq!(verify(&graph), Ok(()));
        }
    }

    #[test]
    fn test_verify_empty() {
        let graph = GraphLoader::new().parse_text("t 0 0").unwrap();
        assert_eq!(verify(&graph), Ok(()));
    }

    #[test]
    fn test_verify_asymmetric() {
        // 0 lists 1 and 1 lists 2, but neither is listed back.
        let adjacency =
            Adjacency::from_parts(vec![0, 1, 2, 2], vec![1, 2], vec![0; 3], &Source::Text(None))
                .unwrap();
        let graph = GraphLoader::new().build(adjacency);
        assert_eq!(verify(&graph), Err(Violation::Asymmetric(0, 1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Violation::Asymmetric(0, 1).to_string(),
            "edge (0, 1) is missing its reverse"
        );
    }
}
