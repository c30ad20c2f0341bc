//! Label-aware neighborhood indices built in optimized mode.

use super::Adjacency;
use crate::{
    tools::Runs,
    types::{VId, VLabel},
};
use std::collections::HashMap;

/// Per-vertex neighbor label frequencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nlf {
    histograms: Vec<HashMap<VLabel, usize>>,
}

impl Nlf {
    pub fn build(adjacency: &Adjacency) -> Self {
        let histograms = (0..adjacency.num_vertices() as VId)
            .map(|v| {
                let mut histogram = HashMap::new();
                for &n in adjacency.neighbors(v) {
                    *histogram.entry(adjacency.label(n)).or_insert(0) += 1;
                }
                histogram
            })
            .collect();
        Self { histograms }
    }

    pub fn histogram(&self, v: VId) -> &HashMap<VLabel, usize> {
        &self.histograms[v as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LabelRun {
    label: VLabel,
    start: usize,
    len: usize,
}

/// A copy of the adjacency sorted by `(label, id)` within each vertex, with
/// the per-vertex runs of equal labels.
///
/// ```text
/// vertex_runs: | 0 | r0 | r0+r1 | ... |
///                |
///                v
/// runs:        | (label, start, len) | ... |   (sorted by label per vertex)
///                         |
///                         v
/// neighbors:   | ids with that label, ascending | ... |
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelOffsets {
    vertex_runs: Vec<usize>,
    runs: Vec<LabelRun>,
    neighbors: Vec<VId>,
}

impl LabelOffsets {
    pub fn build(adjacency: &Adjacency) -> Self {
        let offsets = adjacency.offsets();
        let mut neighbors = adjacency.neighbor_array().to_vec();
        let mut vertex_runs = Vec::with_capacity(adjacency.num_vertices() + 1);
        let mut runs = vec![];
        vertex_runs.push(0);
        for v in 0..adjacency.num_vertices() {
            let list = &mut neighbors[offsets[v]..offsets[v + 1]];
            list.sort_unstable_by_key(|&n| (adjacency.label(n), n));
            for (label, range) in Runs::new(list, |&n| adjacency.label(n)) {
                runs.push(LabelRun {
                    label,
                    start: offsets[v] + range.start,
                    len: range.len(),
                });
            }
            vertex_runs.push(runs.len());
        }
        Self {
            vertex_runs,
            runs,
            neighbors,
        }
    }

    /// The neighbors of `v` with `label`, ascending by id.
    pub fn get(&self, v: VId, label: VLabel) -> &[VId] {
        let v = v as usize;
        let runs = &self.runs[self.vertex_runs[v]..self.vertex_runs[v + 1]];
        runs.binary_search_by_key(&label, |run| run.label)
            .map_or(&[][..], |i| {
                let LabelRun { start, len, .. } = runs[i];
                &self.neighbors[start..start + len]
            })
    }
}
