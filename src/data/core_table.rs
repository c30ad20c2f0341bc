//! Core decomposition by bucket-queue peeling.

use super::Adjacency;
use crate::types::VId;

/// The core number of every vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreTable {
    values: Vec<usize>,
    two_core_size: usize,
}

impl CoreTable {
    /// Runs in `O(|V| + |E|)`.
    pub fn compute(adjacency: &Adjacency) -> Self {
        let mut values: Vec<usize> = (0..adjacency.num_vertices() as VId)
            .map(|v| adjacency.degree(v))
            .collect();
        let mut queue = BucketQueue::new(&values, adjacency.max_degree());
        for i in 0..values.len() {
            let v = queue.vertex_at(i);
            for &u in adjacency.neighbors(v) {
                if values[u as usize] > values[v as usize] {
                    queue.demote(u, values[u as usize]);
                    values[u as usize] -= 1;
                }
            }
        }
        let two_core_size = values.iter().filter(|&&value| value > 1).count();
        Self {
            values,
            two_core_size,
        }
    }

    pub fn value(&self, v: VId) -> usize {
        self.values[v as usize]
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }

    /// The number of vertices with a core number greater than 1.
    pub fn two_core_size(&self) -> usize {
        self.two_core_size
    }

    /// The largest core number, i.e. the degeneracy of the graph.
    pub fn degeneracy(&self) -> usize {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// Vertices ordered by current degree, with the start of every degree bucket.
///
/// `vertices[position[v]] == v` holds throughout.
struct BucketQueue {
    vertices: Vec<VId>,
    position: Vec<usize>,
    bucket_start: Vec<usize>,
}

impl BucketQueue {
    fn new(degrees: &[usize], max_degree: usize) -> Self {
        let mut bucket_start = vec![0; max_degree + 1];
        for &degree in degrees {
            bucket_start[degree] += 1;
        }
        let mut start = 0;
        for slot in bucket_start.iter_mut() {
            let size = *slot;
            *slot = start;
            start += size;
        }
        let mut cursors = bucket_start.clone();
        let mut vertices = vec![0; degrees.len()];
        let mut position = vec![0; degrees.len()];
        for (v, &degree) in degrees.iter().enumerate() {
            position[v] = cursors[degree];
            vertices[position[v]] = v as VId;
            cursors[degree] += 1;
        }
        Self {
            vertices,
            position,
            bucket_start,
        }
    }

    fn vertex_at(&self, i: usize) -> VId {
        self.vertices[i]
    }

    /// Moves `u` from the bucket of `degree` into the bucket of `degree - 1`
    /// by swapping it to the front of its bucket and shrinking the bucket.
    fn demote(&mut self, u: VId, degree: usize) {
        let pos_u = self.position[u as usize];
        let pos_w = self.bucket_start[degree];
        let w = self.vertices[pos_w];
        if u != w {
            self.position[u as usize] = pos_w;
            self.position[w as usize] = pos_u;
            self.vertices[pos_u] = w;
            self.vertices[pos_w] = u;
        }
        self.bucket_start[degree] += 1;
    }
}
