use super::Adjacency;
use crate::types::{VId, VLabel};
use std::collections::HashMap;

/// Reverse index from labels to the vertices carrying them.
///
/// Labels index the offset table directly, so the table has
/// `num_labels + 1` entries where `num_labels` is at least one past the
/// largest label id. Sparse, very large label ids make this table large.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelIndex {
    frequency: HashMap<VLabel, usize>,
    num_labels: usize,
    max_frequency: usize,
    offsets: Vec<usize>,
    vertices: Vec<VId>,
}

impl LabelIndex {
    pub fn build(adjacency: &Adjacency) -> Self {
        let frequency = count_labels(adjacency.labels());
        let max_label = adjacency.labels().iter().max().map_or(0, |&l| l as usize + 1);
        let num_labels = frequency.len().max(max_label);
        let max_frequency = frequency.values().copied().max().unwrap_or(0);

        let mut offsets = Vec::with_capacity(num_labels + 1);
        offsets.push(0);
        let mut total = 0;
        for label in 0..num_labels {
            total += frequency.get(&(label as VLabel)).copied().unwrap_or(0);
            offsets.push(total);
        }

        let mut cursors = offsets[..num_labels].to_vec();
        let mut vertices = vec![0; adjacency.num_vertices()];
        for (v, &label) in adjacency.labels().iter().enumerate() {
            let cursor = &mut cursors[label as usize];
            vertices[*cursor] = v as VId;
            *cursor += 1;
        }
        Self {
            frequency,
            num_labels,
            max_frequency,
            offsets,
            vertices,
        }
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn max_frequency(&self) -> usize {
        self.max_frequency
    }

    /// The number of vertices with `label`, 0 if there is none.
    pub fn frequency(&self, label: VLabel) -> usize {
        self.frequency.get(&label).copied().unwrap_or(0)
    }

    pub fn frequencies(&self) -> &HashMap<VLabel, usize> {
        &self.frequency
    }

    /// The vertices with `label` in ascending order.
    pub fn vertices(&self, label: VLabel) -> &[VId] {
        let label = label as usize;
        if label < self.num_labels {
            &self.vertices[self.offsets[label]..self.offsets[label + 1]]
        } else {
            &[]
        }
    }
}

fn count_labels(labels: &[VLabel]) -> HashMap<VLabel, usize> {
    let mut frequency = HashMap::new();
    for &label in labels {
        *frequency.entry(label).or_insert(0) += 1;
    }
    frequency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Source;

    fn adjacency(labels: Vec<VLabel>) -> Adjacency {
        let offsets = vec![0; labels.len() + 1];
        Adjacency::from_parts(offsets, vec![], labels, &Source::Text(None)).unwrap()
    }

    #[test]
    fn test_build() {
        let index = LabelIndex::build(&adjacency(vec![3, 1, 3, 0, 1, 3]));
        assert_eq!(index.num_labels(), 4);
        assert_eq!(index.max_frequency(), 3);
        assert_eq!(index.vertices(0), &[3]);
        assert_eq!(index.vertices(1), &[1, 4]);
        assert_eq!(index.vertices(2), &[] as &[VId]);
        assert_eq!(index.vertices(3), &[0, 2, 5]);
        assert_eq!(index.vertices(4), &[] as &[VId]);
        assert_eq!(index.frequency(3), 3);
        assert_eq!(index.frequency(2), 0);
    }

    #[test]
    fn test_build_empty() {
        let index = LabelIndex::build(&adjacency(vec![]));
        assert_eq!(index.num_labels(), 0);
        assert_eq!(index.max_frequency(), 0);
        assert!(index.vertices(0).is_empty());
    }
}
