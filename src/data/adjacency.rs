use crate::{
    error::{Error, Result, Source},
    types::{VId, VLabel},
};
use itertools::Itertools;

/// The CSR adjacency of an undirected labeled graph.
///
/// ```text
/// offsets:   | 0 | d0 | d0+d1 | ... | 2|E| |      (|V| + 1 entries)
///              |    |
///              v    v
/// neighbors: | n(0) ... | n(1) ... | ... |       (2|E| entries)
/// labels:    | l(0) | l(1) | ... |              (|V| entries)
/// ```
///
/// Every edge is stored from both endpoints and every slice of `neighbors`
/// is strictly ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    offsets: Vec<usize>,
    neighbors: Vec<VId>,
    labels: Vec<VLabel>,
    max_degree: usize,
}

impl Adjacency {
    /// Sorts every adjacency list and checks the result can be indexed.
    ///
    /// `offsets` and `neighbors` must already agree in length; the loaders
    /// establish that before filling `neighbors`.
    pub(crate) fn from_parts(
        offsets: Vec<usize>,
        mut neighbors: Vec<VId>,
        labels: Vec<VLabel>,
        source: &Source,
    ) -> Result<Self> {
        debug_assert_eq!(offsets.len(), labels.len() + 1);
        debug_assert_eq!(offsets.last().copied(), Some(neighbors.len()));
        let num_vertices = labels.len();
        let mut max_degree = 0;
        for (v, (&start, &end)) in offsets.iter().tuple_windows().enumerate() {
            let list = &mut neighbors[start..end];
            list.sort_unstable();
            max_degree = max_degree.max(list.len());
            if let Some(&n) = list.iter().find(|&&n| n as usize >= num_vertices) {
                return Err(structure(
                    source,
                    format!("vertex {} has neighbor {} out of range", v, n),
                ));
            }
            if let Some((&n, _)) = list.iter().tuple_windows().find(|(a, b)| a == b) {
                return Err(structure(
                    source,
                    format!("edge ({}, {}) appears more than once", v, n),
                ));
            }
            if list.binary_search(&(v as VId)).is_ok() {
                return Err(structure(source, format!("vertex {} has a self loop", v)));
            }
        }
        Ok(Self {
            offsets,
            neighbors,
            labels,
            max_degree,
        })
    }

    /// Every neighbor must list the vertex back.
    pub(crate) fn check_symmetric(&self, source: &Source) -> Result<()> {
        for v in 0..self.num_vertices() as VId {
            if let Some(&n) = self
                .neighbors(v)
                .iter()
                .find(|&&n| self.neighbors(n).binary_search(&v).is_err())
            {
                return Err(structure(
                    source,
                    format!("edge ({}, {}) is missing its reverse", v, n),
                ));
            }
        }
        Ok(())
    }

    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.neighbors.len() / 2
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn degree(&self, v: VId) -> usize {
        let v = v as usize;
        self.offsets[v + 1] - self.offsets[v]
    }

    pub fn label(&self, v: VId) -> VLabel {
        self.labels[v as usize]
    }

    pub fn neighbors(&self, v: VId) -> &[VId] {
        let v = v as usize;
        &self.neighbors[self.offsets[v]..self.offsets[v + 1]]
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// All adjacency lists back to back, in vertex order.
    pub fn neighbor_array(&self) -> &[VId] {
        &self.neighbors
    }

    pub fn labels(&self) -> &[VLabel] {
        &self.labels
    }
}

pub(crate) fn structure(source: &Source, message: String) -> Error {
    Error::Structure(source.clone(), message)
}

/// Rejects label ids at or above `label_limit`.
pub(crate) fn check_labels(labels: &[VLabel], label_limit: VLabel, source: &Source) -> Result<()> {
    match labels.iter().find_position(|&&l| l >= label_limit) {
        Some((v, &label)) => Err(structure(
            source,
            format!(
                "vertex {} has label {} beyond the limit {}",
                v, label, label_limit
            ),
        )),
        None => Ok(()),
    }
}

/// Turns per-vertex degrees into CSR offsets, failing if the total overflows.
pub(crate) fn prefix_sum<I>(degrees: I, source: &Source) -> Result<Vec<usize>>
where
    I: ExactSizeIterator<Item = usize>,
{
    let mut offsets = Vec::with_capacity(degrees.len() + 1);
    offsets.push(0usize);
    let mut total = 0usize;
    for degree in degrees {
        total = total
            .checked_add(degree)
            .ok_or_else(|| structure(source, String::from("offsets overflow")))?;
        offsets.push(total);
    }
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Source {
        Source::Text(None)
    }

    #[test]
    fn test_from_parts_sorts() {
        let adjacency = Adjacency::from_parts(
            vec![0, 2, 3, 4],
            vec![2, 1, 0, 0],
            vec![5, 5, 7],
            &source(),
        )
        .unwrap();
        assert_eq!(adjacency.neighbors(0), &[1, 2]);
        assert_eq!(adjacency.num_edges(), 2);
        assert_eq!(adjacency.max_degree(), 2);
        assert_eq!(adjacency.degree(2), 1);
        assert_eq!(adjacency.label(2), 7);
    }

    #[test]
    fn test_from_parts_duplicate() {
        let err = Adjacency::from_parts(vec![0, 2, 4], vec![1, 1, 0, 0], vec![0, 0], &source())
            .unwrap_err();
        assert!(matches!(err, Error::Structure(..)));
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_from_parts_out_of_range() {
        let err = Adjacency::from_parts(vec![0, 1, 2], vec![9, 0], vec![0, 0], &source())
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_from_parts_self_loop() {
        let err = Adjacency::from_parts(vec![0, 2], vec![0, 0], vec![0], &source())
            .unwrap_err();
        assert!(matches!(err, Error::Structure(..)));
    }

    #[test]
    fn test_check_symmetric() {
        let path = Adjacency::from_parts(vec![0, 1, 3, 4], vec![1, 0, 2, 1], vec![0; 3], &source())
            .unwrap();
        assert!(path.check_symmetric(&source()).is_ok());
        let err = Adjacency::from_parts(vec![0, 1, 2, 2], vec![1, 2], vec![0; 3], &source())
            .unwrap()
            .check_symmetric(&source())
            .unwrap_err();
        assert!(matches!(err, Error::Structure(..)));
        assert!(err.to_string().contains("edge (0, 1) is missing its reverse"));
    }

    #[test]
    fn test_check_labels() {
        assert!(check_labels(&[0, 15], 16, &source()).is_ok());
        let err = check_labels(&[0, 16], 16, &source()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "text graph <memory>: inconsistent graph: vertex 1 has label 16 beyond the limit 16"
        );
    }

    #[test]
    fn test_prefix_sum() {
        assert_eq!(
            prefix_sum(vec![1, 0, 3].into_iter(), &source()).unwrap(),
            vec![0, 1, 1, 4]
        );
        assert!(prefix_sum(vec![usize::MAX, 1].into_iter(), &source()).is_err());
    }
}
