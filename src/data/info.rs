use derive_more::Display;

/// Summary numbers of a data graph.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display(
    fmt = "|V|: {}, |E|: {}, |\u{3a3}|: {}\nMax Degree: {}, Max Label Frequency: {}",
    num_vertices,
    num_edges,
    num_labels,
    max_degree,
    max_label_frequency
)]
pub struct GraphInfo {
    num_vertices: usize,
    num_edges: usize,
    num_labels: usize,
    max_degree: usize,
    max_label_frequency: usize,
}

impl GraphInfo {
    pub fn new(
        num_vertices: usize,
        num_edges: usize,
        num_labels: usize,
        max_degree: usize,
        max_label_frequency: usize,
    ) -> Self {
        Self {
            num_vertices,
            num_edges,
            num_labels,
            max_degree,
            max_label_frequency,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn max_label_frequency(&self) -> usize {
        self.max_label_frequency
    }
}
