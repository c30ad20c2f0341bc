use super::{
    text, Adjacency, BinaryGraph, BinaryPaths, CoreTable, GraphInfo, LabelIndex, LabelOffsets,
    Nlf,
};
use crate::{
    error::{Error, Result, Source},
    types::{VId, VLabel},
};
use log::{debug, info};
use std::{collections::HashMap, path::Path, sync::OnceLock, time::Instant};

/// The largest label id accepted by default is `DEFAULT_LABEL_LIMIT - 1`.
pub const DEFAULT_LABEL_LIMIT: VLabel = 1 << 24;

/// Loads data graphs from the text format or the binary layout.
///
/// ```no_run
/// use csrgraph::data::GraphLoader;
///
/// let graph = GraphLoader::new().optimized(true).load_text("data.graph")?;
/// println!("{}", graph.info());
/// # Ok::<(), csrgraph::error::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLoader {
    optimized: bool,
    label_limit: VLabel,
}

impl Default for GraphLoader {
    fn default() -> Self {
        Self {
            optimized: false,
            label_limit: DEFAULT_LABEL_LIMIT,
        }
    }
}

impl GraphLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also builds the neighbor label frequencies and the label-sorted adjacency.
    pub fn optimized(mut self, optimized: bool) -> Self {
        self.optimized = optimized;
        self
    }

    /// Labels must be smaller than `label_limit`.
    pub fn label_limit(mut self, label_limit: VLabel) -> Self {
        self.label_limit = label_limit;
        self
    }

    pub fn load_text<P: AsRef<Path>>(&self, path: P) -> Result<Graph> {
        let path = path.as_ref();
        let source = Source::text(path);
        let time_now = Instant::now();
        let bytes = std::fs::read(path).map_err(|e| Error::Io(source.clone(), e))?;
        let input = String::from_utf8(bytes).map_err(|e| {
            Error::Format(
                source.clone(),
                format!("byte {} is not valid UTF-8", e.utf8_error().valid_up_to()),
            )
        })?;
        let adjacency = text::parse(&input, self.label_limit, &source)?;
        info!(
            "loaded text graph {} in {}ms",
            path.display(),
            time_now.elapsed().as_millis()
        );
        Ok(self.build(adjacency))
    }

    pub fn parse_text(&self, input: &str) -> Result<Graph> {
        let adjacency = text::parse(input, self.label_limit, &Source::Text(None))?;
        Ok(self.build(adjacency))
    }

    pub fn load_binary(&self, paths: &BinaryPaths) -> Result<Graph> {
        let time_now = Instant::now();
        let binary = BinaryGraph::open(paths)?;
        let graph = self.decode(&binary)?;
        info!(
            "loaded binary graph {} in {}ms",
            paths.degrees.display(),
            time_now.elapsed().as_millis()
        );
        Ok(graph)
    }

    pub fn decode(&self, binary: &BinaryGraph) -> Result<Graph> {
        Ok(self.build(binary.decode(self.label_limit)?))
    }

    /// Derives the indices of `adjacency`.
    pub fn build(&self, adjacency: Adjacency) -> Graph {
        let time_now = Instant::now();
        let label_index = LabelIndex::build(&adjacency);
        debug!(
            "built label index of {} labels in {}ms",
            label_index.num_labels(),
            time_now.elapsed().as_millis()
        );
        let (nlf, label_offsets) = if self.optimized {
            let time_now = Instant::now();
            let nlf = Nlf::build(&adjacency);
            let label_offsets = LabelOffsets::build(&adjacency);
            debug!(
                "built neighbor label indices in {}ms",
                time_now.elapsed().as_millis()
            );
            (Some(nlf), Some(label_offsets))
        } else {
            (None, None)
        };
        Graph {
            adjacency,
            label_index,
            nlf,
            label_offsets,
            core_table: OnceLock::new(),
        }
    }
}

/// An immutable labeled data graph with its indices.
///
/// The core table is computed on first use; everything else is built by
/// [`GraphLoader`].
#[derive(Debug)]
pub struct Graph {
    adjacency: Adjacency,
    label_index: LabelIndex,
    nlf: Option<Nlf>,
    label_offsets: Option<LabelOffsets>,
    core_table: OnceLock<CoreTable>,
}

impl Graph {
    pub fn is_optimized(&self) -> bool {
        self.label_offsets.is_some()
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn label_index(&self) -> &LabelIndex {
        &self.label_index
    }

    pub fn info(&self) -> GraphInfo {
        GraphInfo::new(
            self.num_vertices(),
            self.num_edges(),
            self.num_labels(),
            self.max_degree(),
            self.max_label_frequency(),
        )
    }

    pub fn num_vertices(&self) -> usize {
        self.adjacency.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency.num_edges()
    }

    pub fn num_labels(&self) -> usize {
        self.label_index.num_labels()
    }

    pub fn max_degree(&self) -> usize {
        self.adjacency.max_degree()
    }

    pub fn max_label_frequency(&self) -> usize {
        self.label_index.max_frequency()
    }

    pub fn label_frequency(&self, label: VLabel) -> usize {
        self.label_index.frequency(label)
    }

    pub fn degree(&self, v: VId) -> usize {
        self.adjacency.degree(v)
    }

    pub fn label(&self, v: VId) -> VLabel {
        self.adjacency.label(v)
    }

    /// The neighbors of `v` in ascending order.
    pub fn neighbors(&self, v: VId) -> &[VId] {
        self.adjacency.neighbors(v)
    }

    /// The vertices with `label` in ascending order.
    pub fn vertices_by_label(&self, label: VLabel) -> &[VId] {
        self.label_index.vertices(label)
    }

    /// The neighbors of `v` with `label` in ascending order, or `None` unless optimized.
    pub fn neighbors_by_label(&self, v: VId, label: VLabel) -> Option<&[VId]> {
        self.label_offsets
            .as_ref()
            .map(|label_offsets| label_offsets.get(v, label))
    }

    /// How many neighbors of `v` carry each label, or `None` unless optimized.
    pub fn neighbor_label_histogram(&self, v: VId) -> Option<&HashMap<VLabel, usize>> {
        self.nlf.as_ref().map(|nlf| nlf.histogram(v))
    }

    /// Searches the adjacency of whichever endpoint has the smaller degree.
    pub fn has_edge(&self, u: VId, v: VId) -> bool {
        let (u, v) = if self.degree(u) < self.degree(v) {
            (v, u)
        } else {
            (u, v)
        };
        self.neighbors(v).binary_search(&u).is_ok()
    }

    /// Tests for the edge `(u, v)` given that `u` carries `u_label`.
    pub fn has_edge_with_label(&self, u: VId, v: VId, u_label: VLabel) -> bool {
        match &self.label_offsets {
            Some(label_offsets) => label_offsets.get(v, u_label).binary_search(&u).is_ok(),
            None => self.label(u) == u_label && self.has_edge(u, v),
        }
    }

    pub fn core_table(&self) -> &CoreTable {
        self.core_table.get_or_init(|| {
            let time_now = Instant::now();
            let core_table = CoreTable::compute(&self.adjacency);
            debug!(
                "computed core table in {}ms",
                time_now.elapsed().as_millis()
            );
            core_table
        })
    }

    pub fn core_value(&self, v: VId) -> usize {
        self.core_table().value(v)
    }

    pub fn two_core_size(&self) -> usize {
        self.core_table().two_core_size()
    }

    /// Encodes the graph into the binary layout in memory.
    pub fn encode(&self) -> Result<BinaryGraph> {
        BinaryGraph::encode(&self.adjacency)
    }

    /// Writes the graph to the three files of the binary layout.
    pub fn store_binary(&self, paths: &BinaryPaths) -> Result<()> {
        let time_now = Instant::now();
        BinaryGraph::create(paths, &self.adjacency)?;
        info!(
            "stored binary graph {} in {}ms",
            paths.degrees.display(),
            time_now.elapsed().as_millis()
        );
        Ok(())
    }
}
