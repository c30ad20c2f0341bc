//! The binary graph layout.
//!
//! A graph is stored in three files of little-endian 32-bit words:
//!
//! ```text
//! degree file: | int_size = 4 | |V| | |E| | deg(0) | ... | deg(|V|-1) |
//! edge file:   | adjacency of 0 | adjacency of 1 | ... |      (2|E| words)
//! label file:  | l(0) | l(1) | ... | l(|V|-1) |
//! ```
//!
//! The edge file has no delimiters; the offsets of the adjacency lists are
//! recovered from the degrees.

use super::adjacency::{check_labels, prefix_sum, structure, Adjacency};
use crate::{
    error::{Error, Result, Source},
    memory_manager::{MemoryManager, WORD},
    types::VLabel,
};
use log::debug;
use std::{
    convert::TryFrom,
    path::{Path, PathBuf},
};

/// The integer size tag opening the degree file.
pub const INT_SIZE: u32 = 4;

const DEGREE_HEADER_WORDS: usize = 3;

/// Where the three files of a binary graph live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPaths {
    pub degrees: PathBuf,
    pub edges: PathBuf,
    pub labels: PathBuf,
}

impl BinaryPaths {
    pub fn new<P, Q, R>(degrees: P, edges: Q, labels: R) -> Self
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        Self {
            degrees: degrees.as_ref().to_path_buf(),
            edges: edges.as_ref().to_path_buf(),
            labels: labels.as_ref().to_path_buf(),
        }
    }
}

/// The three buffers of a binary graph, in memory or mapped from files.
pub struct BinaryGraph {
    degrees: MemoryManager,
    edges: MemoryManager,
    labels: MemoryManager,
    paths: Option<BinaryPaths>,
}

impl BinaryGraph {
    /// Wraps buffers that do not come from files.
    pub fn from_mem(degrees: Vec<u8>, edges: Vec<u8>, labels: Vec<u8>) -> Self {
        Self {
            degrees: MemoryManager::Mem(degrees),
            edges: MemoryManager::Mem(edges),
            labels: MemoryManager::Mem(labels),
            paths: None,
        }
    }

    /// Maps the three files read-only.
    pub fn open(paths: &BinaryPaths) -> Result<Self> {
        let degrees = MemoryManager::new_mmap(&paths.degrees)
            .map_err(|e| Error::Io(Source::degrees(&paths.degrees), e))?;
        let edges = MemoryManager::new_mmap(&paths.edges)
            .map_err(|e| Error::Io(Source::edges(&paths.edges), e))?;
        let labels = MemoryManager::new_mmap(&paths.labels)
            .map_err(|e| Error::Io(Source::labels(&paths.labels), e))?;
        Ok(Self {
            degrees,
            edges,
            labels,
            paths: Some(paths.clone()),
        })
    }

    /// Encodes `adjacency` into memory.
    pub fn encode(adjacency: &Adjacency) -> Result<Self> {
        let (degrees, edges, labels) = sizes(adjacency);
        let mut graph = Self {
            degrees: MemoryManager::new_mem(degrees),
            edges: MemoryManager::new_mem(edges),
            labels: MemoryManager::new_mem(labels),
            paths: None,
        };
        graph.write(adjacency)?;
        Ok(graph)
    }

    /// Encodes `adjacency` into the three files, replacing their contents.
    pub fn create(paths: &BinaryPaths, adjacency: &Adjacency) -> Result<Self> {
        let (degrees, edges, labels) = sizes(adjacency);
        let mut graph = Self {
            degrees: MemoryManager::new_mmap_mut(&paths.degrees, degrees)
                .map_err(|e| Error::Io(Source::degrees(&paths.degrees), e))?,
            edges: MemoryManager::new_mmap_mut(&paths.edges, edges)
                .map_err(|e| Error::Io(Source::edges(&paths.edges), e))?,
            labels: MemoryManager::new_mmap_mut(&paths.labels, labels)
                .map_err(|e| Error::Io(Source::labels(&paths.labels), e))?,
            paths: Some(paths.clone()),
        };
        graph.write(adjacency)?;
        graph
            .degrees
            .flush()
            .map_err(|e| Error::Io(graph.degree_source(), e))?;
        graph
            .edges
            .flush()
            .map_err(|e| Error::Io(graph.edge_source(), e))?;
        graph
            .labels
            .flush()
            .map_err(|e| Error::Io(graph.label_source(), e))?;
        Ok(graph)
    }

    pub fn degree_bytes(&self) -> &[u8] {
        self.degrees.as_bytes()
    }

    pub fn edge_bytes(&self) -> &[u8] {
        self.edges.as_bytes()
    }

    pub fn label_bytes(&self) -> &[u8] {
        self.labels.as_bytes()
    }

    fn degree_source(&self) -> Source {
        Source::Degrees(self.paths.as_ref().map(|p| p.degrees.clone()))
    }

    fn edge_source(&self) -> Source {
        Source::Edges(self.paths.as_ref().map(|p| p.edges.clone()))
    }

    fn label_source(&self) -> Source {
        Source::Labels(self.paths.as_ref().map(|p| p.labels.clone()))
    }

    fn write(&mut self, adjacency: &Adjacency) -> Result<()> {
        let too_large = |what: &str, n: usize| {
            structure(
                &self.degree_source(),
                format!("{} = {} does not fit in 32 bits", what, n),
            )
        };
        let num_vertices = u32::try_from(adjacency.num_vertices())
            .map_err(|_| too_large("|V|", adjacency.num_vertices()))?;
        let num_edges = u32::try_from(adjacency.num_edges())
            .map_err(|_| too_large("|E|", adjacency.num_edges()))?;
        let offsets = adjacency.offsets();
        let degrees = offsets
            .iter()
            .zip(&offsets[1..])
            .map(|(start, end)| (end - start) as u32);
        let pos = self
            .degrees
            .write_words(0, vec![INT_SIZE, num_vertices, num_edges]);
        self.degrees.write_words(pos, degrees);
        self.edges
            .write_words(0, adjacency.neighbor_array().iter().copied());
        self.labels.write_words(0, adjacency.labels().iter().copied());
        Ok(())
    }

    /// Decodes the buffers, sorting every adjacency list on the way.
    pub fn decode(&self, label_limit: VLabel) -> Result<Adjacency> {
        let (num_vertices, num_edges) = self.read_header()?;
        let offsets = prefix_sum(
            self.degrees
                .words(DEGREE_HEADER_WORDS, num_vertices)
                .map(|degree| degree as usize),
            &self.degree_source(),
        )?;
        if offsets[num_vertices] != 2 * num_edges {
            return Err(structure(
                &self.degree_source(),
                format!(
                    "degrees sum to {} but {} edges need {}",
                    offsets[num_vertices],
                    num_edges,
                    2 * num_edges
                ),
            ));
        }
        debug!("decoded degrees of {} vertices", num_vertices);

        expect_len(&self.edges, 2 * num_edges, &self.edge_source())?;
        let neighbors = self.edges.words(0, 2 * num_edges).collect();
        debug!("decoded {} adjacency entries", 2 * num_edges);

        expect_len(&self.labels, num_vertices, &self.label_source())?;
        let labels: Vec<_> = self.labels.words(0, num_vertices).collect();
        check_labels(&labels, label_limit, &self.label_source())?;
        debug!("decoded {} labels", num_vertices);

        let adjacency = Adjacency::from_parts(offsets, neighbors, labels, &self.edge_source())?;
        adjacency.check_symmetric(&self.edge_source())?;
        Ok(adjacency)
    }

    fn read_header(&self) -> Result<(usize, usize)> {
        let source = self.degree_source();
        if self.degrees.len() < DEGREE_HEADER_WORDS * WORD {
            return Err(Error::Format(
                source,
                format!(
                    "{} bytes is too short for the header",
                    self.degrees.len()
                ),
            ));
        }
        let int_size = self.degrees.word(0);
        if int_size != INT_SIZE {
            return Err(Error::Format(
                source,
                format!("integer size is {}, expected {}", int_size, INT_SIZE),
            ));
        }
        let num_vertices = self.degrees.word(1) as usize;
        let num_edges = self.degrees.word(2) as usize;
        expect_len(
            &self.degrees,
            DEGREE_HEADER_WORDS + num_vertices,
            &source,
        )?;
        Ok((num_vertices, num_edges))
    }
}

/// Byte sizes of the degree, edge and label files.
fn sizes(adjacency: &Adjacency) -> (usize, usize, usize) {
    (
        (DEGREE_HEADER_WORDS + adjacency.num_vertices()) * WORD,
        adjacency.neighbor_array().len() * WORD,
        adjacency.num_vertices() * WORD,
    )
}

fn expect_len(mm: &MemoryManager, num_words: usize, source: &Source) -> Result<()> {
    if mm.len() == num_words * WORD {
        Ok(())
    } else {
        Err(Error::Format(
            source.clone(),
            format!(
                "expected {} bytes ({} words), found {}",
                num_words * WORD,
                num_words,
                mm.len()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::text;

    const TRIANGLE_AND_PENDANT: &str = "\
t 4 4
v 0 1 2
v 1 0 3
v 2 1 2
v 3 2 1
e 0 1
e 1 2
e 2 0
e 3 1
";

    fn adjacency() -> Adjacency {
        text::parse(TRIANGLE_AND_PENDANT, 1 << 24, &Source::Text(None)).unwrap()
    }

    fn words(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes().to_vec()).collect()
    }

    #[test]
    fn test_encode() {
        let graph = BinaryGraph::encode(&adjacency()).unwrap();
        assert_eq!(graph.degree_bytes(), &words(&[4, 4, 4, 2, 3, 2, 1])[..]);
        assert_eq!(
            graph.edge_bytes(),
            &words(&[1, 2, 0, 2, 3, 0, 1, 1])[..]
        );
        assert_eq!(graph.label_bytes(), &words(&[1, 0, 1, 2])[..]);
    }

    #[test]
    fn test_round_trip() {
        let adjacency = adjacency();
        let decoded = BinaryGraph::encode(&adjacency)
            .unwrap()
            .decode(1 << 24)
            .unwrap();
        assert_eq!(decoded, adjacency);
    }

    #[test]
    fn test_decode_sorts() {
        let graph = BinaryGraph::from_mem(
            words(&[4, 3, 2, 1, 2, 1]),
            words(&[1, 2, 0, 1]),
            words(&[0, 0, 0]),
        );
        let adjacency = graph.decode(1 << 24).unwrap();
        assert_eq!(adjacency.neighbors(1), &[0, 2]);
        assert_eq!(adjacency.offsets(), &[0, 1, 3, 4]);
    }

    #[test]
    fn test_decode_zero_degree() {
        let graph = BinaryGraph::from_mem(
            words(&[4, 3, 1, 1, 0, 1]),
            words(&[2, 0]),
            words(&[3, 4, 5]),
        );
        let adjacency = graph.decode(1 << 24).unwrap();
        assert_eq!(adjacency.neighbors(1), &[] as &[u32]);
        assert_eq!(adjacency.neighbors(2), &[0]);
    }

    fn decode_err(degrees: &[u32], edges: &[u32], labels: &[u32]) -> Error {
        BinaryGraph::from_mem(words(degrees), words(edges), words(labels))
            .decode(16)
            .unwrap_err()
    }

    #[test]
    fn test_decode_format_errors() {
        match decode_err(&[8, 1, 0, 0], &[], &[0]) {
            Error::Format(Source::Degrees(None), message) => {
                assert_eq!(message, "integer size is 8, expected 4")
            }
            other => panic!("{:?}", other),
        }
        assert!(matches!(
            decode_err(&[4, 1], &[], &[0]),
            Error::Format(Source::Degrees(_), _)
        ));
        assert!(matches!(
            decode_err(&[4, 2, 0, 0], &[], &[0, 0]),
            Error::Format(Source::Degrees(_), _)
        ));
        assert!(matches!(
            decode_err(&[4, 2, 1, 1, 1], &[1], &[0, 0]),
            Error::Format(Source::Edges(_), _)
        ));
        assert!(matches!(
            decode_err(&[4, 2, 1, 1, 1], &[1, 0], &[0]),
            Error::Format(Source::Labels(_), _)
        ));
    }

    #[test]
    fn test_decode_structure_errors() {
        assert!(matches!(
            decode_err(&[4, 2, 1, 1, 0], &[1, 0], &[0, 0]),
            Error::Structure(Source::Degrees(_), _)
        ));
        assert!(matches!(
            decode_err(&[4, 2, 1, 1, 1], &[5, 0], &[0, 0]),
            Error::Structure(Source::Edges(_), _)
        ));
        assert!(matches!(
            decode_err(&[4, 2, 1, 1, 1], &[1, 0], &[0, 16]),
            Error::Structure(Source::Labels(_), _)
        ));
    }

    #[test]
    fn test_decode_asymmetric() {
        // 0 lists 1 and 1 lists 2, but neither is listed back.
        match decode_err(&[4, 3, 1, 1, 1, 0], &[1, 2], &[0, 0, 0]) {
            Error::Structure(Source::Edges(None), message) => {
                assert_eq!(message, "edge (0, 1) is missing its reverse")
            }
            other => panic!("{:?}", other),
        }
    }
}
