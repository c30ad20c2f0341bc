//! The text graph format.
//!
//! ```text
//! t <|V|> <|E|>
//! v <id> <label> <degree>
//! e <u> <v>
//! ```
//!
//! Vertex and edge records may come in any order. Every undirected edge is
//! listed once and every declared degree must match the edges listed.

use super::adjacency::{check_labels, prefix_sum, structure, Adjacency};
use crate::{
    error::{Error, Result, Source},
    types::VLabel,
};
use itertools::Itertools;
use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "data/graph.pest"]
struct GraphParser;

pub(crate) fn parse(input: &str, label_limit: VLabel, source: &Source) -> Result<Adjacency> {
    let mut pairs = GraphParser::parse(Rule::graph, input)
        .map_err(|e| Error::Format(source.clone(), e.to_string()))?;
    let header = pairs.next().map(|pair| pair.into_inner().next_tuple());
    let (num_vertices, num_edges) = match header {
        Some(Some((n, m))) => (number(n, source)? as usize, number(m, source)? as usize),
        _ => unreachable!(),
    };
    let num_vertex_records = pairs
        .clone()
        .filter(|pair| pair.as_rule() == Rule::vertex)
        .count();
    if num_vertices > num_vertex_records {
        return Err(structure(
            source,
            format!(
                "header declares {} vertices but the input holds {} vertex records",
                num_vertices, num_vertex_records
            ),
        ));
    }
    let num_edge_records = pairs
        .clone()
        .filter(|pair| pair.as_rule() == Rule::edge)
        .count();
    if num_edges > num_edge_records {
        return Err(structure(
            source,
            format!("{} edges listed but {} declared", num_edge_records, num_edges),
        ));
    }
    let num_slots = 2 * num_edges;

    let mut labels = vec![0; num_vertices];
    let mut degrees = vec![None; num_vertices];
    for pair in pairs.clone().filter(|pair| pair.as_rule() == Rule::vertex) {
        let at = location(&pair);
        let (id, label, degree) = match pair.into_inner().next_tuple() {
            Some((id, label, degree)) => (
                number(id, source)? as usize,
                number(label, source)?,
                number(degree, source)? as usize,
            ),
            None => unreachable!(),
        };
        if id >= num_vertices {
            return Err(structure(
                source,
                format!("{}: vertex {} out of range (|V| = {})", at, id, num_vertices),
            ));
        }
        if degrees[id].is_some() {
            return Err(structure(
                source,
                format!("{}: vertex {} is declared twice", at, id),
            ));
        }
        labels[id] = label;
        degrees[id] = Some(degree);
    }
    let degrees = degrees
        .into_iter()
        .enumerate()
        .map(|(v, degree)| {
            degree.ok_or_else(|| structure(source, format!("vertex {} is never declared", v)))
        })
        .collect::<Result<Vec<_>>>()?;
    let offsets = prefix_sum(degrees.iter().copied(), source)?;
    if offsets[num_vertices] != num_slots {
        return Err(structure(
            source,
            format!(
                "degrees sum to {} but {} edges need {}",
                offsets[num_vertices], num_edges, num_slots
            ),
        ));
    }

    let mut neighbors = vec![0; num_slots];
    let mut cursors = vec![0; num_vertices];
    for pair in pairs.filter(|pair| pair.as_rule() == Rule::edge) {
        let at = location(&pair);
        let (u, v) = match pair.into_inner().next_tuple() {
            Some((u, v)) => (number(u, source)?, number(v, source)?),
            None => unreachable!(),
        };
        if let Some(&w) = [u, v].iter().find(|&&w| w as usize >= num_vertices) {
            return Err(structure(
                source,
                format!("{}: vertex {} out of range (|V| = {})", at, w, num_vertices),
            ));
        }
        if u == v {
            return Err(structure(source, format!("{}: vertex {} has a self loop", at, u)));
        }
        for &(a, b) in &[(u, v), (v, u)] {
            let a = a as usize;
            if cursors[a] == degrees[a] {
                return Err(structure(
                    source,
                    format!(
                        "{}: vertex {} has more edges than its degree {}",
                        at, a, degrees[a]
                    ),
                ));
            }
            neighbors[offsets[a] + cursors[a]] = b;
            cursors[a] += 1;
        }
    }
    check_labels(&labels, label_limit, source)?;
    Adjacency::from_parts(offsets, neighbors, labels, source)
}

fn number(pair: Pair<Rule>, source: &Source) -> Result<u32> {
    pair.as_str().parse().map_err(|_| {
        Error::Format(
            source.clone(),
            format!("{}: {} does not fit in 32 bits", location(&pair), pair.as_str()),
        )
    })
}

fn location(pair: &Pair<Rule>) -> String {
    let (line, column) = pair.as_span().start_pos().line_col();
    format!("line {}, column {}", line, column)
}
