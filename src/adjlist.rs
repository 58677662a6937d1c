//! Adjacency-list file loading.
//!
//! An adjacency-list file carries one node per line: the node id followed
//! by its neighbor ids, all whitespace-separated. Embedding-style files
//! prepend a fixed-size metadata header, so readers take an explicit
//! number of leading lines to skip.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::info;

use crate::error::{PrepError, PrepResult};

/// One parsed adjacency-list line: a node and its neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjlistLine {
    pub node: usize,
    pub neighbors: Vec<usize>,
}

/// Read an adjacency-list file, skipping `skip_rows` leading header lines.
///
/// Returns node lines in encounter order. Every non-empty line after the
/// header must start with a node id (at least one token); ids must parse
/// as integers.
pub fn read_adjlist(path: impl AsRef<Path>, skip_rows: usize) -> PrepResult<Vec<AdjlistLine>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PrepError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line.map_err(|e| PrepError::io(path, e))?;
        if lineno <= skip_rows {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let node = parse_id(path, lineno, tokens.next().ok_or_else(|| {
            PrepError::format(path, lineno, "expected a node id, found no tokens")
        })?)?;
        let neighbors = tokens
            .map(|t| parse_id(path, lineno, t))
            .collect::<PrepResult<Vec<usize>>>()?;

        lines.push(AdjlistLine { node, neighbors });
    }
    Ok(lines)
}

fn parse_id(path: &Path, lineno: usize, token: &str) -> PrepResult<usize> {
    token
        .parse()
        .map_err(|_| PrepError::format(path, lineno, format!("invalid node id {:?}", token)))
}

/// A graph loaded from an adjacency-list file with nodes `0..M-1`, its
/// edge set closed under symmetry and self-loops.
///
/// M is the number of distinct node lines encountered. The edge set stores
/// directed pairs: for every parsed undirected edge both `(u, v)` and
/// `(v, u)` are inserted, and `(n, n)` for every node — independent of
/// whatever symmetry the input file already encodes. Built once, then
/// read-only.
#[derive(Debug, Clone)]
pub struct OrderedGraph {
    node_count: usize,
    edges: FxHashSet<(usize, usize)>,
}

impl OrderedGraph {
    /// Load and transform an adjacency-list file.
    ///
    /// Logs node/edge counts before and after the symmetry + self-loop
    /// closure; the counts are diagnostics, not a contract.
    pub fn load(path: impl AsRef<Path>, skip_rows: usize) -> PrepResult<Self> {
        let path = path.as_ref();
        let lines = read_adjlist(path, skip_rows)?;

        let mut seen_nodes: IndexSet<usize> = IndexSet::new();
        let mut parsed_edges: FxHashSet<(usize, usize)> = FxHashSet::default();
        for line in &lines {
            seen_nodes.insert(line.node);
            for &nb in &line.neighbors {
                // Undirected parse: (u, v) and (v, u) are one edge here.
                let (a, b) = if line.node <= nb { (line.node, nb) } else { (nb, line.node) };
                parsed_edges.insert((a, b));
            }
        }
        info!(
            path = %path.display(),
            nodes = seen_nodes.len(),
            edges = parsed_edges.len(),
            "initial graph"
        );

        let node_count = seen_nodes.len();
        let mut edges: FxHashSet<(usize, usize)> = FxHashSet::default();
        for &(u, v) in &parsed_edges {
            edges.insert((u, v));
            edges.insert((v, u));
        }
        for &n in &seen_nodes {
            edges.insert((n, n));
        }
        info!(
            nodes = node_count,
            edges = edges.len(),
            "after symmetry and self-loop closure"
        );

        Ok(OrderedGraph { node_count, edges })
    }

    /// Number of distinct node lines encountered.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of directed pairs in the closed edge set.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the directed pair `(u, v)` is present.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.edges.contains(&(u, v))
    }

    /// Iterate the directed edge pairs (unspecified order).
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_read_adjlist_lines() {
        let f = write_file("0 1 2\n1 0\n2\n");
        let lines = read_adjlist(f.path(), 0).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], AdjlistLine { node: 0, neighbors: vec![1, 2] });
        assert_eq!(lines[2], AdjlistLine { node: 2, neighbors: vec![] });
    }

    #[test]
    fn test_header_skip() {
        let f = write_file("# comment\n3 4 0.5\n0 1\n1 0\n");
        let lines = read_adjlist(f.path(), 2).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].node, 0);
    }

    #[test]
    fn test_bad_token() {
        let f = write_file("0 1\n1 x\n");
        let err = read_adjlist(f.path(), 0).unwrap_err();
        match err {
            PrepError::InputFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_closure_forces_symmetry_and_self_loops() {
        // Input only lists 0 -> 1; the closure must add (1, 0) and all
        // self-loops.
        let f = write_file("0 1\n1\n2\n");
        let g = OrderedGraph::load(f.path(), 0).unwrap();
        assert_eq!(g.node_count(), 3);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 0));
        for n in 0..3 {
            assert!(g.has_edge(n, n));
        }
        // (0,1), (1,0) and three self-loops.
        assert_eq!(g.edge_count(), 5);
    }

    #[test]
    fn test_reload_is_idempotent() {
        // The same file loaded twice yields identical counts even though
        // the first file already encodes both directions.
        let f = write_file("0 1 2\n1 0\n2 0\n");
        let g1 = OrderedGraph::load(f.path(), 0).unwrap();
        let g2 = OrderedGraph::load(f.path(), 0).unwrap();
        assert_eq!(g1.node_count(), g2.node_count());
        assert_eq!(g1.edge_count(), g2.edge_count());
    }
}
