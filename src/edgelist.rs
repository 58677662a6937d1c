//! Edge-list file loading.
//!
//! An edge-list file carries one edge per line as two whitespace-separated
//! raw node ids. Raw ids are mapped through a [`NodeIndex`] into dense
//! indices `[0, N)`; the loader neither symmetrizes nor adds self-loops —
//! that happens in the adjacency build.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info;

use crate::error::{PrepError, PrepResult};

/// Mapping from raw node ids to dense indices `[0, N)`.
///
/// The node count is fixed at construction; any raw id without a mapping
/// is a fatal input error when it appears in a file.
#[derive(Debug, Clone)]
pub struct NodeIndex {
    map: FxHashMap<u64, usize>,
    len: usize,
}

impl NodeIndex {
    /// Identity mapping for raw ids `0..n` (the common case).
    pub fn contiguous(n: usize) -> Self {
        let map = (0..n as u64).map(|id| (id, id as usize)).collect();
        NodeIndex { map, len: n }
    }

    /// Remapping for non-contiguous raw ids: enumeration order assigns
    /// dense indices. Duplicate ids keep their first index.
    pub fn from_ids(ids: &[u64]) -> Self {
        let mut map = FxHashMap::default();
        for &id in ids {
            let next = map.len();
            map.entry(id).or_insert(next);
        }
        let len = map.len();
        NodeIndex { map, len }
    }

    /// Number of mapped nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dense index of a raw id, if mapped.
    pub fn get(&self, id: u64) -> Option<usize> {
        self.map.get(&id).copied()
    }
}

/// Read a whitespace-delimited edge-list file into a deduplicated edge set.
///
/// Each non-empty line must hold exactly two integers; each raw id must be
/// present in `index`. Returned edges are directed as written, deduplicated,
/// in first-encounter order.
pub fn read_edge_list(path: impl AsRef<Path>, index: &NodeIndex) -> PrepResult<Vec<(usize, usize)>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PrepError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut edges = Vec::new();
    let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();

    for (lineno, line) in reader.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line.map_err(|e| PrepError::io(path, e))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != 2 {
            return Err(PrepError::format(
                path,
                lineno,
                format!("expected 2 node ids, found {} tokens", tokens.len()),
            ));
        }

        let mut pair = [0usize; 2];
        for (slot, token) in pair.iter_mut().zip(&tokens) {
            let raw: u64 = token.parse().map_err(|_| {
                PrepError::format(path, lineno, format!("invalid node id {:?}", token))
            })?;
            *slot = index.get(raw).ok_or_else(|| PrepError::UnknownNode {
                path: path.to_path_buf(),
                line: lineno,
                id: raw,
            })?;
        }

        if seen.insert((pair[0], pair[1])) {
            edges.push((pair[0], pair[1]));
        }
    }

    info!(
        path = %path.display(),
        nodes = index.len(),
        edges = edges.len(),
        "edge list loaded"
    );
    Ok(edges)
}
