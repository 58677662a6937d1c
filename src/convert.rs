//! Batch file reformatters.
//!
//! Plain file-to-file transforms around the core pipeline: expanding
//! adjacency lists into edge lists, merging two adjacency-list graphs,
//! re-ordering externally computed embeddings by node id, and converting
//! CSV feature exports into the whitespace-delimited feature format.
//! No normalization or graph semantics here beyond undirected-edge dedup.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::info;

use crate::adjlist::read_adjlist;
use crate::error::{PrepError, PrepResult};

/// Expand an adjacency-list file into an edge-list file.
///
/// Each `<node> <neighbors...>` line becomes one `<node> <neighbor>` line
/// per neighbor, after skipping `skip_rows` header lines. Returns the
/// number of edges written.
pub fn adjlist_to_edgelist(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    skip_rows: usize,
) -> PrepResult<usize> {
    let input = input.as_ref();
    let output = output.as_ref();
    let lines = read_adjlist(input, skip_rows)?;

    let mut writer = create_writer(output)?;
    let mut count = 0usize;
    for line in &lines {
        for &nb in &line.neighbors {
            writeln!(writer, "{} {}", line.node, nb).map_err(|e| PrepError::io(output, e))?;
            count += 1;
        }
    }
    writer.flush().map_err(|e| PrepError::io(output, e))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        edges = count,
        "adjacency list expanded to edge list"
    );
    Ok(count)
}

/// Counts reported by [`merge_adjlists`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub nodes: usize,
    pub edges: usize,
}

/// Merge two adjacency-list files into one graph, written both as an
/// adjacency-list file and as an edge-list file.
///
/// The merged node set is the first file's nodes plus any endpoint the
/// second file introduces, in encounter order; the edge set is the
/// undirected union of both files' edges (`(u, v)` and `(v, u)` are one
/// edge). Neither symmetrization closure nor self-loops are forced here.
pub fn merge_adjlists(
    first: impl AsRef<Path>,
    second: impl AsRef<Path>,
    out_adjlist: impl AsRef<Path>,
    out_edgelist: impl AsRef<Path>,
) -> PrepResult<MergeStats> {
    let first = first.as_ref();
    let second = second.as_ref();

    let mut nodes: IndexSet<usize> = IndexSet::new();
    let mut edges: IndexSet<(usize, usize)> = IndexSet::new();
    let mut first_edges = 0usize;

    for (which, path) in [(0, first), (1, second)] {
        let lines = read_adjlist(path, 0)?;
        for line in &lines {
            // The first file contributes its isolated nodes as well;
            // the second only reaches the merge through its edges.
            if which == 0 {
                nodes.insert(line.node);
            }
            for &nb in &line.neighbors {
                if which == 0 {
                    nodes.insert(nb);
                }
                let key = if line.node <= nb { (line.node, nb) } else { (nb, line.node) };
                edges.insert(key);
            }
        }
        if which == 0 {
            first_edges = edges.len();
            info!(path = %first.display(), edges = first_edges, "first graph read");
        } else {
            info!(path = %second.display(), edges = edges.len() - first_edges, "second graph read");
        }
        for &(u, v) in &edges {
            nodes.insert(u);
            nodes.insert(v);
        }
    }

    write_adjlist(out_adjlist.as_ref(), &nodes, &edges)?;
    write_edgelist(out_edgelist.as_ref(), &edges)?;

    let stats = MergeStats {
        nodes: nodes.len(),
        edges: edges.len(),
    };
    info!(nodes = stats.nodes, edges = stats.edges, "graphs merged");
    Ok(stats)
}

fn write_adjlist(
    path: &Path,
    nodes: &IndexSet<usize>,
    edges: &IndexSet<(usize, usize)>,
) -> PrepResult<()> {
    // Each undirected edge is written once, on the line of the node that
    // appears first in merge order.
    let mut written: FxHashSet<(usize, usize)> = FxHashSet::default();
    let mut writer = create_writer(path)?;
    for &n in nodes {
        let mut neighbors: Vec<usize> = edges
            .iter()
            .filter_map(|&(u, v)| {
                if u == n {
                    Some(v)
                } else if v == n {
                    Some(u)
                } else {
                    None
                }
            })
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();

        write!(writer, "{}", n).map_err(|e| PrepError::io(path, e))?;
        for nb in neighbors {
            let key = if n <= nb { (n, nb) } else { (nb, n) };
            if written.insert(key) {
                write!(writer, " {}", nb).map_err(|e| PrepError::io(path, e))?;
            }
        }
        writeln!(writer).map_err(|e| PrepError::io(path, e))?;
    }
    writer.flush().map_err(|e| PrepError::io(path, e))
}

fn write_edgelist(path: &Path, edges: &IndexSet<(usize, usize)>) -> PrepResult<()> {
    let mut writer = create_writer(path)?;
    for &(u, v) in edges {
        writeln!(writer, "{} {}", u, v).map_err(|e| PrepError::io(path, e))?;
    }
    writer.flush().map_err(|e| PrepError::io(path, e))
}

/// Re-order an embedding file by node id.
///
/// The input carries one metadata header line, then rows of
/// `<node_id> <values...>`. The output holds only the value rows, placed
/// at their node id's line. Ids must lie in `[0, rows)` and cover every
/// row exactly once: out-of-range ids fail with `IndexOutOfRange`,
/// duplicates and holes with `InputFormat`.
pub fn reorder_embeddings(input: impl AsRef<Path>, output: impl AsRef<Path>) -> PrepResult<usize> {
    let input = input.as_ref();
    let output = output.as_ref();

    let file = File::open(input).map_err(|e| PrepError::io(input, e))?;
    let reader = BufReader::new(file);

    let mut rows: Vec<(usize, usize, Vec<f64>)> = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line.map_err(|e| PrepError::io(input, e))?;
        if lineno == 1 || line.trim().is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let id_token = tokens
            .next()
            .ok_or_else(|| PrepError::format(input, lineno, "expected a node id"))?;
        // Ids are written as floats by some embedding tools ("3.0").
        let id_value: f64 = id_token.parse().map_err(|_| {
            PrepError::format(input, lineno, format!("invalid node id {:?}", id_token))
        })?;
        if id_value < 0.0 || id_value.fract() != 0.0 {
            return Err(PrepError::format(
                input,
                lineno,
                format!("invalid node id {:?}", id_token),
            ));
        }

        let values = tokens
            .map(|t| {
                t.parse().map_err(|_| {
                    PrepError::format(input, lineno, format!("invalid value {:?}", t))
                })
            })
            .collect::<PrepResult<Vec<f64>>>()?;
        rows.push((id_value as usize, lineno, values));
    }

    let len = rows.len();
    let mut ordered: Vec<Option<Vec<f64>>> = vec![None; len];
    for (id, lineno, values) in rows {
        if id >= len {
            return Err(PrepError::IndexOutOfRange {
                index: id as i64,
                len,
            });
        }
        if ordered[id].is_some() {
            return Err(PrepError::format(
                input,
                lineno,
                format!("duplicate node id {}", id),
            ));
        }
        ordered[id] = Some(values);
    }

    let mut writer = create_writer(output)?;
    for (id, values) in ordered.into_iter().enumerate() {
        let values = values.ok_or_else(|| {
            PrepError::format(input, 0, format!("no embedding row for node id {}", id))
        })?;
        write_row(&mut writer, output, &values)?;
    }
    writer.flush().map_err(|e| PrepError::io(output, e))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = len,
        "embeddings reordered"
    );
    Ok(len)
}

/// Convert a CSV numeric matrix into the whitespace-delimited feature
/// format, values unchanged.
///
/// The first CSV row is a header and the first column a row index; both
/// are dropped. Returns the number of data rows written.
pub fn csv_to_txt(input: impl AsRef<Path>, output: impl AsRef<Path>) -> PrepResult<usize> {
    let input = input.as_ref();
    let output = output.as_ref();

    let file = File::open(input).map_err(|e| PrepError::io(input, e))?;
    let reader = BufReader::new(file);
    let mut writer = create_writer(output)?;

    let mut dim: Option<usize> = None;
    let mut rows = 0usize;
    for (lineno, line) in reader.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line.map_err(|e| PrepError::io(input, e))?;
        if lineno == 1 || line.trim().is_empty() {
            continue;
        }

        // Fixed schema: index column first, then the values.
        let mut fields = line.split(',');
        fields
            .next()
            .ok_or_else(|| PrepError::format(input, lineno, "expected an index column"))?;
        let values = fields
            .map(|f| {
                f.trim().parse().map_err(|_| {
                    PrepError::format(input, lineno, format!("invalid value {:?}", f.trim()))
                })
            })
            .collect::<PrepResult<Vec<f64>>>()?;

        match dim {
            None => dim = Some(values.len()),
            Some(d) if d != values.len() => {
                return Err(PrepError::format(
                    input,
                    lineno,
                    format!("expected {} values, found {}", d, values.len()),
                ));
            }
            Some(_) => {}
        }

        write_row(&mut writer, output, &values)?;
        rows += 1;
    }
    writer.flush().map_err(|e| PrepError::io(output, e))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows,
        "csv converted to feature text"
    );
    Ok(rows)
}

fn create_writer(path: &Path) -> PrepResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| PrepError::io(path, e))?;
    Ok(BufWriter::new(file))
}

fn write_row(writer: &mut BufWriter<File>, path: &Path, values: &[f64]) -> PrepResult<()> {
    let mut first = true;
    for v in values {
        if !first {
            write!(writer, " ").map_err(|e| PrepError::io(path, e))?;
        }
        write!(writer, "{}", v).map_err(|e| PrepError::io(path, e))?;
        first = false;
    }
    writeln!(writer).map_err(|e| PrepError::io(path, e))
}
