//! Adjacency construction and row normalization.
//!
//! Turns a deduplicated edge set into the canonical normalized adjacency
//! artifact: symmetrize with the transpose-dominance merge, overwrite the
//! diagonal with unit self-loops, then scale each row to sum 1. The result
//! is immutable; its three representations (coordinate tensor, compressed
//! row, dense) all derive from the same canonical matrix.

use ndarray::Array2;
use tracing::debug;

use crate::error::{PrepError, PrepResult};
use crate::sparse::{CooMatrix, CooTensor, CsrMatrix};

/// Build a symmetric, self-looped adjacency matrix over `n` nodes.
///
/// Every edge `(i, j)` yields `A[i][j] = A[j][i] = 1`; every diagonal entry
/// is exactly 1 regardless of the input edges. The matrix stays sparse
/// throughout.
pub fn build_adjacency(n: usize, edges: &[(usize, usize)]) -> PrepResult<CooMatrix> {
    let directed = CooMatrix::from_edges(n, edges)?;
    let symmetric = directed.transpose_dominance_merge()?;
    let adj = symmetric.with_unit_diagonal()?;
    debug!(nodes = n, nnz = adj.nnz(), "adjacency built");
    Ok(adj)
}

/// Row-normalize a weighted adjacency matrix into the canonical artifact.
///
/// Works on any weighted matrix, not just the builder's output: zero-sum
/// rows (isolated nodes without self-loops) stay all-zero rather than
/// turning into NaN/Inf. Checks the matrix against the declared node count.
pub fn normalize(n: usize, adj: CooMatrix) -> PrepResult<NormalizedAdjacency> {
    if adj.rows() != n || adj.cols() != n {
        return Err(PrepError::DimensionMismatch {
            expected: format!("{}x{}", n, n),
            found: format!("{}x{}", adj.rows(), adj.cols()),
        });
    }
    let matrix = adj.normalize_rows();
    debug!(nodes = n, nnz = matrix.nnz(), "adjacency normalized");
    Ok(NormalizedAdjacency { matrix })
}

/// The canonical normalized adjacency structure.
///
/// Immutable once produced. The accessors derive each representation from
/// the single canonical matrix on demand, so the views cannot drift apart.
#[derive(Debug, Clone)]
pub struct NormalizedAdjacency {
    matrix: CooMatrix,
}

impl NormalizedAdjacency {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.matrix.rows()
    }

    /// The canonical coordinate-form matrix.
    pub fn coo(&self) -> &CooMatrix {
        &self.matrix
    }

    /// Coordinate-tensor export (i64 indices, f32 values) for transfer to
    /// an external sparse-tensor representation.
    pub fn tensor(&self) -> CooTensor {
        self.matrix.to_tensor()
    }

    /// Compressed-row representation for efficient row slicing.
    pub fn csr(&self) -> CsrMatrix {
        self.matrix.to_csr()
    }

    /// Dense representation.
    ///
    /// Explicit opt-in: allocates the full `n x n` array, so only call
    /// this for small graphs or debugging.
    pub fn dense(&self) -> Array2<f32> {
        self.matrix.to_dense()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_round_trip_example() {
        // Edges [(0,1)] over 3 nodes: symmetrize + self-loops, then
        // normalize rows.
        let adj = build_adjacency(3, &[(0, 1)]).unwrap();
        assert_eq!(
            adj.to_dense(),
            array![[1.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        );

        let norm = normalize(3, adj).unwrap();
        assert_eq!(
            norm.dense(),
            array![[0.5, 0.5, 0.0], [0.5, 0.5, 0.0], [0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn test_symmetry_after_build() {
        let adj = build_adjacency(5, &[(0, 3), (3, 1), (4, 0), (2, 2)]).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(adj.get(i, j), adj.get(j, i), "asymmetry at ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_unit_diagonal_after_build() {
        // (2,2) appears as an input edge; diagonal must still be exactly 1.
        let adj = build_adjacency(4, &[(0, 1), (2, 2)]).unwrap();
        for i in 0..4 {
            assert_eq!(adj.get(i, i), 1.0);
        }
    }

    #[test]
    fn test_normalizer_does_not_assume_self_loops() {
        // Node 2 is fully isolated, no self-loop: its row must normalize
        // to zeros, not NaN.
        let adj = CooMatrix::from_edges(3, &[(0, 1), (1, 0)]).unwrap();
        let norm = normalize(3, adj).unwrap();
        let sums = norm.coo().row_sums();
        assert!((sums[0] - 1.0).abs() < 1e-6);
        assert!((sums[1] - 1.0).abs() < 1e-6);
        assert_eq!(sums[2], 0.0);
    }

    #[test]
    fn test_normalize_rejects_shape_mismatch() {
        let adj = CooMatrix::from_edges(3, &[(0, 1)]).unwrap();
        assert!(normalize(4, adj).is_err());
    }

    #[test]
    fn test_view_equivalence() {
        let adj = build_adjacency(4, &[(0, 1), (1, 2), (3, 0)]).unwrap();
        let norm = normalize(4, adj).unwrap();

        let tensor = norm.tensor();
        let csr = norm.csr();
        let dense = norm.dense();

        // Every stored entry agrees across the three representations.
        for (k, &v) in tensor.val.iter().enumerate() {
            let (r, c) = (tensor.row[k] as usize, tensor.col[k] as usize);
            assert_eq!(dense[[r, c]], v);
        }
        for r in 0..4 {
            let (cols, vals) = csr.row(r);
            for (&c, &v) in cols.iter().zip(vals) {
                assert_eq!(dense[[r, c]], v);
            }
        }
        assert_eq!(tensor.nnz(), csr.nnz());
        assert_eq!(tensor.nnz(), dense.iter().filter(|&&v| v != 0.0).count());
    }
}
