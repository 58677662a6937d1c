//! Minimal sparse matrix core for adjacency construction.
//!
//! The pipeline only needs a handful of operations (transpose-compare,
//! diagonal overwrite, row scaling, format conversion), so this module
//! carries a small hand-rolled triplet type instead of a sparse linear
//! algebra dependency stack.

use ndarray::Array2;

use crate::error::{PrepError, PrepResult};

/// Sparse matrix in coordinate (triplet) form.
///
/// Canonical form invariant: entries are sorted by `(row, col)`, hold one
/// entry per position, and contain no explicit zeros. Every constructor
/// and operation returns a matrix in canonical form, so point lookups can
/// binary-search and conversions can stream entries in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix {
    rows: usize,
    cols: usize,
    row: Vec<usize>,
    col: Vec<usize>,
    val: Vec<f32>,
}

/// Sparse matrix in compressed-row form, for O(1) row slicing.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col: Vec<usize>,
    val: Vec<f32>,
}

/// Coordinate export form for external sparse-tensor consumers.
///
/// Indices are widened to i64 so downstream tensors stay safe for large
/// graphs; values remain single-precision.
#[derive(Debug, Clone, PartialEq)]
pub struct CooTensor {
    pub row: Vec<i64>,
    pub col: Vec<i64>,
    pub val: Vec<f32>,
    pub shape: (i64, i64),
}

impl CooMatrix {
    /// Build a matrix from arbitrary triplets.
    ///
    /// Duplicate positions are summed; explicit zeros are dropped. An
    /// out-of-bounds position is a `DimensionMismatch`.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        entries: Vec<(usize, usize, f32)>,
    ) -> PrepResult<Self> {
        for &(r, c, _) in &entries {
            if r >= rows || c >= cols {
                return Err(PrepError::DimensionMismatch {
                    expected: format!("{}x{}", rows, cols),
                    found: format!("entry at ({}, {})", r, c),
                });
            }
        }

        let mut entries = entries;
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut row = Vec::with_capacity(entries.len());
        let mut col = Vec::with_capacity(entries.len());
        let mut val: Vec<f32> = Vec::with_capacity(entries.len());

        for (r, c, v) in entries {
            if let (Some(&pr), Some(&pc)) = (row.last(), col.last()) {
                if pr == r && pc == c {
                    // Duplicate position: accumulate like scipy's coo->csr.
                    let last = val.len() - 1;
                    val[last] += v;
                    continue;
                }
            }
            row.push(r);
            col.push(c);
            val.push(v);
        }

        let mut mx = CooMatrix { rows, cols, row, col, val };
        mx.drop_zeros();
        Ok(mx)
    }

    /// Build an `n x n` adjacency with a weight-1 entry per edge.
    ///
    /// Repeated edges collapse to a single entry; weights stay in {0, 1}.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> PrepResult<Self> {
        let mut edges: Vec<(usize, usize)> = edges.to_vec();
        edges.sort_unstable();
        edges.dedup();
        let entries = edges.into_iter().map(|(u, v)| (u, v, 1.0)).collect();
        Self::from_triplets(n, n, entries)
    }

    /// An all-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        CooMatrix {
            rows,
            cols,
            row: Vec::new(),
            col: Vec::new(),
            val: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.val.len()
    }

    /// Iterate stored entries in `(row, col)` order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.row
            .iter()
            .zip(&self.col)
            .zip(&self.val)
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Point lookup; absent positions read as 0.
    pub fn get(&self, r: usize, c: usize) -> f32 {
        // Canonical ordering lets us binary-search the row span, then the
        // column within it.
        let start = self.row.partition_point(|&er| er < r);
        let end = self.row.partition_point(|&er| er <= r);
        match self.col[start..end].binary_search(&c) {
            Ok(i) => self.val[start + i],
            Err(_) => 0.0,
        }
    }

    fn drop_zeros(&mut self) {
        if self.val.iter().all(|&v| v != 0.0) {
            return;
        }
        let mut row = Vec::with_capacity(self.val.len());
        let mut col = Vec::with_capacity(self.val.len());
        let mut val = Vec::with_capacity(self.val.len());
        for ((&r, &c), &v) in self.row.iter().zip(&self.col).zip(&self.val) {
            if v != 0.0 {
                row.push(r);
                col.push(c);
                val.push(v);
            }
        }
        self.row = row;
        self.col = col;
        self.val = val;
    }

    fn require_square(&self) -> PrepResult<()> {
        if self.rows != self.cols {
            return Err(PrepError::DimensionMismatch {
                expected: "square matrix".to_string(),
                found: format!("{}x{}", self.rows, self.cols),
            });
        }
        Ok(())
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        let entries = self.iter().map(|(r, c, v)| (c, r, v)).collect();
        // Entries were in bounds before swapping, so this cannot fail.
        Self::from_triplets(self.cols, self.rows, entries)
            .unwrap_or_else(|_| Self::zeros(self.cols, self.rows))
    }

    /// Symmetrize via the transpose-dominance merge rule:
    ///
    /// `A' = A + At * (At > A) - A * (At > A)`
    ///
    /// Wherever the transpose holds a strictly larger value at a position,
    /// the transpose's value replaces the original; everywhere else the
    /// original stands. On 0/1 adjacency weights this fills in the missing
    /// direction of every edge. The asymmetric strictly-greater comparison
    /// is kept literally rather than rewritten, since it is the rule's
    /// defined behavior once weights leave {0, 1}.
    pub fn transpose_dominance_merge(&self) -> PrepResult<Self> {
        self.require_square()?;
        let t = self.transpose();

        // Two-pointer walk over the canonical orderings of A and At; a
        // position absent from either side reads as 0.
        let mut entries = Vec::with_capacity(self.nnz() + t.nnz());
        let mut i = 0;
        let mut j = 0;
        while i < self.nnz() || j < t.nnz() {
            let pa = (i < self.nnz()).then(|| (self.row[i], self.col[i]));
            let pt = (j < t.nnz()).then(|| (t.row[j], t.col[j]));

            let (pos, a, tv) = match (pa, pt) {
                (Some(pa), Some(pt)) if pa == pt => {
                    let e = (pa, self.val[i], t.val[j]);
                    i += 1;
                    j += 1;
                    e
                }
                (Some(pa), Some(pt)) if pa < pt => {
                    let e = (pa, self.val[i], 0.0);
                    i += 1;
                    e
                }
                (Some(_), Some(pt)) => {
                    let e = (pt, 0.0, t.val[j]);
                    j += 1;
                    e
                }
                (Some(pa), None) => {
                    let e = (pa, self.val[i], 0.0);
                    i += 1;
                    e
                }
                (None, Some(pt)) => {
                    let e = (pt, 0.0, t.val[j]);
                    j += 1;
                    e
                }
                (None, None) => unreachable!(),
            };

            let mask = if tv > a { 1.0 } else { 0.0 };
            let merged = a + tv * mask - a * mask;
            if merged != 0.0 {
                entries.push((pos.0, pos.1, merged));
            }
        }

        Self::from_triplets(self.rows, self.cols, entries)
    }

    /// Set every diagonal entry to exactly 1, overwriting any prior value.
    pub fn with_unit_diagonal(&self) -> PrepResult<Self> {
        self.require_square()?;
        let mut entries: Vec<(usize, usize, f32)> =
            self.iter().filter(|&(r, c, _)| r != c).collect();
        entries.extend((0..self.rows).map(|i| (i, i, 1.0)));
        Self::from_triplets(self.rows, self.cols, entries)
    }

    /// Per-row sums of stored entries.
    pub fn row_sums(&self) -> Vec<f32> {
        let mut sums = vec![0.0f32; self.rows];
        for (r, _, v) in self.iter() {
            sums[r] += v;
        }
        sums
    }

    /// Scale each row by the inverse of its sum.
    ///
    /// A zero-sum row yields an infinite inverse, which is clamped to 0
    /// before scaling, so such rows come out all-zero instead of NaN/Inf.
    /// Postcondition: every output row sums to 0 or 1 (within float
    /// tolerance), and reapplying the operation is a no-op.
    pub fn normalize_rows(&self) -> Self {
        let mut inv: Vec<f32> = self.row_sums().iter().map(|s| s.recip()).collect();
        for r in inv.iter_mut() {
            if !r.is_finite() {
                *r = 0.0;
            }
        }

        let mut out = self.clone();
        for (i, v) in out.val.iter_mut().enumerate() {
            *v *= inv[out.row[i]];
        }
        out.drop_zeros();
        out
    }

    /// Convert to compressed-row form.
    pub fn to_csr(&self) -> CsrMatrix {
        let mut row_ptr = vec![0usize; self.rows + 1];
        for &r in &self.row {
            row_ptr[r + 1] += 1;
        }
        for i in 0..self.rows {
            row_ptr[i + 1] += row_ptr[i];
        }
        // Entries are already sorted by (row, col), so col/val carry over.
        CsrMatrix {
            rows: self.rows,
            cols: self.cols,
            row_ptr,
            col: self.col.clone(),
            val: self.val.clone(),
        }
    }

    /// Materialize as a dense 2D array.
    ///
    /// Allocates `rows * cols` floats; intended for small graphs and
    /// debugging, never called implicitly by the pipeline.
    pub fn to_dense(&self) -> Array2<f32> {
        let mut dense = Array2::zeros((self.rows, self.cols));
        for (r, c, v) in self.iter() {
            dense[[r, c]] = v;
        }
        dense
    }

    /// Rebuild from a dense array, keeping nonzero entries.
    pub fn from_dense(dense: &Array2<f32>) -> Self {
        let (rows, cols) = dense.dim();
        let entries = dense
            .indexed_iter()
            .filter(|&(_, &v)| v != 0.0)
            .map(|((r, c), &v)| (r, c, v))
            .collect();
        Self::from_triplets(rows, cols, entries).unwrap_or_else(|_| Self::zeros(rows, cols))
    }

    /// Export in coordinate-tensor form (i64 indices, f32 values).
    pub fn to_tensor(&self) -> CooTensor {
        CooTensor {
            row: self.row.iter().map(|&r| r as i64).collect(),
            col: self.col.iter().map(|&c| c as i64).collect(),
            val: self.val.clone(),
            shape: (self.rows as i64, self.cols as i64),
        }
    }
}

impl CsrMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn nnz(&self) -> usize {
        self.val.len()
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column indices and values of one row.
    pub fn row(&self, i: usize) -> (&[usize], &[f32]) {
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        (&self.col[start..end], &self.val[start..end])
    }

    /// Convert back to coordinate form.
    pub fn to_coo(&self) -> CooMatrix {
        let mut entries = Vec::with_capacity(self.nnz());
        for r in 0..self.rows {
            let (cols, vals) = self.row(r);
            for (&c, &v) in cols.iter().zip(vals) {
                entries.push((r, c, v));
            }
        }
        CooMatrix::from_triplets(self.rows, self.cols, entries)
            .unwrap_or_else(|_| CooMatrix::zeros(self.rows, self.cols))
    }
}

impl CooTensor {
    pub fn nnz(&self) -> usize {
        self.val.len()
    }

    /// Convert back to coordinate form.
    pub fn to_coo(&self) -> PrepResult<CooMatrix> {
        let entries = self
            .row
            .iter()
            .zip(&self.col)
            .zip(&self.val)
            .map(|((&r, &c), &v)| (r as usize, c as usize, v))
            .collect();
        CooMatrix::from_triplets(self.shape.0 as usize, self.shape.1 as usize, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coo(rows: usize, cols: usize, entries: Vec<(usize, usize, f32)>) -> CooMatrix {
        CooMatrix::from_triplets(rows, cols, entries).unwrap()
    }

    #[test]
    fn test_canonical_form() {
        // Unsorted input with a duplicate position and an explicit zero.
        let mx = coo(3, 3, vec![(2, 0, 1.0), (0, 1, 0.5), (0, 1, 0.5), (1, 1, 0.0)]);
        let entries: Vec<_> = mx.iter().collect();
        assert_eq!(entries, vec![(0, 1, 1.0), (2, 0, 1.0)]);
        assert_eq!(mx.nnz(), 2);
        assert_eq!(mx.get(0, 1), 1.0);
        assert_eq!(mx.get(1, 1), 0.0);
    }

    #[test]
    fn test_out_of_bounds_entry() {
        let err = CooMatrix::from_triplets(2, 2, vec![(2, 0, 1.0)]).unwrap_err();
        assert!(matches!(err, crate::error::PrepError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_transpose() {
        let mx = coo(2, 3, vec![(0, 2, 4.0), (1, 0, 2.0)]);
        let t = mx.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.get(2, 0), 4.0);
        assert_eq!(t.get(0, 1), 2.0);
    }

    #[test]
    fn test_transpose_dominance_on_binary_weights() {
        // Directed edges (0,1) and (2,1): symmetrization fills the
        // missing directions.
        let mx = coo(3, 3, vec![(0, 1, 1.0), (2, 1, 1.0)]);
        let sym = mx.transpose_dominance_merge().unwrap();
        for (r, c) in [(0, 1), (1, 0), (2, 1), (1, 2)] {
            assert_eq!(sym.get(r, c), 1.0, "missing ({}, {})", r, c);
        }
        assert_eq!(sym.nnz(), 4);
    }

    #[test]
    fn test_transpose_dominance_on_weighted_entries() {
        // (0,1)=2 vs (1,0)=5: the transpose dominates at (0,1), so both
        // positions end up at 5.
        let mx = coo(2, 2, vec![(0, 1, 2.0), (1, 0, 5.0)]);
        let sym = mx.transpose_dominance_merge().unwrap();
        assert_eq!(sym.get(0, 1), 5.0);
        assert_eq!(sym.get(1, 0), 5.0);
    }

    #[test]
    fn test_transpose_dominance_requires_square() {
        let mx = coo(2, 3, vec![(0, 2, 1.0)]);
        assert!(mx.transpose_dominance_merge().is_err());
    }

    #[test]
    fn test_unit_diagonal_overwrites() {
        let mx = coo(3, 3, vec![(0, 0, 7.0), (0, 1, 1.0)]);
        let with_diag = mx.with_unit_diagonal().unwrap();
        for i in 0..3 {
            assert_eq!(with_diag.get(i, i), 1.0);
        }
        assert_eq!(with_diag.get(0, 1), 1.0);
    }

    #[test]
    fn test_normalize_rows_postcondition() {
        let mx = coo(3, 3, vec![(0, 0, 1.0), (0, 1, 1.0), (0, 2, 2.0), (2, 2, 5.0)]);
        let norm = mx.normalize_rows();
        let sums = norm.row_sums();
        assert!((sums[0] - 1.0).abs() < 1e-6);
        assert_eq!(sums[1], 0.0); // empty row stays empty
        assert!((sums[2] - 1.0).abs() < 1e-6);
        assert_eq!(norm.get(0, 2), 0.5);

        // Idempotent on its own output.
        let again = norm.normalize_rows();
        assert_eq!(again, norm);
    }

    #[test]
    fn test_normalize_zero_row_no_nan() {
        let mx = coo(2, 2, vec![(0, 0, 2.0)]);
        let norm = mx.normalize_rows();
        assert_eq!(norm.get(1, 0), 0.0);
        assert_eq!(norm.get(1, 1), 0.0);
        assert!(norm.iter().all(|(_, _, v)| v.is_finite()));
    }

    #[test]
    fn test_csr_row_slicing() {
        let mx = coo(3, 3, vec![(0, 1, 0.5), (0, 2, 0.5), (2, 0, 1.0)]);
        let csr = mx.to_csr();
        assert_eq!(csr.row_ptr(), &[0, 2, 2, 3]);
        let (cols, vals) = csr.row(0);
        assert_eq!(cols, &[1, 2]);
        assert_eq!(vals, &[0.5, 0.5]);
        let (cols, _) = csr.row(1);
        assert!(cols.is_empty());
    }

    #[test]
    fn test_round_trips_between_forms() {
        let mx = coo(3, 3, vec![(0, 1, 0.5), (1, 0, 0.5), (2, 2, 1.0)]);
        assert_eq!(mx.to_csr().to_coo(), mx);
        assert_eq!(CooMatrix::from_dense(&mx.to_dense()), mx);
        assert_eq!(mx.to_tensor().to_coo().unwrap(), mx);
    }

    #[test]
    fn test_tensor_export_types() {
        let mx = coo(3, 3, vec![(2, 1, 0.25)]);
        let t = mx.to_tensor();
        assert_eq!(t.shape, (3, 3));
        assert_eq!(t.row, vec![2i64]);
        assert_eq!(t.col, vec![1i64]);
        assert_eq!(t.val, vec![0.25f32]);
    }
}
