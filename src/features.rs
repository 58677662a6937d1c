//! Node feature dataset.
//!
//! A feature file is a whitespace-delimited numeric matrix, one row per
//! node, rows in node-index order. The dataset is a pure random-access
//! container: batching, shuffling and any transformation belong to the
//! consumer.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::{Array2, ArrayView1};
use tracing::info;

use crate::error::{PrepError, PrepResult};

/// Random-access node feature matrix.
#[derive(Debug, Clone)]
pub struct FeatureDataset {
    x: Array2<f64>,
}

impl FeatureDataset {
    /// Load a feature matrix from a whitespace-delimited text file.
    ///
    /// Every row must hold the same number of values; a ragged or
    /// non-numeric row is an `InputFormat` error. Whether the row count
    /// matches a paired graph's node count is the caller's concern.
    pub fn load(path: impl AsRef<Path>) -> PrepResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PrepError::io(path, e))?;
        let reader = BufReader::new(file);

        let mut values: Vec<f64> = Vec::new();
        let mut dim: Option<usize> = None;
        let mut rows = 0usize;

        for (lineno, line) in reader.lines().enumerate() {
            let lineno = lineno + 1;
            let line = line.map_err(|e| PrepError::io(path, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let start = values.len();
            for token in line.split_whitespace() {
                let v: f64 = token.parse().map_err(|_| {
                    PrepError::format(path, lineno, format!("invalid value {:?}", token))
                })?;
                values.push(v);
            }
            let width = values.len() - start;
            match dim {
                None => dim = Some(width),
                Some(d) if d != width => {
                    return Err(PrepError::format(
                        path,
                        lineno,
                        format!("expected {} values, found {}", d, width),
                    ));
                }
                Some(_) => {}
            }
            rows += 1;
        }

        let dim = dim.unwrap_or(0);
        let x = Array2::from_shape_vec((rows, dim), values).map_err(|e| {
            PrepError::DimensionMismatch {
                expected: format!("{}x{}", rows, dim),
                found: e.to_string(),
            }
        })?;

        info!(path = %path.display(), rows, dim, "feature matrix loaded");
        Ok(FeatureDataset { x })
    }

    /// Wrap an in-memory feature matrix.
    pub fn from_matrix(x: Array2<f64>) -> Self {
        FeatureDataset { x }
    }

    /// Number of feature rows.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.x.nrows() == 0
    }

    /// Feature dimension (values per row).
    pub fn dim(&self) -> usize {
        self.x.ncols()
    }

    /// Bounds-checked random access: the feature row paired with its index.
    ///
    /// Any index outside `[0, len)` — including negatives — fails with
    /// `IndexOutOfRange`.
    pub fn get(&self, index: i64) -> PrepResult<(ArrayView1<'_, f64>, i64)> {
        if index < 0 || index as usize >= self.len() {
            return Err(PrepError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok((self.x.row(index as usize), index))
    }
}
