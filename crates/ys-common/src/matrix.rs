//! Sparse event-by-exposure impact matrix (CSR layout).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Compressed sparse row matrix of impacts, one row per event and one
/// column per exposure point.
///
/// Only nonzero entries are stored; `nnz()` is therefore the number of
/// nonzero impacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TripletRepr", try_from = "TripletRepr")]
pub struct ImpactMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

/// Serialized form: coordinate triplets.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TripletRepr {
    n_rows: usize,
    n_cols: usize,
    #[serde(default)]
    rows: Vec<usize>,
    #[serde(default)]
    cols: Vec<usize>,
    #[serde(default)]
    values: Vec<f64>,
}

impl From<ImpactMatrix> for TripletRepr {
    fn from(mat: ImpactMatrix) -> Self {
        let mut rows = Vec::with_capacity(mat.nnz());
        for row in 0..mat.n_rows {
            rows.extend(std::iter::repeat(row).take(mat.indptr[row + 1] - mat.indptr[row]));
        }
        TripletRepr {
            n_rows: mat.n_rows,
            n_cols: mat.n_cols,
            rows,
            cols: mat.indices,
            values: mat.data,
        }
    }
}

impl TryFrom<TripletRepr> for ImpactMatrix {
    type Error = Error;

    fn try_from(repr: TripletRepr) -> Result<Self> {
        if repr.cols.len() != repr.rows.len() {
            return Err(Error::LengthMismatch {
                field: "imp_mat.cols",
                expected: repr.rows.len(),
                actual: repr.cols.len(),
            });
        }
        if repr.values.len() != repr.rows.len() {
            return Err(Error::LengthMismatch {
                field: "imp_mat.values",
                expected: repr.rows.len(),
                actual: repr.values.len(),
            });
        }
        let triplets: Vec<(usize, usize, f64)> = repr
            .rows
            .iter()
            .zip(&repr.cols)
            .zip(&repr.values)
            .map(|((&r, &c), &v)| (r, c, v))
            .collect();
        ImpactMatrix::from_triplets(repr.n_rows, repr.n_cols, &triplets)
    }
}

impl Default for ImpactMatrix {
    fn default() -> Self {
        ImpactMatrix::empty(0, 0)
    }
}

impl ImpactMatrix {
    /// All-zero matrix of the given shape.
    pub fn empty(n_rows: usize, n_cols: usize) -> Self {
        ImpactMatrix {
            n_rows,
            n_cols,
            indptr: vec![0; n_rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build from `(row, col, value)` triplets. Duplicates are summed and
    /// zeros are dropped.
    pub fn from_triplets(n_rows: usize, n_cols: usize, triplets: &[(usize, usize, f64)]) -> Result<Self> {
        let mut rows: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n_rows];
        for &(row, col, value) in triplets {
            if row >= n_rows {
                return Err(Error::IndexOutOfRange {
                    index: row,
                    n_events: n_rows,
                });
            }
            if col >= n_cols {
                return Err(Error::LengthMismatch {
                    field: "imp_mat columns",
                    expected: n_cols,
                    actual: col + 1,
                });
            }
            *rows[row].entry(col).or_insert(0.0) += value;
        }
        Ok(Self::from_row_maps(n_cols, rows))
    }

    /// Build from dense rows. All rows must have the same width.
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut maps = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != n_cols {
                return Err(Error::LengthMismatch {
                    field: "imp_mat row",
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            maps.push(row.iter().copied().enumerate().collect::<BTreeMap<_, _>>());
        }
        Ok(Self::from_row_maps(n_cols, maps))
    }

    fn from_row_maps(n_cols: usize, rows: Vec<BTreeMap<usize, f64>>) -> Self {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        let n_rows = rows.len();
        for row in rows {
            for (col, value) in row {
                if value != 0.0 {
                    indices.push(col);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }
        ImpactMatrix {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Stored entries of one row as `(col, value)`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = if row < self.n_rows {
            (self.indptr[row], self.indptr[row + 1])
        } else {
            (0, 0)
        };
        self.indices[start..end]
            .iter()
            .copied()
            .zip(self.data[start..end].iter().copied())
    }

    /// Value at `(row, col)`, zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row)
            .find(|&(c, _)| c == col)
            .map_or(0.0, |(_, v)| v)
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.n_rows).map(|r| self.row(r).map(|(_, v)| v).sum()).collect()
    }

    /// Column sums with each row scaled by `weights[row]`.
    pub fn weighted_column_sums(&self, weights: &[f64]) -> Result<Vec<f64>> {
        if weights.len() != self.n_rows {
            return Err(Error::LengthMismatch {
                field: "weights",
                expected: self.n_rows,
                actual: weights.len(),
            });
        }
        let mut out = vec![0.0; self.n_cols];
        for (row, weight) in weights.iter().enumerate() {
            for (col, value) in self.row(row) {
                out[col] += weight * value;
            }
        }
        Ok(out)
    }

    /// New matrix made of the given rows, in order. Rows may repeat.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for &row in rows {
            self.check_row(row)?;
            let (start, end) = (self.indptr[row], self.indptr[row + 1]);
            indices.extend_from_slice(&self.indices[start..end]);
            data.extend_from_slice(&self.data[start..end]);
            indptr.push(indices.len());
        }
        Ok(ImpactMatrix {
            n_rows: rows.len(),
            n_cols: self.n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// One output row per group, each the element-wise sum of the group's rows.
    ///
    /// Equivalent to left-multiplying by a 0/1 group membership matrix.
    pub fn sum_row_groups(&self, groups: &[Vec<usize>]) -> Result<Self> {
        let mut maps = Vec::with_capacity(groups.len());
        for group in groups {
            let mut acc = BTreeMap::new();
            for &row in group {
                self.check_row(row)?;
                for (col, value) in self.row(row) {
                    *acc.entry(col).or_insert(0.0) += value;
                }
            }
            maps.push(acc);
        }
        Ok(Self::from_row_maps(self.n_cols, maps))
    }

    /// Dense copy, row-major.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        (0..self.n_rows)
            .map(|r| {
                let mut dense = vec![0.0; self.n_cols];
                for (col, value) in self.row(r) {
                    dense[col] = value;
                }
                dense
            })
            .collect()
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.n_rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                n_events: self.n_rows,
            });
        }
        Ok(())
    }
}
