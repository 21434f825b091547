use crate::error::{PrediktError, PrediktResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense 2-D matrix of `f64`: the numeric feature block every model consumes.
///
/// Stores data in a flat contiguous `Vec<f64>` with row-major (C-order) layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl Matrix {
    /// Create a matrix from row-major data.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> PrediktResult<Self> {
        if data.len() != rows * cols {
            return Err(PrediktError::ShapeMismatch {
                expected: (rows, cols),
                got: (data.len(), 1),
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Identity matrix of size n×n.
    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Build from a slice of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> PrediktResult<Self> {
        if rows.is_empty() {
            return Ok(Matrix::zeros(0, 0));
        }
        let cols = rows[0].len();
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(PrediktError::DimensionMismatch(format!(
                "all rows must have {} columns, found one with {}",
                cols,
                bad.len()
            )));
        }
        let data: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Matrix::new(data, rows.len(), cols)
    }

    /// A single column vector (n×1).
    pub fn from_column(values: &[f64]) -> Self {
        Matrix {
            data: values.to_vec(),
            rows: values.len(),
            cols: 1,
        }
    }

    /// A single row vector (1×n).
    pub fn from_row(values: &[f64]) -> Self {
        Matrix {
            data: values.to_vec(),
            rows: 1,
            cols: values.len(),
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    pub fn get(&self, i: usize, j: usize) -> PrediktResult<f64> {
        self.check_index(i, j)?;
        Ok(self.data[i * self.cols + j])
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) -> PrediktResult<()> {
        self.check_index(i, j)?;
        self.data[i * self.cols + j] = value;
        Ok(())
    }

    fn check_index(&self, i: usize, j: usize) -> PrediktResult<()> {
        if i >= self.rows {
            return Err(PrediktError::IndexOutOfBounds {
                index: i,
                axis: 0,
                size: self.rows,
            });
        }
        if j >= self.cols {
            return Err(PrediktError::IndexOutOfBounds {
                index: j,
                axis: 1,
                size: self.cols,
            });
        }
        Ok(())
    }

    /// Borrow row `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics; a 0-column matrix holds no data anyway
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Copy column `j` out.
    pub fn column(&self, j: usize) -> PrediktResult<Vec<f64>> {
        if j >= self.cols {
            return Err(PrediktError::IndexOutOfBounds {
                index: j,
                axis: 1,
                size: self.cols,
            });
        }
        Ok((0..self.rows).map(|i| self.data[i * self.cols + j]).collect())
    }

    // ─── Shape manipulation ─────────────────────────────────────────────────

    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Concatenate matrices side by side (column-wise). All must share a row count.
    pub fn hstack(blocks: &[&Matrix]) -> PrediktResult<Matrix> {
        let Some(first) = blocks.first() else {
            return Err(PrediktError::EmptyInput("hstack needs at least one block".into()));
        };
        let rows = first.rows;
        if let Some(bad) = blocks.iter().find(|b| b.rows != rows) {
            return Err(PrediktError::ShapeMismatch {
                expected: (rows, bad.cols),
                got: bad.shape(),
            });
        }
        let cols: usize = blocks.iter().map(|b| b.cols).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for b in blocks {
                data.extend_from_slice(b.row(i));
            }
        }
        Matrix::new(data, rows, cols)
    }

    /// Gather rows by index, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> PrediktResult<Matrix> {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            if i >= self.rows {
                return Err(PrediktError::IndexOutOfBounds {
                    index: i,
                    axis: 0,
                    size: self.rows,
                });
            }
            data.extend_from_slice(self.row(i));
        }
        Matrix::new(data, indices.len(), self.cols)
    }

    // ─── Arithmetic ─────────────────────────────────────────────────────────

    /// Matrix product `self @ other`.
    pub fn matmul(&self, other: &Matrix) -> PrediktResult<Matrix> {
        if self.cols != other.rows {
            return Err(PrediktError::DimensionMismatch(format!(
                "matmul: {}x{} @ {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = vec![0.0; self.rows * other.cols];
        for i in 0..self.rows {
            let out_row = &mut out[i * other.cols..(i + 1) * other.cols];
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == 0.0 {
                    continue;
                }
                for (o, &b) in out_row.iter_mut().zip(other.row(k)) {
                    *o += a * b;
                }
            }
        }
        Matrix::new(out, self.rows, other.cols)
    }

    /// Matrix-vector product.
    pub fn matvec(&self, v: &[f64]) -> PrediktResult<Vec<f64>> {
        if v.len() != self.cols {
            return Err(PrediktError::DimensionMismatch(format!(
                "matvec: {}x{} with vector of length {}",
                self.rows,
                self.cols,
                v.len()
            )));
        }
        Ok(self
            .iter_rows()
            .map(|r| r.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Matrix {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    // ─── Reductions ─────────────────────────────────────────────────────────

    pub fn column_means(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for r in self.iter_rows() {
            for (s, &v) in sums.iter_mut().zip(r) {
                *s += v;
            }
        }
        let n = self.rows.max(1) as f64;
        sums.into_iter().map(|s| s / n).collect()
    }

    /// Population standard deviation of each column (ddof = 0).
    pub fn column_stds(&self) -> Vec<f64> {
        let means = self.column_means();
        let mut sq = vec![0.0; self.cols];
        for r in self.iter_rows() {
            for ((s, &v), &m) in sq.iter_mut().zip(r).zip(&means) {
                *s += (v - m) * (v - m);
            }
        }
        let n = self.rows.max(1) as f64;
        sq.into_iter().map(|s| (s / n).sqrt()).collect()
    }

    pub fn has_nan(&self) -> bool {
        self.data.iter().any(|v| v.is_nan())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix({}x{})", self.rows, self.cols)?;
        for r in self.iter_rows().take(10) {
            let cells: Vec<String> = r.iter().take(8).map(|v| format!("{:.4}", v)).collect();
            writeln!(f, "  [{}{}]", cells.join(", "), if r.len() > 8 { ", …" } else { "" })?;
        }
        if self.rows > 10 {
            writeln!(f, "  …")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_new_checks_length() {
        assert!(Matrix::new(vec![1.0, 2.0, 3.0], 2, 2).is_err());
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        assert_eq!(m.get(1, 0).unwrap(), 3.0);
        assert!(m.get(2, 0).is_err());
    }

    #[test]
    fn test_matmul() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![5.0], vec![6.0]]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), (2, 1));
        assert_eq!(c.data(), &[17.0, 39.0]);
        assert!(b.matmul(&b).is_err());
    }

    #[test]
    fn test_hstack_and_select() {
        let a = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![10.0, 11.0], vec![20.0, 21.0], vec![30.0, 31.0]]).unwrap();
        let c = Matrix::hstack(&[&a, &b]).unwrap();
        assert_eq!(c.shape(), (3, 3));
        assert_eq!(c.row(1), &[2.0, 20.0, 21.0]);

        let picked = c.select_rows(&[2, 0]).unwrap();
        assert_eq!(picked.row(0), &[3.0, 30.0, 31.0]);
        assert_eq!(picked.row(1), &[1.0, 10.0, 11.0]);
        assert!(c.select_rows(&[3]).is_err());
    }

    #[test]
    fn test_column_stats() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let means = m.column_means();
        assert_abs_diff_eq!(means[0], 3.0);
        assert_abs_diff_eq!(means[1], 4.0);
        let stds = m.column_stds();
        assert_abs_diff_eq!(stds[0], (8.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.row(2), &[3.0, 6.0]);
    }
}
