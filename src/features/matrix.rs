//! Dense row-major feature matrix keyed by term.

use crate::error::{PrepError, Result};

/// One row per corpus row, one column per vocabulary term.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    terms: Vec<String>,
    n_rows: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Build from row-major `data` of length `n_rows * terms.len()`.
    pub fn new(terms: Vec<String>, n_rows: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n_rows * terms.len() {
            return Err(PrepError::InvalidParameter(format!(
                "matrix data has {} cells, expected {} x {}",
                data.len(),
                n_rows,
                terms.len()
            )));
        }
        Ok(Self {
            terms,
            n_rows,
            data,
        })
    }

    /// Build from per-row vectors, each as long as `terms`.
    pub fn from_rows(terms: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let data: Vec<f64> = rows.into_iter().flatten().collect();
        Self::new(terms, n_rows, data)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.terms.len()
    }

    /// Column labels, in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let n_cols = self.n_cols();
        &self.data[row * n_cols..(row + 1) * n_cols]
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n_cols() + col]
    }

    pub fn column_index(&self, term: &str) -> Option<usize> {
        self.terms.iter().position(|t| t == term)
    }

    /// All values of the column for `term`, or `None` if the term is not a column.
    pub fn column(&self, term: &str) -> Option<Vec<f64>> {
        let col = self.column_index(term)?;
        Some((0..self.n_rows).map(|r| self.get(r, col)).collect())
    }

    /// Arithmetic mean of every column. Zero for a matrix without rows.
    pub fn column_means(&self) -> Vec<f64> {
        let n_cols = self.n_cols();
        let mut sums = vec![0.0; n_cols];
        for row in self.data.chunks_exact(n_cols.max(1)).take(self.n_rows) {
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum += value;
            }
        }
        if self.n_rows == 0 {
            return sums;
        }
        sums.into_iter().map(|s| s / self.n_rows as f64).collect()
    }
}
