//! Contiguous matrix and dataset helpers.
//!
//! The optimizer loop operates on row slices to avoid per-batch copies. `Matrix`
//! and `Dataset` provide validated, row-major storage for feature/label matrices.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{Error, Result};

/// A dense `f64` matrix.
///
/// Stored as a contiguous buffer with row-major layout:
/// - `data.len() == rows * cols`
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// A `(rows, cols)` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Build a matrix from a flat buffer with shape `(len / cols, cols)`.
    pub fn from_flat(data: Vec<f64>, cols: usize) -> Result<Self> {
        if cols == 0 {
            return Err(Error::InvalidShape("cols must be > 0".to_owned()));
        }
        if !data.len().is_multiple_of(cols) {
            return Err(Error::InvalidShape(format!(
                "buffer length {} is not divisible by cols {}",
                data.len(),
                cols
            )));
        }

        let rows = data.len() / cols;
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from per-record rows.
    ///
    /// This is a convenience constructor (it copies into contiguous storage).
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InvalidData("rows must not be empty".to_owned()));
        }

        let cols = rows[0].len();
        if cols == 0 {
            return Err(Error::InvalidShape("cols must be > 0".to_owned()));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::InvalidShape(format!(
                    "row {i} has len {}, expected {cols}",
                    row.len()
                )));
            }
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Build a single-column matrix from a vector.
    pub fn column(values: Vec<f64>) -> Self {
        let rows = values.len();
        Self {
            data: values,
            rows,
            cols: 1,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Returns the `idx`-th row.
    ///
    /// Panics if `idx >= rows`.
    #[inline]
    pub fn row(&self, idx: usize) -> &[f64] {
        let start = idx * self.cols;
        &self.data[start..start + self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, idx: usize) -> &mut [f64] {
        let start = idx * self.cols;
        &mut self.data[start..start + self.cols]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Contiguous rows `[start, end)` as a flat slice.
    #[inline]
    pub(crate) fn row_range(&self, start: usize, end: usize) -> &[f64] {
        &self.data[start * self.cols..end * self.cols]
    }

    /// Copy out the listed rows, in order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &idx in indices {
            data.extend_from_slice(self.row(idx));
        }
        Self {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }
}

/// Label input accepted by model assembly.
///
/// A rank-1 vector is a binary problem with one category column; a rank-2
/// matrix holds one one-hot column per category.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    Vector(Vec<f64>),
    Matrix(Matrix),
}

impl Targets {
    /// Reshape into a `(len, n_category)` matrix.
    pub fn into_matrix(self) -> Matrix {
        match self {
            Targets::Vector(values) => Matrix::column(values),
            Targets::Matrix(m) => m,
        }
    }
}

impl From<Vec<f64>> for Targets {
    fn from(value: Vec<f64>) -> Self {
        Targets::Vector(value)
    }
}

impl From<Matrix> for Targets {
    fn from(value: Matrix) -> Self {
        Targets::Matrix(value)
    }
}

/// A supervised dataset: standardized features (X) and one-hot labels (Y).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Matrix,
    labels: Matrix,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Matrix) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        if features.rows() != labels.rows() {
            return Err(Error::InvalidShape(format!(
                "features/labels length mismatch: {} vs {}",
                features.rows(),
                labels.rows()
            )));
        }
        if labels.cols() == 0 {
            return Err(Error::InvalidShape(
                "labels must have at least one category column".to_owned(),
            ));
        }
        Ok(Self { features, labels })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[inline]
    pub fn n_feature(&self) -> usize {
        self.features.cols()
    }

    #[inline]
    pub fn n_category(&self) -> usize {
        self.labels.cols()
    }

    #[inline]
    pub fn features(&self) -> &Matrix {
        &self.features
    }

    #[inline]
    pub fn labels(&self) -> &Matrix {
        &self.labels
    }

    /// Contiguous batches of `batch_size` records in order; the last may be shorter.
    pub(crate) fn batches(&self, batch_size: usize) -> Batches<'_> {
        debug_assert!(batch_size > 0);
        Batches {
            data: self,
            batch_size,
            start: 0,
        }
    }

    /// Shuffle records with a seeded RNG and split off the first `train_len`.
    pub fn shuffle_split(&self, train_len: usize, seed: u64) -> Result<(Dataset, Dataset)> {
        if train_len == 0 || train_len >= self.len() {
            return Err(Error::InvalidConfig(format!(
                "train_len must be in 1..{}, got {train_len}",
                self.len()
            )));
        }

        let mut order: Vec<usize> = (0..self.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let (train_idx, test_idx) = order.split_at(train_len);
        let train = Dataset::new(
            self.features.select_rows(train_idx),
            self.labels.select_rows(train_idx),
        )?;
        let test = Dataset::new(
            self.features.select_rows(test_idx),
            self.labels.select_rows(test_idx),
        )?;
        Ok((train, test))
    }
}

/// A borrowed run of contiguous records.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Batch<'a> {
    pub features: &'a [f64],
    pub labels: &'a [f64],
    pub len: usize,
}

pub(crate) struct Batches<'a> {
    data: &'a Dataset,
    batch_size: usize,
    start: usize,
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.data.len() {
            return None;
        }
        let end = (self.start + self.batch_size).min(self.data.len());
        let batch = Batch {
            features: self.data.features.row_range(self.start, end),
            labels: self.data.labels.row_range(self.start, end),
            len: end - self.start,
        };
        self.start = end;
        Some(batch)
    }
}
