//! Inference.
//!
//! Turns per-category probabilities into a discrete decision:
//!
//! - one category column: `1` iff the probability is above `0.5`
//! - several columns: one-hot at the most probable column, the lowest index
//!   winning ties

use crate::propagate::probabilities_into;
use crate::{Error, Matrix, Params, Result};

/// Probability threshold of the single-column decision.
pub const BINARY_THRESHOLD: f64 = 0.5;

/// Integral `(n_records, n_category)` decision matrix with values in `{0, 1}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predictions {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl Predictions {
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
    pub fn row(&self, idx: usize) -> &[u8] {
        let start = idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Index of the selected column per record.
    ///
    /// For a single category column this is always `0`; use [`Predictions::row`]
    /// to read the binary decision.
    pub fn class_indices(&self) -> Vec<usize> {
        (0..self.rows)
            .map(|i| self.row(i).iter().position(|&v| v == 1).unwrap_or(0))
            .collect()
    }

    /// Widen to an `f64` matrix, e.g. to compare against one-hot labels.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_flat(self.data.iter().map(|&v| f64::from(v)).collect(), self.cols)
            .unwrap_or_else(|_| Matrix::zeros(0, self.cols))
    }
}

/// Predict class decisions for every record of `x`.
pub fn predict(params: &Params, x: &Matrix) -> Result<Predictions> {
    if x.is_empty() {
        return Err(Error::InvalidData("inputs must not be empty".to_owned()));
    }
    if x.cols() != params.n_feature() {
        return Err(Error::InvalidShape(format!(
            "X has {} features, weights expect {}",
            x.cols(),
            params.n_feature()
        )));
    }

    let n_category = params.n_category();
    let mut probs = Vec::new();
    probabilities_into(params, x.as_slice(), x.rows(), &mut probs);

    let mut data = vec![0_u8; probs.len()];
    if n_category == 1 {
        for (out, &a) in data.iter_mut().zip(&probs) {
            *out = u8::from(a > BINARY_THRESHOLD);
        }
    } else {
        for (out, row) in data
            .chunks_exact_mut(n_category)
            .zip(probs.chunks_exact(n_category))
        {
            out[first_argmax(row)] = 1;
        }
    }

    Ok(Predictions {
        data,
        rows: x.rows(),
        cols: n_category,
    })
}

/// Index of the first maximal value.
#[inline]
fn first_argmax(xs: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in xs.iter().enumerate().skip(1) {
        if v > xs[best] {
            best = i;
        }
    }
    best
}
