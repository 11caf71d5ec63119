//! Forward/gradient engine.
//!
//! For parameters `(W, b)` and a batch `(X, Y)` of `m` records:
//!
//! - `A = sigmoid(clip(X·Wᵗ + b))`, shape `(m, n_category)`
//! - `cost = log_loss(A, Y)`
//! - `dW = (A - Y)ᵗ·X / m`, shape `(n_category, n_feature)`
//! - `db = Σ_rows(A - Y) / m`
//!
//! The public [`propagate`] validates shapes and allocates its result. The
//! optimizer loop goes through [`propagate_into`], which reuses the buffers of a
//! [`Gradients`] and a probability scratch vector across batches.

use crate::activation::sigmoid_in_place;
use crate::loss::log_loss;
use crate::matmul::{scores_into, weight_gradient_into};
use crate::{Error, Matrix, Params, Result};

/// Gradients of the batch cost with respect to weights and bias, plus the cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    d_weights: Matrix,
    d_bias: Vec<f64>,
    cost: f64,
}

impl Gradients {
    pub(crate) fn zeros(n_category: usize, n_feature: usize) -> Self {
        Self {
            d_weights: Matrix::zeros(n_category, n_feature),
            d_bias: vec![0.0; n_category],
            cost: 0.0,
        }
    }

    #[inline]
    pub fn d_weights(&self) -> &Matrix {
        &self.d_weights
    }

    #[inline]
    pub fn d_bias(&self) -> &[f64] {
        &self.d_bias
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

/// Compute gradients and cost of `params` over the whole of `(x, y)`.
///
/// Pure: inputs are not modified.
pub fn propagate(params: &Params, x: &Matrix, y: &Matrix) -> Result<Gradients> {
    check_shapes(params, x, y)?;

    let mut grads = Gradients::zeros(params.n_category(), params.n_feature());
    let mut probs = Vec::new();
    propagate_into(params, x.as_slice(), y.as_slice(), x.rows(), &mut probs, &mut grads);
    Ok(grads)
}

/// Validate that `params`, `x` and `y` agree on record, feature and category counts.
pub(crate) fn check_shapes(params: &Params, x: &Matrix, y: &Matrix) -> Result<()> {
    if x.rows() == 0 {
        return Err(Error::InvalidShape("batch must hold at least one record".to_owned()));
    }
    if x.cols() != params.n_feature() {
        return Err(Error::InvalidShape(format!(
            "X has {} features, weights expect {}",
            x.cols(),
            params.n_feature()
        )));
    }
    if y.cols() != params.n_category() {
        return Err(Error::InvalidShape(format!(
            "Y has {} categories, weights expect {}",
            y.cols(),
            params.n_category()
        )));
    }
    if x.rows() != y.rows() {
        return Err(Error::InvalidShape(format!(
            "X has {} records, Y has {}",
            x.rows(),
            y.rows()
        )));
    }
    Ok(())
}

/// Write `sigmoid(clip(X·Wᵗ + b))` for `len` records into `probs`.
///
/// Shape contract: `x.len() == len * n_feature`, `len > 0`.
pub(crate) fn probabilities_into(params: &Params, x: &[f64], len: usize, probs: &mut Vec<f64>) {
    let n_feature = params.n_feature();
    let n_category = params.n_category();
    debug_assert_eq!(x.len(), len * n_feature);

    probs.clear();
    probs.resize(len * n_category, 0.0);

    scores_into(x, params.weights().as_slice(), len, n_feature, n_category, probs);

    for row in probs.chunks_exact_mut(n_category) {
        for (z, &b) in row.iter_mut().zip(params.bias()) {
            *z += b;
        }
    }
    sigmoid_in_place(probs);
}

/// Overwrite `grads` with gradients and cost over one batch of `len` records.
///
/// Shape contract: `x.len() == len * n_feature`, `y.len() == len * n_category`,
/// `len > 0`, `grads` built for `params`.
pub(crate) fn propagate_into(
    params: &Params,
    x: &[f64],
    y: &[f64],
    len: usize,
    probs: &mut Vec<f64>,
    grads: &mut Gradients,
) {
    let n_feature = params.n_feature();
    let n_category = params.n_category();
    debug_assert_eq!(y.len(), len * n_category);
    debug_assert_eq!(grads.d_weights.shape(), (n_category, n_feature));

    probabilities_into(params, x, len, probs);
    grads.cost = log_loss(probs, y, len);

    // A - Y, in place.
    for (a, &t) in probs.iter_mut().zip(y) {
        *a -= t;
    }
    let inv_len = 1.0 / len as f64;

    weight_gradient_into(
        probs,
        x,
        len,
        n_category,
        n_feature,
        inv_len,
        grads.d_weights.as_mut_slice(),
    );

    grads.d_bias.fill(0.0);
    for row in probs.chunks_exact(n_category) {
        for (db, &d) in grads.d_bias.iter_mut().zip(row) {
            *db += d;
        }
    }
    for db in &mut grads.d_bias {
        *db *= inv_len;
    }
}
