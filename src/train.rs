//! The training loop.
//!
//! [`optimize`] runs every optimizer through one loop: each epoch walks the
//! training set in contiguous batches of the optimizer's size, in record order,
//! and takes one gradient step per batch. The cost of the last batch is sampled
//! at epochs `0, 100, 200, ...` and once more after the final epoch.
//!
//! [`model`] assembles initial parameters and runs [`optimize`].

use tracing::{debug, info};

use crate::propagate::{Gradients, check_shapes, propagate_into};
use crate::{Dataset, Error, Init, Matrix, Optimizer, Params, Result, Targets};

/// A cost sample is recorded every this many epochs.
pub const COST_TRACE_INTERVAL: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConfig {
    pub epochs: usize,
    pub lr: f64,
    pub optimizer: Optimizer,
    /// Initializer for parameters the caller does not supply.
    pub init: Init,
    /// Log progress every `print_cost` epochs; `0` disables it.
    pub print_cost: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: 1,
            lr: 1e-3,
            optimizer: Optimizer::default(),
            init: Init::Zeros,
            print_cost: 0,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "lr must be finite and > 0, got {}",
                self.lr
            )));
        }
        self.optimizer.validate()?;
        self.init.validate()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub params: Params,
    /// One cost per `COST_TRACE_INTERVAL` epochs, then the final cost.
    pub costs: Vec<f64>,
}

impl FitReport {
    #[inline]
    pub fn final_cost(&self) -> f64 {
        self.costs.last().copied().unwrap_or(f64::NAN)
    }
}

/// Run gradient descent from `init` over `train`.
///
/// `init` is cloned; the caller's parameters are left untouched. Batches are
/// contiguous slices in dataset order, and the same order is used every epoch.
pub fn optimize(init: &Params, train: &Dataset, cfg: &FitConfig) -> Result<FitReport> {
    cfg.validate()?;
    check_shapes(init, train.features(), train.labels())?;

    let mut params = init.clone();
    let batch_size = cfg.optimizer.batch_size(train.len());
    let mut grads = Gradients::zeros(params.n_category(), params.n_feature());
    let mut probs = Vec::with_capacity(batch_size.min(train.len()) * params.n_category());
    let mut costs = Vec::with_capacity(cfg.epochs / COST_TRACE_INTERVAL + 2);

    for epoch in 0..cfg.epochs {
        for batch in train.batches(batch_size) {
            propagate_into(
                &params,
                batch.features,
                batch.labels,
                batch.len,
                &mut probs,
                &mut grads,
            );
            params.sgd_step(grads.d_weights(), grads.d_bias(), cfg.lr);
        }

        if epoch % COST_TRACE_INTERVAL == 0 {
            debug!(epoch, cost = grads.cost(), "cost trace sample");
            costs.push(grads.cost());
        }
        if cfg.print_cost > 0 && epoch % cfg.print_cost == 0 {
            info!(epoch, cost = grads.cost(), "training progress");
        }
    }
    costs.push(grads.cost());

    Ok(FitReport { params, costs })
}

/// Assemble and train a model.
///
/// `y` may be rank 1 (binary, one category column) or rank 2 (one-hot). Missing
/// initial weights or bias are built with `cfg.init`, sized from the data.
pub fn model(
    x: &Matrix,
    y: impl Into<Targets>,
    cfg: &FitConfig,
    w_init: Option<Matrix>,
    b_init: Option<Vec<f64>>,
) -> Result<FitReport> {
    let y = y.into().into_matrix();
    let train = Dataset::new(x.clone(), y)?;
    let (n_category, n_feature) = (train.n_category(), train.n_feature());

    let init = match (w_init, b_init) {
        (Some(w), Some(b)) => Params::from_parts(w, b)?,
        (w, b) => {
            let (default_w, default_b) = Params::new(n_category, n_feature, cfg.init)?.into_parts();
            Params::from_parts(w.unwrap_or(default_w), b.unwrap_or(default_b))?
        }
    };
    if init.weights().shape() != (n_category, n_feature) {
        return Err(Error::InvalidShape(format!(
            "initial weights have shape {:?}, data needs ({n_category}, {n_feature})",
            init.weights().shape()
        )));
    }

    info!(
        optimizer = %cfg.optimizer,
        epochs = cfg.epochs,
        lr = cfg.lr,
        records = train.len(),
        n_feature,
        n_category,
        "training"
    );
    let report = optimize(&init, &train, cfg)?;
    info!(final_cost = report.final_cost(), "training finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate;

    fn blobs() -> (Matrix, Matrix) {
        let x = Matrix::from_rows(&[
            vec![-1.0, -0.5],
            vec![-0.8, -1.2],
            vec![-1.4, -0.9],
            vec![1.1, 0.7],
            vec![0.9, 1.3],
            vec![1.2, 1.0],
            vec![-0.2, 1.5],
        ])
        .unwrap();
        let y = Matrix::from_rows(&[
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ])
        .unwrap();
        (x, y)
    }

    fn cfg(optimizer: Optimizer, epochs: usize) -> FitConfig {
        FitConfig {
            epochs,
            lr: 0.1,
            optimizer,
            ..FitConfig::default()
        }
    }

    #[test]
    fn one_gd_epoch_equals_one_propagate_and_update() {
        let (x, y) = blobs();
        let init = Params::new(2, 2, Init::Uniform { scale: 0.3, seed: 5 }).unwrap();
        let train = Dataset::new(x.clone(), y.clone()).unwrap();

        let report = optimize(&init, &train, &cfg(Optimizer::Gd, 1)).unwrap();

        let g = propagate(&init, &x, &y).unwrap();
        let mut expected = init.clone();
        expected.sgd_step(g.d_weights(), g.d_bias(), 0.1);

        assert_eq!(report.params, expected);
        assert_eq!(report.costs, vec![g.cost(), g.cost()]);
    }

    #[test]
    fn sgd_makes_one_update_per_record() {
        let (x, y) = blobs();
        let init = Params::zeros(2, 2);
        let train = Dataset::new(x.clone(), y.clone()).unwrap();
        let report = optimize(&init, &train, &cfg(Optimizer::Sgd, 1)).unwrap();

        let mut expected = init;
        let mut last_cost = 0.0;
        for i in 0..x.rows() {
            let xi = Matrix::from_flat(x.row(i).to_vec(), 2).unwrap();
            let yi = Matrix::from_flat(y.row(i).to_vec(), 2).unwrap();
            let g = propagate(&expected, &xi, &yi).unwrap();
            expected.sgd_step(g.d_weights(), g.d_bias(), 0.1);
            last_cost = g.cost();
        }
        assert_eq!(report.params, expected);
        assert_eq!(report.final_cost(), last_cost);
    }

    #[test]
    fn bgd_with_batch_at_least_len_matches_gd() {
        let (x, y) = blobs();
        let gd = model(&x, y.clone(), &cfg(Optimizer::Gd, 20), None, None).unwrap();
        let bgd = model(
            &x,
            y,
            &cfg(Optimizer::Bgd { batch_size: 100 }, 20),
            None,
            None,
        )
        .unwrap();
        assert_eq!(gd, bgd);
    }

    #[test]
    fn cost_trace_samples_every_hundred_epochs_plus_final() {
        let (x, y) = blobs();
        let report = model(&x, y, &cfg(Optimizer::Gd, 250), None, None).unwrap();
        // Epochs 0, 100, 200, then the final cost.
        assert_eq!(report.costs.len(), 4);
        assert!(report.costs[3] < report.costs[0]);
    }

    #[test]
    fn caller_params_are_not_mutated() {
        let (x, y) = blobs();
        let init = Params::new(2, 2, Init::Constant(0.25)).unwrap();
        let snapshot = init.clone();
        let train = Dataset::new(x, y).unwrap();
        let report = optimize(&init, &train, &cfg(Optimizer::Sgd, 3)).unwrap();
        assert_eq!(init, snapshot);
        assert_ne!(report.params, snapshot);
    }

    #[test]
    fn training_is_deterministic() {
        let (x, y) = blobs();
        for opt in [Optimizer::Gd, Optimizer::Bgd { batch_size: 3 }, Optimizer::Sgd] {
            let a = model(&x, y.clone(), &cfg(opt, 150), None, None).unwrap();
            let b = model(&x, y.clone(), &cfg(opt, 150), None, None).unwrap();
            assert_eq!(a, b, "{opt} is not deterministic");
        }
    }

    #[test]
    fn rank_one_targets_train_a_single_row() {
        let (x, _) = blobs();
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let report = model(&x, y, &cfg(Optimizer::Gd, 10), None, None).unwrap();
        assert_eq!(report.params.weights().shape(), (1, 2));
        assert_eq!(report.params.bias().len(), 1);
    }

    #[test]
    fn rejects_invalid_hyperparameters() {
        let (x, y) = blobs();
        let mut bad = cfg(Optimizer::Gd, 0);
        assert!(matches!(
            model(&x, y.clone(), &bad, None, None),
            Err(Error::InvalidConfig(_))
        ));

        bad.epochs = 10;
        bad.lr = -0.1;
        assert!(matches!(
            model(&x, y.clone(), &bad, None, None),
            Err(Error::InvalidConfig(_))
        ));

        bad.lr = 0.1;
        bad.optimizer = Optimizer::Bgd { batch_size: 0 };
        assert!(matches!(
            model(&x, y, &bad, None, None),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_initial_weights_of_wrong_shape() {
        let (x, y) = blobs();
        let w = Matrix::zeros(3, 2);
        let err = model(&x, y, &cfg(Optimizer::Gd, 1), Some(w), None).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
    }
}
