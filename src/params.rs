use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Matrix, Result};

/// Weight initialization scheme.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Init {
    /// All weights and biases zero.
    #[default]
    Zeros,
    /// Every weight and bias set to the same value.
    Constant(f64),
    /// Uniform in `[-scale, scale]` from a seeded RNG.
    Uniform { scale: f64, seed: u64 },
}

impl Init {
    pub fn validate(self) -> Result<()> {
        match self {
            Init::Zeros => Ok(()),
            Init::Constant(v) => {
                if !v.is_finite() {
                    return Err(Error::InvalidConfig(format!(
                        "constant init must be finite, got {v}"
                    )));
                }
                Ok(())
            }
            Init::Uniform { scale, .. } => {
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(Error::InvalidConfig(format!(
                        "uniform init scale must be finite and > 0, got {scale}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Linear discriminants: one weight row and one bias per category.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Row-major matrix with shape `(n_category, n_feature)`.
    weights: Matrix,
    bias: Vec<f64>,
}

impl Params {
    pub fn zeros(n_category: usize, n_feature: usize) -> Self {
        Self {
            weights: Matrix::zeros(n_category, n_feature),
            bias: vec![0.0; n_category],
        }
    }

    pub fn new(n_category: usize, n_feature: usize, init: Init) -> Result<Self> {
        if n_category == 0 || n_feature == 0 {
            return Err(Error::InvalidShape(format!(
                "params dims must be > 0, got n_category={n_category} n_feature={n_feature}"
            )));
        }
        init.validate()?;

        let mut params = Self::zeros(n_category, n_feature);
        match init {
            Init::Zeros => {}
            Init::Constant(v) => {
                params.weights.as_mut_slice().fill(v);
                params.bias.fill(v);
            }
            Init::Uniform { scale, seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                for w in params.weights.as_mut_slice() {
                    *w = rng.random_range(-scale..=scale);
                }
                for b in &mut params.bias {
                    *b = rng.random_range(-scale..=scale);
                }
            }
        }
        Ok(params)
    }

    /// Build from explicit parts, validating shape agreement and finiteness.
    pub fn from_parts(weights: Matrix, bias: Vec<f64>) -> Result<Self> {
        if weights.rows() != bias.len() {
            return Err(Error::InvalidShape(format!(
                "weights have {} rows but bias has len {}",
                weights.rows(),
                bias.len()
            )));
        }
        if weights.rows() == 0 || weights.cols() == 0 {
            return Err(Error::InvalidShape(
                "weights must have at least one row and column".to_owned(),
            ));
        }
        if weights.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "weights must contain only finite values".to_owned(),
            ));
        }
        if bias.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "bias must contain only finite values".to_owned(),
            ));
        }
        Ok(Self { weights, bias })
    }

    #[inline]
    pub fn n_category(&self) -> usize {
        self.weights.rows()
    }

    #[inline]
    pub fn n_feature(&self) -> usize {
        self.weights.cols()
    }

    #[inline]
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    #[inline]
    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    pub fn into_parts(self) -> (Matrix, Vec<f64>) {
        (self.weights, self.bias)
    }

    /// Apply one gradient-descent step: `param -= lr * d_param`.
    #[inline]
    pub fn sgd_step(&mut self, d_weights: &Matrix, d_bias: &[f64], lr: f64) {
        debug_assert_eq!(d_weights.shape(), self.weights.shape());
        debug_assert_eq!(d_bias.len(), self.bias.len());

        for (w, &g) in self.weights.as_mut_slice().iter_mut().zip(d_weights.as_slice()) {
            *w -= lr * g;
        }
        for (b, &g) in self.bias.iter_mut().zip(d_bias) {
            *b -= lr * g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_init_is_all_zero() {
        let p = Params::new(4, 3, Init::Zeros).unwrap();
        assert_eq!(p.weights().shape(), (4, 3));
        assert!(p.weights().as_slice().iter().all(|&w| w == 0.0));
        assert_eq!(p.bias(), &[0.0; 4]);
    }

    #[test]
    fn uniform_init_is_seeded_and_bounded() {
        let a = Params::new(3, 5, Init::Uniform { scale: 0.1, seed: 3 }).unwrap();
        let b = Params::new(3, 5, Init::Uniform { scale: 0.1, seed: 3 }).unwrap();
        assert_eq!(a, b);
        assert!(a.weights().as_slice().iter().all(|w| w.abs() <= 0.1));
        assert!(a.weights().as_slice().iter().any(|&w| w != 0.0));
    }

    #[test]
    fn rejects_bad_init_and_shapes() {
        assert!(Params::new(0, 3, Init::Zeros).is_err());
        assert!(Params::new(2, 3, Init::Uniform { scale: 0.0, seed: 0 }).is_err());
        assert!(Params::new(2, 3, Init::Constant(f64::NAN)).is_err());
        assert!(Params::from_parts(Matrix::zeros(2, 3), vec![0.0]).is_err());
    }

    #[test]
    fn sgd_step_moves_against_gradient() {
        let mut p = Params::new(1, 2, Init::Constant(1.0)).unwrap();
        let dw = Matrix::from_flat(vec![2.0, -4.0], 2).unwrap();
        p.sgd_step(&dw, &[10.0], 0.5);
        assert_eq!(p.weights().as_slice(), &[0.0, 3.0]);
        assert_eq!(p.bias(), &[-4.0]);
    }
}
