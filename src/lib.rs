//! One-vs-rest logistic regression.
//!
//! `rust-logreg` trains one logistic discriminant per category over a fixed set of
//! standardized numeric features, and turns the per-category probabilities into a
//! single class decision.
//!
//! # Pipeline
//!
//! - [`table`]: raw CSV to typed columns
//! - [`preprocess`]: imputation, feature selection, z-score standardization and
//!   one-hot labels
//! - [`propagate()`]: probabilities, smoothed log-loss and gradients for one batch
//! - [`train`]: a single gradient-descent loop; `GD`, `BGD` and `SGD` differ only
//!   in batch size
//! - [`predict()`] / [`evaluate`]: class decisions and accuracy
//! - [`bundle`]: the persisted weights, bias, features and standardization stats
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`.
//! - [`Matrix`] stores records contiguously in row-major layout.
//! - Weights are row-major with shape `(n_category, n_feature)`; bias has length
//!   `n_category`.
//! - Training is deterministic: batches are contiguous slices in dataset order.
//!
//! # Quick start
//!
//! ```rust
//! use rust_logreg::{FitConfig, Matrix, Optimizer, evaluate, model};
//!
//! # fn main() -> rust_logreg::Result<()> {
//! let x = Matrix::from_rows(&[
//!     vec![-1.0, -1.0],
//!     vec![-0.5, -1.5],
//!     vec![1.0, 1.0],
//!     vec![1.5, 0.5],
//! ])?;
//! let y = Matrix::from_rows(&[
//!     vec![1.0, 0.0],
//!     vec![1.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![0.0, 1.0],
//! ])?;
//!
//! let cfg = FitConfig {
//!     epochs: 200,
//!     lr: 0.1,
//!     optimizer: Optimizer::Gd,
//!     ..FitConfig::default()
//! };
//! let report = model(&x, y.clone(), &cfg, None, None)?;
//! assert_eq!(evaluate(&report.params, &x, &y)?, 100.0);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod bundle;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod loss;
pub(crate) mod matmul;
pub mod metrics;
pub mod optim;
pub mod params;
pub mod pipeline;
pub mod predict;
pub mod preprocess;
pub mod propagate;
pub mod table;
pub mod train;

pub use bundle::ParamBundle;
pub use config::Config;
pub use data::{Dataset, Matrix, Targets};
pub use error::{Error, Result};
pub use metrics::evaluate;
pub use optim::Optimizer;
pub use params::{Init, Params};
pub use predict::{Predictions, predict};
pub use propagate::{Gradients, propagate};
pub use table::Table;
pub use train::{FitConfig, FitReport, model, optimize};
