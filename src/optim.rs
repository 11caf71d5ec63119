//! Optimizer configurations.
//!
//! All three optimizers are the same gradient-descent loop (see [`crate::train`])
//! and differ only in how many records each update sees:
//!
//! - `GD`: the whole training set, one update per epoch
//! - `BGD`: fixed-size contiguous mini-batches
//! - `SGD`: one record per update

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Default mini-batch size for `BGD`.
pub const DEFAULT_BATCH_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Optimizer choice for training.
pub enum Optimizer {
    /// Full-batch gradient descent.
    Gd,
    /// Mini-batch gradient descent.
    Bgd { batch_size: usize },
    /// Single-sample gradient descent.
    Sgd,
}

impl Default for Optimizer {
    fn default() -> Self {
        Optimizer::Bgd {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Optimizer {
    /// Build from a tag (`"GD"`, `"BGD"`, `"SGD"`) and the mini-batch size used by `BGD`.
    pub fn from_tag(tag: &str, batch_size: usize) -> Result<Self> {
        let opt = match tag {
            "GD" => Optimizer::Gd,
            "BGD" => Optimizer::Bgd { batch_size },
            "SGD" => Optimizer::Sgd,
            other => {
                return Err(Error::InvalidConfig(format!(
                    "invalid optimizer {other:?}; expected one of GD, BGD, SGD"
                )));
            }
        };
        opt.validate()?;
        Ok(opt)
    }

    pub fn validate(self) -> Result<()> {
        if let Optimizer::Bgd { batch_size: 0 } = self {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        Ok(())
    }

    /// Records per update for a training set of `n_records`.
    #[inline]
    pub fn batch_size(self, n_records: usize) -> usize {
        match self {
            Optimizer::Gd => n_records,
            Optimizer::Bgd { batch_size } => batch_size,
            Optimizer::Sgd => 1,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Optimizer::Gd => "GD",
            Optimizer::Bgd { .. } => "BGD",
            Optimizer::Sgd => "SGD",
        }
    }
}

impl FromStr for Optimizer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Optimizer::from_tag(s, DEFAULT_BATCH_SIZE)
    }
}

impl fmt::Display for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optimizer::Bgd { batch_size } => write!(f, "BGD(batch={batch_size})"),
            other => f.write_str(other.tag()),
        }
    }
}
