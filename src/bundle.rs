//! Parameter bundle persistence.
//!
//! This module defines a versioned, stable on-disk format for a trained model:
//! weights, bias, selected feature names, standardization mean and std, in that
//! order, followed by the ascending category names that give each weight row its
//! meaning.
//!
//! Deserialization validates every shape relation and that all numbers are
//! finite, so a loaded bundle can be handed straight to inference.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::preprocess::Standardizer;
use crate::{Error, Matrix, Params, Result};

pub const BUNDLE_FORMAT_VERSION: u32 = 1;

/// Everything inference needs from a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamBundle {
    pub format_version: u32,
    /// One row per category, one column per feature.
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub features: Vec<String>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub categories: Vec<String>,
}

impl ParamBundle {
    pub fn new(
        params: &Params,
        features: Vec<String>,
        scaler: &Standardizer,
        categories: Vec<String>,
    ) -> Result<Self> {
        let bundle = Self {
            format_version: BUNDLE_FORMAT_VERSION,
            weights: params.weights().to_rows(),
            bias: params.bias().to_vec(),
            features,
            mean: scaler.mean().to_vec(),
            std: scaler.std().to_vec(),
            categories,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<()> {
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported bundle format_version {}; expected {}",
                self.format_version, BUNDLE_FORMAT_VERSION
            )));
        }

        let n_feature = self.features.len();
        let n_category = self.categories.len();
        if n_feature == 0 || n_category == 0 {
            return Err(Error::InvalidShape(format!(
                "bundle needs features and categories, got {n_feature} and {n_category}"
            )));
        }
        if self.weights.len() != n_category || self.bias.len() != n_category {
            return Err(Error::InvalidShape(format!(
                "weights rows {} and bias len {} must equal category count {n_category}",
                self.weights.len(),
                self.bias.len()
            )));
        }
        if let Some((i, row)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != n_feature)
        {
            return Err(Error::InvalidShape(format!(
                "weights row {i} has len {}, expected {n_feature}",
                row.len()
            )));
        }
        if self.mean.len() != n_feature || self.std.len() != n_feature {
            return Err(Error::InvalidShape(format!(
                "mean len {} and std len {} must equal feature count {n_feature}",
                self.mean.len(),
                self.std.len()
            )));
        }
        if self.categories.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidData(
                "categories must be strictly ascending".to_owned(),
            ));
        }

        let numbers = self
            .weights
            .iter()
            .flatten()
            .chain(&self.bias)
            .chain(&self.mean)
            .chain(&self.std);
        for v in numbers {
            if !v.is_finite() {
                return Err(Error::InvalidData(
                    "bundle must contain only finite values".to_owned(),
                ));
            }
        }
        if self.std.iter().any(|&s| s <= 0.0) {
            return Err(Error::InvalidData("std must be > 0".to_owned()));
        }
        Ok(())
    }

    pub fn params(&self) -> Result<Params> {
        Params::from_parts(Matrix::from_rows(&self.weights)?, self.bias.clone())
    }

    pub fn standardizer(&self) -> Result<Standardizer> {
        Standardizer::from_parts(self.mean.clone(), self.std.clone())
    }

    /// Serialize the bundle to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a bundle from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(s)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Save the bundle to a JSON file (pretty-printed).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        let p = path.as_ref();
        std::fs::write(p, s).map_err(|e| Error::io(p, e))
    }

    /// Load a bundle from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p).map_err(|e| Error::io(p, e))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParamBundle {
        ParamBundle {
            format_version: BUNDLE_FORMAT_VERSION,
            weights: vec![vec![0.5, -1.0], vec![2.0, 0.25]],
            bias: vec![0.1, -0.2],
            features: vec!["Flying".to_owned(), "Charms".to_owned()],
            mean: vec![1.0, -2.0],
            std: vec![3.0, 0.5],
            categories: vec!["Gryffindor".to_owned(), "Slytherin".to_owned()],
        }
    }

    #[test]
    fn rejects_unknown_version() {
        let mut b = sample();
        b.format_version = 999;
        let json = serde_json::to_string(&b).unwrap();
        let err = ParamBundle::from_json_str(&json).unwrap_err();
        assert!(format!("{err}").contains("format_version"));
    }

    #[test]
    fn rejects_shape_disagreements() {
        let mut b = sample();
        b.weights[1].pop();
        assert!(matches!(b.validate(), Err(Error::InvalidShape(_))));

        let mut b = sample();
        b.std.push(1.0);
        assert!(matches!(b.validate(), Err(Error::InvalidShape(_))));

        let mut b = sample();
        b.categories.push("Hufflepuff".to_owned());
        assert!(b.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_std_and_unsorted_categories() {
        let mut b = sample();
        b.std[0] = 0.0;
        assert!(b.validate().is_err());

        let mut b = sample();
        b.categories.reverse();
        assert!(b.validate().is_err());
    }

    #[test]
    fn converts_back_to_params_and_scaler() {
        let b = sample();
        let params = b.params().unwrap();
        assert_eq!(params.weights().row(1), &[2.0, 0.25]);
        assert_eq!(b.standardizer().unwrap().std(), &[3.0, 0.5]);
    }
}
