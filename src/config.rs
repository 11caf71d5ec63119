//! Run configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) trains with the
//! reference hyperparameters.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, FitConfig, Init, Optimizer, Result};

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub training: TrainingConfig,
    pub paths: PathsConfig,
    pub compare: CompareConfig,
}

/// Hyperparameters of a training run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Categorical target column.
    pub label_column: String,
    /// `"GD"`, `"BGD"` or `"SGD"`.
    pub optimizer: String,
    pub epochs: usize,
    /// Mini-batch size used by `BGD`.
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Log progress every `print_cost` epochs; `0` disables it.
    pub print_cost: usize,
    /// Reuse the feature list of an existing bundle at `paths.bundle`.
    pub reuse_features: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            label_column: "Hogwarts House".to_owned(),
            optimizer: "GD".to_owned(),
            epochs: 10_000,
            batch_size: 32,
            learning_rate: 0.005,
            print_cost: 0,
            reuse_features: true,
        }
    }
}

impl TrainingConfig {
    pub fn fit_config(&self) -> Result<FitConfig> {
        let cfg = FitConfig {
            epochs: self.epochs,
            lr: self.learning_rate,
            optimizer: Optimizer::from_tag(&self.optimizer, self.batch_size)?,
            init: Init::Zeros,
            print_cost: self.print_cost,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub bundle: PathBuf,
    pub predictions: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bundle: PathBuf::from(".param.json"),
            predictions: PathBuf::from("houses.csv"),
        }
    }
}

/// Held-out comparison of the three optimizers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    pub seed: u64,
    /// Records used for training; the rest are the test set.
    pub train_len: usize,
    pub gd_epochs: usize,
    pub bgd_epochs: usize,
    pub sgd_epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            train_len: 1400,
            gd_epochs: 8000,
            bgd_epochs: 1500,
            sgd_epochs: 25,
            batch_size: 32,
            learning_rate: 0.005,
        }
    }
}

impl CompareConfig {
    /// One fit configuration per optimizer, in `GD`, `BGD`, `SGD` order.
    pub fn fit_configs(&self) -> Result<Vec<FitConfig>> {
        let runs = [
            (Optimizer::Gd, self.gd_epochs),
            (
                Optimizer::Bgd {
                    batch_size: self.batch_size,
                },
                self.bgd_epochs,
            ),
            (Optimizer::Sgd, self.sgd_epochs),
        ];
        runs.into_iter()
            .map(|(optimizer, epochs)| {
                let cfg = FitConfig {
                    epochs,
                    lr: self.learning_rate,
                    optimizer,
                    init: Init::Zeros,
                    print_cost: 0,
                };
                cfg.validate().map(|()| cfg)
            })
            .collect()
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let content = std::fs::read_to_string(p).map_err(|e| Error::io(p, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_reference_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());

        let fit = cfg.training.fit_config().unwrap();
        assert_eq!(fit.epochs, 10_000);
        assert_eq!(fit.optimizer, Optimizer::Gd);
        assert_eq!(fit.lr, 0.005);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = Config::from_toml_str(
            r#"
            [training]
            optimizer = "BGD"
            batch_size = 50
            epochs = 2000

            [paths]
            bundle = "model.json"
            "#,
        )
        .unwrap();
        let fit = cfg.training.fit_config().unwrap();
        assert_eq!(fit.optimizer, Optimizer::Bgd { batch_size: 50 });
        assert_eq!(fit.epochs, 2000);
        assert_eq!(cfg.paths.bundle, PathBuf::from("model.json"));
        assert_eq!(cfg.paths.predictions, PathBuf::from("houses.csv"));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let cfg = Config::from_toml_str("[training]\noptimizer = \"Adam\"\n").unwrap();
        assert!(matches!(
            cfg.training.fit_config(),
            Err(Error::InvalidConfig(_))
        ));

        let cfg = Config::from_toml_str("[training]\nlearning_rate = 0.0\n").unwrap();
        assert!(matches!(
            cfg.training.fit_config(),
            Err(Error::InvalidConfig(_))
        ));

        assert!(matches!(
            Config::from_toml_str("[training]\nepochz = 3\n"),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn compare_builds_one_run_per_optimizer() {
        let runs = CompareConfig::default().fit_configs().unwrap();
        let tags: Vec<_> = runs.iter().map(|r| r.optimizer.tag()).collect();
        assert_eq!(tags, vec!["GD", "BGD", "SGD"]);
        assert_eq!(runs[2].epochs, 25);
    }
}
