//! Table-level entry points: training, inference and optimizer comparison.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::info;

use crate::bundle::ParamBundle;
use crate::preprocess::{
    Standardizer, impute, impute_with, one_hot_encode, select_features, select_features_named,
    standardize,
};
use crate::table::Table;
use crate::{Dataset, Error, FitConfig, Result, evaluate, model, predict};

/// Result of [`train_table`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutcome {
    pub bundle: ParamBundle,
    pub costs: Vec<f64>,
}

/// Preprocessed training data ready for the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub dataset: Dataset,
    pub features: Vec<String>,
    pub scaler: Standardizer,
    pub categories: Vec<String>,
}

/// Impute, select, standardize and one-hot encode a training table.
///
/// `features` overrides the fixed feature list, e.g. with the list persisted by
/// an earlier run.
pub fn prepare(mut table: Table, label_column: &str, features: Option<&[String]>) -> Result<Prepared> {
    if table.is_empty() {
        return Err(Error::InvalidData("training table must not be empty".to_owned()));
    }
    let labels = table.categories(label_column)?;

    impute(&mut table)?;
    let selected = match features {
        Some(names) => select_features_named(&table, names)?,
        None => select_features(&table)?,
    };
    let (x, scaler) = standardize(&selected.to_matrix()?)?;
    let (y, categories) = one_hot_encode(&labels)?;

    Ok(Prepared {
        dataset: Dataset::new(x, y)?,
        features: selected.names,
        scaler,
        categories,
    })
}

/// Train on a raw table and assemble the parameter bundle.
///
/// When `previous` is given, its feature list is reused instead of the fixed one.
pub fn train_table(
    table: Table,
    label_column: &str,
    cfg: &FitConfig,
    previous: Option<&ParamBundle>,
) -> Result<TrainOutcome> {
    let prepared = prepare(table, label_column, previous.map(|b| b.features.as_slice()))?;
    info!(
        records = prepared.dataset.len(),
        features = ?prepared.features,
        categories = ?prepared.categories,
        "prepared training data"
    );

    let report = model(
        prepared.dataset.features(),
        prepared.dataset.labels().clone(),
        cfg,
        None,
        None,
    )?;
    let bundle = ParamBundle::new(
        &report.params,
        prepared.features,
        &prepared.scaler,
        prepared.categories,
    )?;

    Ok(TrainOutcome {
        bundle,
        costs: report.costs,
    })
}

/// One predicted record: zero-based row index and category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HousePrediction {
    pub index: usize,
    pub category: String,
}

/// Predict the category of every row of a raw table.
///
/// Missing cells are filled with the persisted training means and features are
/// standardized with the persisted statistics; nothing is refitted.
pub fn predict_table(mut table: Table, bundle: &ParamBundle) -> Result<Vec<HousePrediction>> {
    bundle.validate()?;
    impute_with(&mut table, &bundle.features, &bundle.mean)?;

    let selected = select_features_named(&table, &bundle.features)?;
    let x = bundle.standardizer()?.transform(&selected.to_matrix()?)?;
    let pred = predict(&bundle.params()?, &x)?;

    let out = if pred.cols() == 1 {
        // Only one category was seen in training.
        (0..pred.rows())
            .map(|i| HousePrediction {
                index: i,
                category: bundle.categories[0].clone(),
            })
            .collect()
    } else {
        pred.class_indices()
            .into_iter()
            .enumerate()
            .map(|(index, k)| HousePrediction {
                index,
                category: bundle.categories[k].clone(),
            })
            .collect()
    };
    Ok(out)
}

/// Write predictions as CSV with header `Index,<label_column>`.
pub fn write_predictions<W: Write>(
    writer: W,
    label_column: &str,
    predictions: &[HousePrediction],
) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["Index", label_column])?;
    for p in predictions {
        w.write_record([p.index.to_string().as_str(), p.category.as_str()])?;
    }
    w.flush().map_err(|e| Error::io("<predictions>", e))?;
    Ok(())
}

/// Write predictions to a CSV file.
pub fn save_predictions<P: AsRef<Path>>(
    path: P,
    label_column: &str,
    predictions: &[HousePrediction],
) -> Result<()> {
    let p = path.as_ref();
    let file = std::fs::File::create(p).map_err(|e| Error::io(p, e))?;
    write_predictions(file, label_column, predictions)
}

/// Held-out score of one optimizer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareResult {
    pub config: FitConfig,
    pub accuracy: f64,
    pub final_cost: f64,
    pub elapsed: Duration,
}

/// Train each configuration on the same seeded shuffle and score it on the rest.
pub fn compare_optimizers(
    table: Table,
    label_column: &str,
    configs: &[FitConfig],
    train_len: usize,
    seed: u64,
) -> Result<Vec<CompareResult>> {
    let prepared = prepare(table, label_column, None)?;
    let (train, test) = prepared.dataset.shuffle_split(train_len, seed)?;

    configs
        .iter()
        .map(|cfg| {
            let start = Instant::now();
            let report = model(train.features(), train.labels().clone(), cfg, None, None)?;
            let elapsed = start.elapsed();
            let accuracy = evaluate(&report.params, test.features(), test.labels())?;
            info!(optimizer = %cfg.optimizer, accuracy, ?elapsed, "held-out score");
            Ok(CompareResult {
                config: *cfg,
                accuracy,
                final_cost: report.final_cost(),
                elapsed,
            })
        })
        .collect()
}
