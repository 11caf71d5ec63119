//! Preprocessing: imputation, feature selection, standardization and one-hot labels.

use crate::table::{ColumnData, Table};
use crate::{Error, Matrix, Result};

/// Features used by the classifier, in column order.
pub const FEATURES: [&str; 6] = [
    "Ancient Runes",
    "Defense Against the Dark Arts",
    "Herbology",
    "Flying",
    "Divination",
    "Charms",
];

/// Column whose missing cells are backfilled from [`BACKFILL_SOURCE`].
pub const BACKFILL_TARGET: &str = "Defense Against the Dark Arts";
/// Column the backfill reads from.
pub const BACKFILL_SOURCE: &str = "Astronomy";
/// The backfill writes `source * BACKFILL_SCALE`.
///
/// The two scores are almost perfectly anti-correlated in the reference dataset,
/// at a ratio of -1/100.
pub const BACKFILL_SCALE: f64 = -0.01;

/// Selected feature columns, still holding missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumns {
    pub names: Vec<String>,
    pub columns: Vec<Vec<Option<f64>>>,
}

impl FeatureColumns {
    /// Convert to a `(len, n_feature)` matrix; any missing cell is an error.
    pub fn to_matrix(&self) -> Result<Matrix> {
        let len = self.columns.first().map(Vec::len).unwrap_or(0);
        if len == 0 {
            return Err(Error::InvalidData("no records to convert".to_owned()));
        }

        let n_feature = self.columns.len();
        let mut data = vec![0.0; len * n_feature];
        for (j, (name, col)) in self.names.iter().zip(&self.columns).enumerate() {
            if col.iter().all(Option::is_none) {
                return Err(Error::InvalidData(format!("feature {name:?} has no values")));
            }
            for (i, cell) in col.iter().enumerate() {
                data[i * n_feature + j] = cell.ok_or_else(|| {
                    Error::InvalidData(format!("feature {name:?} has a missing value at row {i}"))
                })?;
            }
        }
        Matrix::from_flat(data, n_feature)
    }
}

/// Select the fixed [`FEATURES`].
pub fn select_features(table: &Table) -> Result<FeatureColumns> {
    select_features_named(table, &FEATURES)
}

/// Select the listed numeric columns in the given order.
pub fn select_features_named<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<FeatureColumns> {
    if table.is_empty() {
        return Err(Error::InvalidData("table must not be empty".to_owned()));
    }
    if names.is_empty() {
        return Err(Error::InvalidConfig("feature list must not be empty".to_owned()));
    }

    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        columns.push(table.numeric(name.as_ref())?.to_vec());
    }
    Ok(FeatureColumns {
        names: names.iter().map(|n| n.as_ref().to_owned()).collect(),
        columns,
    })
}

/// Fill missing [`BACKFILL_TARGET`] cells from [`BACKFILL_SOURCE`] on the same row.
///
/// Rows where the source is missing too are left for mean imputation. Tables
/// lacking either column are left unchanged.
pub fn backfill(table: &mut Table) {
    let Ok(source) = table.numeric(BACKFILL_SOURCE).map(<[Option<f64>]>::to_vec) else {
        return;
    };
    let Ok(target) = table.column_mut(BACKFILL_TARGET) else {
        return;
    };
    if let ColumnData::Numeric(cells) = &mut target.data {
        for (cell, src) in cells.iter_mut().zip(source) {
            if cell.is_none() {
                *cell = src.map(|s| s * BACKFILL_SCALE);
            }
        }
    }
}

/// Impute the training table in place.
///
/// Applies [`backfill`], then fills every missing numeric cell with the mean of
/// its column's present cells. Columns with no present cells are left as they are.
pub fn impute(table: &mut Table) -> Result<()> {
    if table.is_empty() {
        return Err(Error::InvalidData("table must not be empty".to_owned()));
    }

    backfill(table);
    for column in table.columns_mut() {
        if let ColumnData::Numeric(cells) = &mut column.data {
            if cells.iter().all(Option::is_some) {
                continue;
            }
            let Some(mean) = present_mean(cells) else {
                continue;
            };
            for cell in cells.iter_mut().filter(|c| c.is_none()) {
                *cell = Some(mean);
            }
        }
    }
    Ok(())
}

/// Impute an inference table using persisted training means.
///
/// Fills missing cells of each listed feature with the matching mean. Other
/// columns are left as they are.
pub fn impute_with<S: AsRef<str>>(table: &mut Table, features: &[S], means: &[f64]) -> Result<()> {
    if table.is_empty() {
        return Err(Error::InvalidData("table must not be empty".to_owned()));
    }
    if features.len() != means.len() {
        return Err(Error::InvalidShape(format!(
            "{} features but {} means",
            features.len(),
            means.len()
        )));
    }

    for (name, &mean) in features.iter().zip(means) {
        let column = table.column_mut(name.as_ref())?;
        match &mut column.data {
            ColumnData::Numeric(cells) => {
                for cell in cells.iter_mut().filter(|c| c.is_none()) {
                    *cell = Some(mean);
                }
            }
            ColumnData::Categorical(_) => {
                return Err(Error::InvalidData(format!(
                    "column {:?} is not numeric",
                    column.name
                )));
            }
        }
    }
    Ok(())
}

fn present_mean(cells: &[Option<f64>]) -> Option<f64> {
    let (sum, n) = cells
        .iter()
        .flatten()
        .fold((0.0_f64, 0_usize), |(s, n), &v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Per-feature z-score transform fitted on the training population.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl Standardizer {
    /// Fit mean and sample standard deviation (`n - 1` denominator) per column.
    pub fn fit(x: &Matrix) -> Result<Self> {
        if x.rows() < 2 {
            return Err(Error::InvalidData(format!(
                "standardization needs at least 2 records, got {}",
                x.rows()
            )));
        }

        let n = x.rows() as f64;
        let mut mean = vec![0.0; x.cols()];
        for i in 0..x.rows() {
            for (m, &v) in mean.iter_mut().zip(x.row(i)) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std = vec![0.0; x.cols()];
        for i in 0..x.rows() {
            for ((s, &v), &m) in std.iter_mut().zip(x.row(i)).zip(&mean) {
                let d = v - m;
                *s += d * d;
            }
        }
        for (j, s) in std.iter_mut().enumerate() {
            *s = (*s / (n - 1.0)).sqrt();
            if !(s.is_finite() && *s > 0.0) {
                return Err(Error::InvalidData(format!(
                    "feature {j} has zero or non-finite standard deviation"
                )));
            }
        }

        Ok(Self { mean, std })
    }

    /// Rebuild from persisted statistics.
    pub fn from_parts(mean: Vec<f64>, std: Vec<f64>) -> Result<Self> {
        if mean.len() != std.len() {
            return Err(Error::InvalidShape(format!(
                "mean has len {} but std has len {}",
                mean.len(),
                std.len()
            )));
        }
        if mean.iter().any(|m| !m.is_finite()) {
            return Err(Error::InvalidData("mean must be finite".to_owned()));
        }
        if std.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(Error::InvalidData("std must be finite and > 0".to_owned()));
        }
        Ok(Self { mean, std })
    }

    #[inline]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    #[inline]
    pub fn std(&self) -> &[f64] {
        &self.std
    }

    /// `(x - mean) / std`, column by column.
    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        self.check(x)?;
        let mut out = x.clone();
        for i in 0..out.rows() {
            for ((v, &m), &s) in out.row_mut(i).iter_mut().zip(&self.mean).zip(&self.std) {
                *v = (*v - m) / s;
            }
        }
        Ok(out)
    }

    /// `x * std + mean`, column by column.
    pub fn inverse_transform(&self, x: &Matrix) -> Result<Matrix> {
        self.check(x)?;
        let mut out = x.clone();
        for i in 0..out.rows() {
            for ((v, &m), &s) in out.row_mut(i).iter_mut().zip(&self.mean).zip(&self.std) {
                *v = *v * s + m;
            }
        }
        Ok(out)
    }

    fn check(&self, x: &Matrix) -> Result<()> {
        if x.cols() != self.mean.len() {
            return Err(Error::InvalidShape(format!(
                "X has {} features, standardizer expects {}",
                x.cols(),
                self.mean.len()
            )));
        }
        Ok(())
    }
}

/// Fit a [`Standardizer`] on `x` and apply it.
pub fn standardize(x: &Matrix) -> Result<(Matrix, Standardizer)> {
    let scaler = Standardizer::fit(x)?;
    let z = scaler.transform(x)?;
    Ok((z, scaler))
}

/// One-hot encode labels against their ascending category set.
///
/// Returns the `(len, n_category)` matrix and the sorted category names; column
/// `k` is the `k`-th name.
pub fn one_hot_encode(labels: &[Option<String>]) -> Result<(Matrix, Vec<String>)> {
    let mut categories: Vec<String> = labels.iter().flatten().cloned().collect();
    categories.sort();
    categories.dedup();
    let y = one_hot_encode_with(labels, &categories)?;
    Ok((y, categories))
}

/// One-hot encode labels against a known category list.
///
/// Categories that never occur get an all-zero column.
pub fn one_hot_encode_with<S: AsRef<str>>(
    labels: &[Option<String>],
    categories: &[S],
) -> Result<Matrix> {
    if labels.is_empty() {
        return Err(Error::InvalidData("labels must not be empty".to_owned()));
    }
    if categories.is_empty() {
        return Err(Error::InvalidData("category list must not be empty".to_owned()));
    }

    let k = categories.len();
    let mut data = vec![0.0; labels.len() * k];
    for (i, label) in labels.iter().enumerate() {
        let label = label
            .as_deref()
            .ok_or_else(|| Error::InvalidData(format!("label missing at row {i}")))?;
        let col = categories
            .iter()
            .position(|c| c.as_ref() == label)
            .ok_or_else(|| Error::InvalidData(format!("unknown category {label:?} at row {i}")))?;
        data[i * k + col] = 1.0;
    }
    Matrix::from_flat(data, k)
}
