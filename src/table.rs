//! Minimal typed table loaded from CSV.
//!
//! Columns are typed on load: a column is numeric when every non-empty cell
//! parses as `f64`, categorical otherwise. Empty cells are missing values.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
    /// Cell text of a numeric column as loaded; not updated by imputation.
    pub text: Option<Vec<Option<String>>>,
}

/// Named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    len: usize,
}

impl Table {
    /// Build from columns, validating that all have the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let len = columns.first().map(|c| c.data.len()).unwrap_or(0);
        for c in &columns {
            if c.data.len() != len {
                return Err(Error::InvalidData(format!(
                    "column {:?} has {} rows, expected {len}",
                    c.name,
                    c.data.len()
                )));
            }
        }
        Ok(Self { columns, len })
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let file = File::open(p).map_err(|e| Error::io(p, e))?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (col, cell) in raw.iter_mut().zip(record.iter()) {
                col.push(cell.trim().to_owned());
            }
        }

        let columns = headers
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| {
                let (data, text) = infer_column(cells);
                Column { name, data, text }
            })
            .collect();
        Self::from_columns(columns)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::ColumnMissing(name.to_owned()))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::ColumnMissing(name.to_owned()))
    }

    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.columns.iter_mut()
    }

    /// Cells of a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(v) => Ok(v),
            ColumnData::Categorical(_) => Err(Error::InvalidData(format!(
                "column {name:?} is not numeric"
            ))),
        }
    }

    /// Cells of a column read as category names.
    ///
    /// Numeric columns yield their source text; columns built without it are
    /// formatted.
    pub fn categories(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self.column(name)?;
        Ok(match (&column.data, &column.text) {
            (ColumnData::Categorical(v), _) => v.clone(),
            (ColumnData::Numeric(_), Some(text)) => text.clone(),
            (ColumnData::Numeric(v), None) => v.iter().map(|c| c.map(|x| x.to_string())).collect(),
        })
    }
}

fn infer_column(cells: Vec<String>) -> (ColumnData, Option<Vec<Option<String>>>) {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                Some(None)
            } else {
                c.parse::<f64>().ok().map(Some)
            }
        })
        .collect();

    let text: Vec<Option<String>> = cells
        .into_iter()
        .map(|c| if c.is_empty() { None } else { Some(c) })
        .collect();
    match parsed {
        Some(values) => (ColumnData::Numeric(values), Some(text)),
        None => (ColumnData::Categorical(text), None),
    }
}
