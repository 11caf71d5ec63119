use thiserror::Error;

/// Errors surfaced by the crate.
///
/// The first four variants form the domain taxonomy; the rest wrap failures of
/// the collaborators (filesystem, CSV, JSON and TOML codecs).
#[derive(Debug, Error)]
pub enum Error {
    /// Empty or degenerate input data.
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// Matrix dimensions disagree between parameters and data.
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    /// A required feature or label column is absent.
    #[error("column missing: {0}")]
    ColumnMissing(String),
    /// Unknown optimizer tag or invalid hyperparameter.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Taxonomy name used when reporting a failure to the user.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidData(_) => "DataError",
            Error::InvalidShape(_) => "ShapeError",
            Error::ColumnMissing(_) => "ColumnMissing",
            Error::InvalidConfig(_) => "ConfigError",
            Error::Io { .. } => "IoError",
            Error::Csv(_) => "CsvError",
            Error::Json(_) => "JsonError",
            Error::Toml(_) => "TomlError",
        }
    }

    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
