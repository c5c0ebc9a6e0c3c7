use std::path::PathBuf;

use thiserror::Error;

use crate::selection::RangeError;

/// Errors raised while viewing or mutating a database file.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open {} as a SQLite database: {source}", path.display())]
    InvalidDatabase {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("no table selected")]
    NoTableSelected,

    #[error("table \"{0}\" is WITHOUT ROWID; its rows cannot be addressed individually")]
    NoRowId(String),

    #[error("row {index} is not in the current view (1-{len})")]
    RowOutOfRange { index: usize, len: usize },

    #[error("row {0} is already being edited")]
    EditInProgress(usize),

    #[error("no row is being edited")]
    NotEditing,

    #[error("expected {expected} values, got {actual}")]
    ValueCount { expected: usize, actual: usize },

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
