use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

use crate::tokenize::Language;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ArrowError,
    },

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("column {column} is not a {expected} column")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    #[error("null value in required column {column} at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("{language} stopwords unavailable at {path}; provision them and re-run")]
    ResourceUnavailable { language: Language, path: PathBuf },

    #[error("cannot derive a newspaper uid from {0}")]
    InvalidFilename(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
