//! Error types for loading, filtering, and writing variant tables.
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between reading the input table and writing the output.
#[derive(Error, Debug)]
pub enum SieveError {
    #[error("Input variant table not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Reference variant set not found: {}", path.display())]
    MissingReference { path: PathBuf },

    #[error("Malformed input at {}:{line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("No numeric {column} values in {}", path.display())]
    NoNumericValues { path: PathBuf, column: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, SieveError>;
