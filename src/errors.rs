//! Centralized error handling for hydrokit
//!
//! All fallible operations return [`Result`], carrying a [`HydroError`] that
//! names the file, variable, line or flag value involved.

use crate::flags::FlagError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hydrokit operations
#[derive(Error, Debug)]
pub enum HydroError {
    /// NetCDF file operation errors
    #[error("NetCDF error: {0}")]
    NetCDFError(#[from] netcdf::Error),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Array shape or dimension error
    #[error("Array error: {0}")]
    ArrayError(#[from] ndarray::ShapeError),

    /// Variable not found in NetCDF file
    #[error("Variable '{var}' not found in file")]
    VariableNotFound { var: String },

    /// No variable carries the requested `code` attribute
    #[error("Code {code} not found in file")]
    CodeNotFound { code: i64 },

    /// Flag value or position outside the codec's domain
    #[error("Invalid flag operation: {0}")]
    InvalidFlag(#[from] FlagError),

    /// Operand shapes cannot be broadcast together
    #[error("Shape mismatch: cannot broadcast {found:?} to {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Text file contains no data lines
    #[error("Empty file: {}", path.display())]
    EmptyFile { path: PathBuf },

    /// Row has fewer columns than requested and no fill value was given
    #[error("Line {line} has not enough columns to be indexed: needed {needed}, found {found}")]
    ShortRow {
        line: usize,
        needed: usize,
        found: usize,
    },

    /// Table field is not a number
    #[error("Cannot parse '{value}' at row {row}, column {column} as a number")]
    ValueParse {
        row: usize,
        column: usize,
        value: String,
    },

    /// Remote directory listing line could not be interpreted
    #[error("Cannot parse directory listing line '{line}': {reason}")]
    ListingParse { line: String, reason: String },

    /// FTP client failure
    #[error("FTP error: {0}")]
    FtpError(String),

    /// Thread pool configuration error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    /// Generic error
    #[error("{0}")]
    Generic(String),
}

impl From<String> for HydroError {
    fn from(error: String) -> Self {
        HydroError::Generic(error)
    }
}

impl From<&str> for HydroError {
    fn from(error: &str) -> Self {
        HydroError::Generic(error.to_string())
    }
}

/// Result type alias for hydrokit operations
pub type Result<T> = std::result::Result<T, HydroError>;
