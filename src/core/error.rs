//! Error types for Chromeval
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Chromeval operations
#[derive(Debug, Error)]
pub enum ChromevalError {
    /// Tabular record parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Contact matrix errors
    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while parsing BEDPE/BED/peak records
#[derive(Debug, Error)]
pub enum ParseError {
    /// Record has too few columns or a malformed field
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    /// Failed to parse a coordinate field
    #[error("Failed to parse integer '{value}' at line {line}: {message}")]
    ParseInt {
        line: usize,
        value: String,
        message: String,
    },

    /// File not found
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported compression format
    #[error("Unsupported compression format: {0}")]
    UnsupportedCompression(String),

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while reading or assembling contact matrices
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Malformed .npy header or payload
    #[error("Invalid .npy file: {message}")]
    InvalidNpy { message: String },

    /// .npy dtype other than little-endian f4/f8
    #[error("Unsupported .npy dtype: {0}")]
    UnsupportedDtype(String),

    /// Array shape does not match what the pipeline expects
    #[error("Unexpected array shape: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Matrix too small to crop along the diagonal band
    #[error("HiC matrix size wrong: {rows} rows, diagonal band needs more than {band}")]
    MatrixTooSmall { rows: usize, band: usize },

    /// Chromosome missing from the sizes file
    #[error("Chromosome not found in sizes file: {0}")]
    ChromosomeNotFound(String),

    /// Malformed chromosome sizes line
    #[error("Invalid sizes record at line {line}: {message}")]
    InvalidSizes { line: usize, message: String },

    /// Malformed contact list line
    #[error("Invalid contact record at line {line}: {message}")]
    InvalidContact { line: usize, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Chromeval operations
pub type Result<T> = std::result::Result<T, ChromevalError>;

/// Result type alias for record parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for matrix operations
pub type MatrixResult<T> = std::result::Result<T, MatrixError>;
