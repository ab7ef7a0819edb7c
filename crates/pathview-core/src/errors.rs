use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading session tables, extracting series or building paths
#[derive(Debug, Error)]
pub enum PathviewError {
    #[error("Failed to read session directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse session file {path}: {source}")]
    TableRead { path: PathBuf, source: csv::Error },

    #[error("Session file {file} malformed at line {line}: {message}")]
    TableFormat {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Session {table}: none of Time, time or t in columns {available:?}")]
    MissingTimeColumn {
        table: String,
        available: Vec<String>,
    },

    #[error("Session {table}: missing column '{column}' (available: {available:?})")]
    MissingColumn {
        table: String,
        column: String,
        available: Vec<String>,
    },

    #[error("Session {table}: invalid number '{value}' in column '{column}' at row {row}")]
    InvalidNumber {
        table: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Session {table}: time decreases at row {row}")]
    NonMonotonicTime { table: String, row: usize },

    #[error("Unrecognized session variable '{0}' (expected one of nav, pos, dir, f)")]
    UnrecognizedVariable(String),

    #[error("Unsupported path dimensionality: {columns} columns (expected 3 or 4)")]
    UnsupportedDimensionality { columns: usize },

    #[error("Cannot draw a 3D path on a planar surface")]
    PlanarSurface,

    #[error("Direction series has {direction} samples but path has {position}")]
    SeriesLengthMismatch { position: usize, direction: usize },

    #[error("Direction series has {direction} columns but path has {position}")]
    DimensionMismatch { position: usize, direction: usize },
}

pub type Result<T> = std::result::Result<T, PathviewError>;
