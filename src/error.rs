use std::io;
use thiserror::Error;

use crate::dialect::Delimiter;

/// Error type for loading and querying delimited text.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// The source text could not be fetched.
    #[error("Could not fetch source data: {0}")]
    FetchFailed(String),

    /// Fewer than two usable lines remained after filtering.
    #[error("Not enough data: {usable_lines} usable line(s), need at least 2")]
    InsufficientData { usable_lines: usize },

    /// The header line did not split into enough columns.
    #[error("Could not find enough columns with {delimiter} delimiter ({columns} found)")]
    NoHeader { delimiter: Delimiter, columns: usize },

    /// Every candidate dialect produced zero records.
    #[error("No candidate delimiter produced any records")]
    NoViableDialect,

    /// A dialect attempt that cannot become the active table was selected.
    #[error("Dialect attempt {index} cannot be selected")]
    InvalidSelection { index: usize },

    /// IO error while reading a source file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for scout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
