use std::path::PathBuf;
use thiserror::Error;

/// A measurement row (or the table as a whole) that cannot be turned into a record
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    /// A required or configured column is absent from the header
    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    /// A required cell is empty or not a decimal number
    #[error("row {row}: column '{column}' is not a number: '{value}'")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },

    /// A coordinate outside its valid range
    #[error("row {row}: column '{column}' value {value} is outside [{min}, {max}]")]
    OutOfRange {
        row: usize,
        column: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinity
    #[error("row {row}: column '{column}' is not finite: '{value}'")]
    NotFinite {
        row: usize,
        column: String,
        value: String,
    },

    /// A non-finite value handed to the color scale directly
    #[error("cannot fit a color scale to non-finite value {0}")]
    NonFiniteValue(f64),

    /// The delimited text itself could not be parsed
    #[error("malformed CSV: {0}")]
    Malformed(String),
}

impl DataError {
    /// 1-based data row (header excluded) the error points at, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            DataError::NotNumeric { row, .. }
            | DataError::OutOfRange { row, .. }
            | DataError::NotFinite { row, .. } => Some(*row),
            DataError::MissingColumn { .. }
            | DataError::NonFiniteValue(_)
            | DataError::Malformed(_) => None,
        }
    }
}

/// Errors that abort a coverage map run
#[derive(Debug, Error)]
pub enum CoverageError {
    /// Invalid input data
    #[error(transparent)]
    Data(#[from] DataError),

    /// No measurements to map or scale
    #[error("empty dataset: no measurements to map")]
    EmptyDataset,

    /// Unreadable source or unwritable destination
    #[error("I/O error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unknown palette name, bad hex color or too few anchors
    #[error("palette error: {0}")]
    Palette(String),

    /// Invalid configuration file or option value
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoverageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoverageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Results using CoverageError
pub type Result<T> = std::result::Result<T, CoverageError>;
