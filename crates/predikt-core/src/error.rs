use thiserror::Error;

/// Error type shared by every predikt library crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PrediktError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Index out of bounds: index {index} for axis {axis} with size {size}")]
    IndexOutOfBounds {
        index: usize,
        axis: usize,
        size: usize,
    },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Singular matrix: cannot invert or decompose")]
    SingularMatrix,

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("{0} is not fitted yet")]
    NotFitted(&'static str),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Column '{column}' must be {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    #[error("Found unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("y contains previously unseen labels: '{0}'")]
    UnseenLabel(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Embedding model error: {0}")]
    Embedding(String),
}

impl PrediktError {
    /// True when the error was caused by the shape or type of the input
    /// rather than by the fitted object itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PrediktError::ColumnType { .. } | PrediktError::MissingColumn(_)
        )
    }
}

impl From<std::io::Error> for PrediktError {
    fn from(err: std::io::Error) -> Self {
        PrediktError::Io(err.to_string())
    }
}

pub type PrediktResult<T> = Result<T, PrediktError>;
