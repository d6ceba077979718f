use thiserror::Error;

/// Failures reading, parsing or publishing catalogue data.
///
/// Row numbers are 1-based data rows (the header is not counted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    #[error("catalogue could not be read: {0}")]
    Read(String),

    #[error("catalogue could not be written: {0}")]
    Write(String),

    #[error("catalogue has no '{0}' column")]
    MissingColumn(String),

    #[error("row {row}: price '{raw}' is not a positive integer")]
    InvalidPrice { row: usize, raw: String },

    #[error("row {row}: feature profile does not parse: {reason}")]
    InvalidFeatures { row: usize, reason: String },

    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

impl CatalogueError {
    /// Row the error belongs to, for row-level failures.
    pub fn row(&self) -> Option<usize> {
        match self {
            CatalogueError::InvalidPrice { row, .. }
            | CatalogueError::InvalidFeatures { row, .. }
            | CatalogueError::MalformedRow { row, .. } => Some(*row),
            _ => None,
        }
    }
}
