use thiserror::Error;

/// Failures raised by loading, filtering, and analysing an emissions table.
///
/// Schema-shape errors (`MissingKey`, `MissingColumn`) are fatal: aggregation assumes
/// full coverage, so nothing downstream tries to work with a partial result.
#[derive(Error, Debug)]
pub enum EmissionsError {
    /// File missing, unparsable, or not shaped like an emissions table.
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// An expected country/region key is absent (dataset drift).
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// An expected year column is absent (insufficient historical coverage).
    #[error("Missing year column: {0}")]
    MissingColumn(String),

    /// Fewer rows than a fixed-size selection requires.
    #[error("Insufficient data: need {needed} rows, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for EmissionsError {
    fn from(err: csv::Error) -> Self {
        EmissionsError::DataAccess(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EmissionsError>;
