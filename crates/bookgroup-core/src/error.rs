use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Vector dimension mismatch at item {index}: expected {expected}, found {found}")]
    DimensionMismatch { index: usize, expected: usize, found: usize },

    #[error("Vector source '{name}' failed: {message}")]
    VectorSource { name: String, message: String },

    #[error("Theme extraction failed: {0}")]
    ThemeExtraction(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Input-shape violations: the only failures that abort a grouping run.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::DimensionMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
