/// Library-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data consistency error: {0}")]
    DataConsistency(String),

    #[error("Catalog provider error: {0}")]
    Catalog(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error was caused by the caller's input rather than the catalog
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::NotFound(_) | AppError::InvalidInput(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
