use sea_orm::DbErr;
use thiserror::Error;

/// User blob store errors
///
/// A missing blob is not an error: loading degrades to an empty object.
#[derive(Error, Debug)]
pub enum BlobError {
    /// Request body was not valid JSON
    #[error("Invalid blob document: {0}")]
    Malformed(String),

    /// Request body was JSON but not an object
    #[error("Invalid data format. Expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// Database operation failed
    #[error("Database error: {0}")]
    Persistence(#[from] DbErr),
}

impl BlobError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(self, BlobError::Malformed(_) | BlobError::NotAnObject(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            BlobError::Malformed(_) | BlobError::NotAnObject(_) => "STRUCTURAL_ERROR",
            BlobError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}
