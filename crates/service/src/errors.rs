use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// The three failure kinds a caller has to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Internal,
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Opaque validation failure; violation detail stays in the logs.
    pub fn validation_failed() -> Self { Self::Validation("request validation failed".into()) }

    pub fn internal(err: impl std::fmt::Display) -> Self { Self::Internal(err.to_string()) }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Internal(_) | ServiceError::Model(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status a transport adapter should answer with.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 422,
            ErrorKind::Internal => 500,
        }
    }
}
