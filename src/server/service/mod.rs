pub mod config;
pub mod password;
pub mod users;

use thiserror::Error;

use crate::types::response::FieldErrors;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("resource not found")]
    NotFound,

    /// The input was well formed but the request cannot be honoured.
    #[error("{0}")]
    Rejected(String),

    #[error("database error: {0:#}")]
    Database(anyhow::Error),
}

/// Errors raised inside a transaction closure travel as `anyhow::Error`;
/// a `ServiceError` among them is recovered, anything else is a database
/// failure.
impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ServiceError>() {
            Ok(err) => err,
            Err(err) => ServiceError::Database(err),
        }
    }
}

/// Route ids that do not parse are treated like unknown ids.
pub fn parse_id(id: &str) -> ServiceResult<u64> {
    id.parse().map_err(|_| ServiceError::NotFound)
}
