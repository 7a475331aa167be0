//! Application error types

use forday_domain::DomainError;
use thiserror::Error;

use crate::ports::CredentialStoreError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A credential store operation failed.
    #[error("credential store error: {0}")]
    Credentials(#[from] CredentialStoreError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
