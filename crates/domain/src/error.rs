//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A credential was empty or whitespace only.
    #[error("empty credential: {0}")]
    EmptyCredential(&'static str),

    /// A setting value could not be interpreted.
    #[error("invalid setting {name}: {value}")]
    InvalidSetting {
        /// Setting name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
