//! Refresh endpoint port

use async_trait::async_trait;
use forday_domain::CredentialPair;

/// Errors returned by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    /// The server refused the refresh token.
    #[error("refresh rejected with status {status}")]
    Rejected {
        /// HTTP status of the rejection.
        status: u16,
        /// `errorClassName` from the error envelope, when present.
        error_class: Option<String>,
    },

    /// The refresh call did not complete.
    #[error("refresh request failed: {0}")]
    Transport(String),

    /// The server answered 2xx with an unusable body.
    #[error("invalid refresh response: {0}")]
    InvalidResponse(String),
}

/// Port for the endpoint that exchanges a refresh token for a new pair.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges a refresh token for a new credential pair.
    ///
    /// # Errors
    /// Returns a `RefreshError` if the exchange fails for any reason.
    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError>;
}
