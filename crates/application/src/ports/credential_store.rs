//! Credential store port
//!
//! Defines the interface for persisting the access/refresh credential pair.

use async_trait::async_trait;
use forday_domain::CredentialPair;

/// Errors that can occur during credential store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialStoreError {
    /// Nothing is stored.
    #[error("no credentials stored")]
    NotFound,

    /// The backing store could not be reached.
    #[error("credential storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded.
    #[error("stored credentials are corrupt: {0}")]
    Corrupt(String),
}

/// Secure persistence for the credential pair.
///
/// Implementations must replace the pair as one unit: a reader sees either
/// the old pair or the new one, never a mix.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persists a pair, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the pair cannot be written.
    async fn save(&self, pair: &CredentialPair) -> Result<(), CredentialStoreError>;

    /// Loads the current pair.
    ///
    /// # Errors
    /// Returns `CredentialStoreError::NotFound` if nothing is stored.
    async fn load(&self) -> Result<CredentialPair, CredentialStoreError>;

    /// Loads the current access token.
    ///
    /// # Errors
    /// Returns `CredentialStoreError::NotFound` if nothing is stored.
    async fn load_access_token(&self) -> Result<String, CredentialStoreError> {
        Ok(self.load().await?.access_token().to_string())
    }

    /// Loads the current refresh token.
    ///
    /// # Errors
    /// Returns `CredentialStoreError::NotFound` if nothing is stored.
    async fn load_refresh_token(&self) -> Result<String, CredentialStoreError> {
        Ok(self.load().await?.refresh_token().to_string())
    }

    /// Deletes every stored credential. Deleting an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if the backing store rejects the deletion.
    async fn delete_all(&self) -> Result<(), CredentialStoreError>;
}
