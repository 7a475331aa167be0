//! Sign-in use case.

use std::sync::Arc;

use forday_domain::{CredentialPair, token_preview};

use crate::error::ApplicationResult;
use crate::ports::CredentialStore;

/// Input for storing the credentials issued at login.
#[derive(Debug, Clone)]
pub struct SignInInput {
    /// Access token issued by the login endpoint.
    pub access_token: String,
    /// Refresh token issued by the login endpoint.
    pub refresh_token: String,
}

/// Use case for starting a session from a freshly issued pair.
pub struct SignIn {
    store: Arc<dyn CredentialStore>,
}

impl SignIn {
    /// Creates a new `SignIn` use case.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Validates and saves the pair, replacing any previous session.
    ///
    /// # Errors
    /// - Returns error if either token is blank
    /// - Returns error if the credential store rejects the write
    pub async fn execute(&self, input: SignInInput) -> ApplicationResult<CredentialPair> {
        let pair = CredentialPair::new(input.access_token, input.refresh_token)?;
        self.store.save(&pair).await?;
        tracing::info!(access = %token_preview(pair.access_token()), "Signed in");
        Ok(pair)
    }
}
