//! Session status use case.

use std::sync::Arc;

use forday_domain::token_preview;

use crate::error::ApplicationResult;
use crate::ports::{CredentialStore, CredentialStoreError};

/// Whether a credential pair is currently stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// A pair is stored.
    SignedIn {
        /// Log-safe preview of the access token.
        access_preview: String,
    },
    /// Nothing is stored.
    SignedOut,
}

/// Use case for reporting the current session state.
pub struct SessionStatus {
    store: Arc<dyn CredentialStore>,
}

impl SessionStatus {
    /// Creates a new `SessionStatus` use case.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Reads the store and reports the session state.
    ///
    /// # Errors
    /// Returns error if the store is unavailable or its contents are corrupt.
    pub async fn execute(&self) -> ApplicationResult<SessionState> {
        match self.store.load().await {
            Ok(pair) => Ok(SessionState::SignedIn {
                access_preview: token_preview(pair.access_token()),
            }),
            Err(CredentialStoreError::NotFound) => Ok(SessionState::SignedOut),
            Err(e) => Err(e.into()),
        }
    }
}
