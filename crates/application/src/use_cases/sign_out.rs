//! Sign-out use case.

use std::sync::Arc;

use crate::error::ApplicationResult;
use crate::ports::{CredentialStore, SessionEvent, SessionListener, TerminationReason};

/// Use case for ending the session at the user's request.
pub struct SignOut {
    store: Arc<dyn CredentialStore>,
    listener: Arc<dyn SessionListener>,
}

impl SignOut {
    /// Creates a new `SignOut` use case.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, listener: Arc<dyn SessionListener>) -> Self {
        Self { store, listener }
    }

    /// Deletes all credentials and emits `Terminated { reason: SignedOut }`.
    ///
    /// # Errors
    /// Returns error if the credential store rejects the deletion. No event
    /// is emitted in that case.
    pub async fn execute(&self) -> ApplicationResult<()> {
        self.store.delete_all().await?;
        tracing::info!("Signed out");
        self.listener.notify(SessionEvent::Terminated {
            reason: TerminationReason::SignedOut,
        });
        Ok(())
    }
}
