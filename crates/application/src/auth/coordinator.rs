//! Single-flight credential refresh.
//!
//! Any number of requests may fail authentication at the same time. The first
//! one to reach [`RefreshCoordinator::refresh`] becomes the refresher and calls
//! the refresh endpoint; everyone arriving while that call is outstanding is
//! parked on a one-shot channel and resolved with the same outcome, in arrival
//! order, before the refresher itself returns.

use std::collections::VecDeque;
use std::sync::Arc;

use forday_domain::token_preview;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::ports::{
    AuthApi, CredentialStore, CredentialStoreError, SessionEvent, SessionListener,
    TerminationReason,
};

/// Result of one refresh cycle, as seen by every participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new pair is in the store; replay the request.
    Refreshed,
    /// The refresh failed and the credentials were deleted.
    SessionTerminated,
    /// The refresher was dropped before finishing. Credentials are untouched.
    Abandoned,
}

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    pending: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Owns the refresh-in-flight flag and the pending retry queue.
pub struct RefreshCoordinator {
    store: Arc<dyn CredentialStore>,
    auth_api: Arc<dyn AuthApi>,
    listener: Arc<dyn SessionListener>,
    state: Mutex<RefreshState>,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RefreshCoordinator")
            .field("in_flight", &state.in_flight)
            .field("pending", &state.pending.len())
            .finish_non_exhaustive()
    }
}

impl RefreshCoordinator {
    /// Creates a coordinator with an idle state.
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        auth_api: Arc<dyn AuthApi>,
        listener: Arc<dyn SessionListener>,
    ) -> Self {
        Self {
            store,
            auth_api,
            listener,
            state: Mutex::new(RefreshState::default()),
        }
    }

    /// The credential store this coordinator writes to.
    #[must_use]
    pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Returns true while a refresh call is outstanding.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Number of callers parked behind the current refresh.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Refreshes the credential pair, or joins the refresh already running.
    ///
    /// `sent_access_token` is the token the failed request carried. The
    /// refresher compares it with the store before calling the endpoint: a
    /// different stored token means another refresh already rotated the pair,
    /// and an empty store means the session was terminated in the meantime.
    /// Neither case touches the network or emits a second signal.
    ///
    /// At most one call to the refresh endpoint is outstanding at any time.
    pub async fn refresh(&self, sent_access_token: Option<&str>) -> RefreshOutcome {
        let waiter = {
            let mut state = self.state.lock();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.pending.push_back(tx);
                tracing::debug!(position = state.pending.len(), "Refresh in flight, queued");
                Some(rx)
            } else {
                state.in_flight = true;
                None
            }
        };

        if let Some(rx) = waiter {
            return rx.await.unwrap_or(RefreshOutcome::Abandoned);
        }

        let mut guard = InFlightGuard {
            state: &self.state,
            outcome: RefreshOutcome::Abandoned,
        };
        let outcome = self.perform_refresh(sent_access_token).await;
        guard.outcome = outcome;
        drop(guard);
        outcome
    }

    /// Deletes all credentials and emits the termination signal.
    ///
    /// A failed deletion is logged; the signal is emitted regardless.
    pub async fn terminate_session(&self, reason: TerminationReason) {
        if let Err(e) = self.store.delete_all().await {
            tracing::error!(error = %e, "Failed to delete credentials");
        }
        tracing::info!(?reason, "Session terminated");
        self.listener.notify(SessionEvent::Terminated { reason });
    }

    async fn perform_refresh(&self, sent_access_token: Option<&str>) -> RefreshOutcome {
        let current = match self.store.load().await {
            Ok(pair) => pair,
            Err(CredentialStoreError::NotFound) if sent_access_token.is_some() => {
                tracing::debug!("Session already terminated, not refreshing");
                return RefreshOutcome::SessionTerminated;
            }
            Err(e) => {
                if e != CredentialStoreError::NotFound {
                    tracing::warn!(error = %e, "Refresh token unreadable");
                }
                self.terminate_session(TerminationReason::MissingRefreshToken)
                    .await;
                return RefreshOutcome::SessionTerminated;
            }
        };

        if let Some(sent) = sent_access_token
            && sent != current.access_token()
        {
            tracing::debug!(sent = %token_preview(sent), "Credential already rotated, not refreshing");
            return RefreshOutcome::Refreshed;
        }

        let refresh_token = current.refresh_token();
        tracing::info!(refresh = %token_preview(refresh_token), "Refreshing credentials");
        let pair = match self.auth_api.refresh(refresh_token).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "Refresh failed");
                self.terminate_session(TerminationReason::RefreshRejected)
                    .await;
                return RefreshOutcome::SessionTerminated;
            }
        };

        if let Err(e) = self.store.save(&pair).await {
            tracing::error!(error = %e, "Failed to persist refreshed credentials");
            self.terminate_session(TerminationReason::StoreFailure).await;
            return RefreshOutcome::SessionTerminated;
        }

        tracing::info!(access = %token_preview(pair.access_token()), "Credentials refreshed");
        self.listener.notify(SessionEvent::Refreshed);
        RefreshOutcome::Refreshed
    }
}

/// Clears the in-flight flag and resolves every waiter when dropped.
///
/// The outcome defaults to `Abandoned` so a refresher cancelled mid-call
/// still releases its queue.
struct InFlightGuard<'a> {
    state: &'a Mutex<RefreshState>,
    outcome: RefreshOutcome,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let pending = {
            let mut state = self.state.lock();
            state.in_flight = false;
            std::mem::take(&mut state.pending)
        };
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), outcome = ?self.outcome, "Resolving queued requests");
        }
        for waiter in pending {
            // Receiver gone means the waiting request was cancelled.
            let _ = waiter.send(self.outcome);
        }
    }
}
