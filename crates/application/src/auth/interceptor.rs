//! Credential attachment and retry decisions.

use std::sync::Arc;

use forday_domain::request::{AUTHORIZATION, RequestSpec};
use forday_domain::response::ResponseSpec;

use super::classify::{FailureAction, classify_failure};
use super::coordinator::{RefreshCoordinator, RefreshOutcome};
use super::decision::{RequestFailure, RetryDecision};
use crate::ports::{CredentialStoreError, TerminationReason};

/// Attaches bearer credentials to outgoing requests and decides whether a
/// failed request should be replayed.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    coordinator: Arc<RefreshCoordinator>,
}

impl AuthInterceptor {
    /// Creates an interceptor backed by the given coordinator.
    #[must_use]
    pub const fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self { coordinator }
    }

    /// The shared refresh coordinator.
    #[must_use]
    pub const fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    /// Sets `Authorization: Bearer <access token>` from the credential store.
    ///
    /// With no stored token the request goes out unauthenticated.
    pub async fn attach_credential(&self, mut request: RequestSpec) -> RequestSpec {
        match self.coordinator.credential_store().load_access_token().await {
            Ok(token) => request.set_bearer(&token),
            Err(e) => {
                if e != CredentialStoreError::NotFound {
                    tracing::warn!(error = %e, request_id = %request.id, "Access token unreadable");
                }
                request.headers.remove(AUTHORIZATION);
            }
        }
        request
    }

    /// Decides what to do with a failed request.
    ///
    /// `response` is `None` when the failure happened before a response
    /// arrived. Only 401 responses ever lead to a refresh, a retry or a
    /// session termination; everything else hands `failure` back unchanged.
    pub async fn handle_failure(
        &self,
        request: &RequestSpec,
        response: Option<&ResponseSpec>,
        failure: RequestFailure,
    ) -> RetryDecision {
        match classify_failure(response) {
            FailureAction::Passthrough => RetryDecision::DoNotRetry(failure),
            FailureAction::TerminateSession => {
                if self.sent_credential(request).await == SentCredential::Gone {
                    return RetryDecision::DoNotRetry(RequestFailure::SessionTerminated);
                }
                tracing::info!(request_id = %request.id, "Login expired");
                self.coordinator
                    .terminate_session(TerminationReason::LoginExpired)
                    .await;
                RetryDecision::DoNotRetry(RequestFailure::SessionTerminated)
            }
            FailureAction::AttemptRefresh => match self.sent_credential(request).await {
                SentCredential::Rotated => {
                    tracing::debug!(request_id = %request.id, "Credential already rotated, retrying");
                    RetryDecision::Retry
                }
                SentCredential::Gone => {
                    tracing::debug!(request_id = %request.id, "Session already terminated");
                    RetryDecision::DoNotRetry(RequestFailure::SessionTerminated)
                }
                SentCredential::Current => {
                    match self.coordinator.refresh(request.bearer_token()).await {
                        RefreshOutcome::Refreshed => RetryDecision::Retry,
                        RefreshOutcome::SessionTerminated => {
                            RetryDecision::DoNotRetry(RequestFailure::SessionTerminated)
                        }
                        RefreshOutcome::Abandoned => {
                            RetryDecision::DoNotRetry(RequestFailure::RefreshAbandoned)
                        }
                    }
                }
            },
        }
    }

    /// Compares the token the request carried with the one in the store.
    async fn sent_credential(&self, request: &RequestSpec) -> SentCredential {
        let Some(sent) = request.bearer_token() else {
            return SentCredential::Current;
        };
        match self.coordinator.credential_store().load_access_token().await {
            Ok(current) if current != sent => SentCredential::Rotated,
            Ok(_) => SentCredential::Current,
            // A signed request with nothing stored: someone already ended the session.
            Err(CredentialStoreError::NotFound) => SentCredential::Gone,
            Err(_) => SentCredential::Current,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SentCredential {
    Current,
    Rotated,
    Gone,
}
