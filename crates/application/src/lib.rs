//! Forday Application - Token refresh coordination, ports and use cases
//!
//! This crate defines the application layer with:
//! - Port traits (credential store, refresh endpoint, HTTP client, session signal)
//! - The single-flight refresh coordinator and the auth interceptor
//! - Use case orchestration
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use auth::{
    AuthInterceptor, FailureAction, RefreshCoordinator, RefreshOutcome, RequestFailure,
    RetryDecision, SessionEvents, classify_failure,
};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    AuthApi, CredentialStore, CredentialStoreError, HttpClient, HttpClientError, RefreshError,
    SessionEvent, SessionListener, TerminationReason,
};
pub use use_cases::{
    SendAuthenticatedRequest, SessionState, SessionStatus, SignIn, SignOut,
};
