//! Session signal port
//!
//! The application shell listens here to learn that the user must sign in
//! again.

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The server reported `LOGIN_EXPIRED`.
    LoginExpired,
    /// The refresh endpoint refused or failed the exchange.
    RefreshRejected,
    /// No refresh token was available.
    MissingRefreshToken,
    /// The refreshed pair could not be persisted.
    StoreFailure,
    /// The user signed out.
    SignedOut,
}

/// Session lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new credential pair was stored by a refresh.
    Refreshed,
    /// Credentials were deleted; the login screen should be presented.
    Terminated {
        /// Why the session ended.
        reason: TerminationReason,
    },
}

/// Receives session lifecycle events.
pub trait SessionListener: Send + Sync {
    /// Called once per event. Must not block.
    fn notify(&self, event: SessionEvent);
}
