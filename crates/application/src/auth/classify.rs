//! Classification of failed responses.

use forday_domain::ErrorClass;
use forday_domain::response::ResponseSpec;

/// What the interceptor should do with a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Hand the original failure back to the caller.
    Passthrough,
    /// Refresh the credential pair, then replay the request.
    AttemptRefresh,
    /// Delete credentials and end the session.
    TerminateSession,
}

/// Decides how to react to a failed request.
///
/// Only 401 responses are considered. A 401 whose body is not the error
/// envelope is treated as an expired token.
#[must_use]
pub fn classify_failure(response: Option<&ResponseSpec>) -> FailureAction {
    let Some(response) = response else {
        return FailureAction::Passthrough;
    };
    if !response.is_unauthorized() {
        return FailureAction::Passthrough;
    }

    match response.error_envelope() {
        Err(_) => FailureAction::AttemptRefresh,
        Ok(envelope) => match envelope.error_class() {
            class if class.is_refreshable() => FailureAction::AttemptRefresh,
            ErrorClass::LoginExpired => FailureAction::TerminateSession,
            _ => FailureAction::Passthrough,
        },
    }
}
