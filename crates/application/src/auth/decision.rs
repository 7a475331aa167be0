//! Retry decisions and request failures.

use forday_domain::ErrorClass;
use forday_domain::response::{ResponseSpec, StatusCode};
use thiserror::Error;

use crate::ports::HttpClientError;

/// Why an authenticated request did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// The request was rejected before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No response was received.
    #[error("{0}")]
    Transport(#[from] HttpClientError),

    /// The server answered with an error status.
    #[error("server responded with {status}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// `errorClassName` from the error envelope, when present.
        error_class: Option<ErrorClass>,
        /// Envelope message, when present.
        message: Option<String>,
    },

    /// Credentials were deleted; the user must sign in again.
    #[error("session terminated, sign in again")]
    SessionTerminated,

    /// The refresh this request waited on never completed.
    #[error("credential refresh was abandoned")]
    RefreshAbandoned,
}

impl RequestFailure {
    /// Builds a `Status` failure, reading the error envelope when the body has one.
    #[must_use]
    pub fn from_response(response: &ResponseSpec) -> Self {
        let envelope = response.error_envelope().ok();
        Self::Status {
            status: response.status,
            error_class: envelope.as_ref().map(forday_domain::ErrorEnvelope::error_class),
            message: envelope.and_then(|e| e.data.message),
        }
    }
}

/// Outcome of `AuthInterceptor::handle_failure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-attach the current credential and send again.
    Retry,
    /// Give up with this failure.
    DoNotRetry(RequestFailure),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_from_response_with_envelope() {
        let response = ResponseSpec::new(
            403,
            HashMap::new(),
            br#"{"status":403,"success":false,"data":{"errorClassName":"NOT_OWNER","message":"not yours"}}"#.to_vec(),
            Duration::ZERO,
        );
        assert_eq!(
            RequestFailure::from_response(&response),
            RequestFailure::Status {
                status: StatusCode::new(403),
                error_class: Some(ErrorClass::Other("NOT_OWNER".to_string())),
                message: Some("not yours".to_string()),
            }
        );
    }

    #[test]
    fn test_from_response_without_envelope() {
        let response = ResponseSpec::new(502, HashMap::new(), b"bad gateway".to_vec(), Duration::ZERO);
        let failure = RequestFailure::from_response(&response);
        assert_eq!(
            failure,
            RequestFailure::Status {
                status: StatusCode::new(502),
                error_class: None,
                message: None,
            }
        );
        assert_eq!(failure.to_string(), "server responded with 502 Bad Gateway");
    }
}
