//! Server error envelope.
//!
//! Failed API calls answer with
//! `{"status": 401, "success": false, "data": {"errorClassName": "TOKEN_EXPIRED", "message": "..."}}`.
//! The `errorClassName` drives the refresh policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error envelope returned by the backend on failed calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// HTTP status echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Always false for failures.
    #[serde(default)]
    pub success: bool,
    /// Error details.
    pub data: ErrorData,
}

/// Payload of an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    /// Server-side error classification, e.g. `TOKEN_EXPIRED`.
    pub error_class_name: String,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Parses an envelope from a response body.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body does not have the envelope shape.
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Classification of this error.
    #[must_use]
    pub fn error_class(&self) -> ErrorClass {
        ErrorClass::from_name(&self.data.error_class_name)
    }
}

/// Known values of `errorClassName`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The access token is past its expiry.
    TokenExpired,
    /// The access token failed validation.
    InvalidToken,
    /// The refresh token itself is no longer accepted.
    LoginExpired,
    /// Any other classification.
    Other(String),
}

impl ErrorClass {
    /// Maps a wire name to a classification. Matching ignores ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "TOKEN_EXPIRED" => Self::TokenExpired,
            "INVALID_TOKEN" => Self::InvalidToken,
            "LOGIN_EXPIRED" => Self::LoginExpired,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Wire name of this classification.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::LoginExpired => "LOGIN_EXPIRED",
            Self::Other(name) => name,
        }
    }

    /// Returns true when a credential refresh can recover the request.
    #[must_use]
    pub const fn is_refreshable(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::InvalidToken)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
