//! Access/refresh credential pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// The bearer credential plus the long-lived token used to mint a new one.
///
/// Both halves always travel together: stores persist and replace the pair
/// as one unit so a reader never observes an access token from one
/// generation next to a refresh token from another.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCredentialPair")]
pub struct CredentialPair {
    access_token: String,
    refresh_token: String,
}

/// Unvalidated wire shape; deserialization goes through `CredentialPair::new`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredentialPair {
    access_token: String,
    refresh_token: String,
}

impl TryFrom<RawCredentialPair> for CredentialPair {
    type Error = DomainError;

    fn try_from(raw: RawCredentialPair) -> Result<Self, Self::Error> {
        Self::new(raw.access_token, raw.refresh_token)
    }
}

impl CredentialPair {
    /// Creates a pair after trimming both tokens.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyCredential` if either token is blank.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> DomainResult<Self> {
        let access_token = access_token.into().trim().to_string();
        let refresh_token = refresh_token.into().trim().to_string();

        if access_token.is_empty() {
            return Err(DomainError::EmptyCredential("access token"));
        }
        if refresh_token.is_empty() {
            return Err(DomainError::EmptyCredential("refresh token"));
        }

        Ok(Self {
            access_token,
            refresh_token,
        })
    }

    /// Short-lived bearer credential.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Long-lived credential exchanged for a new pair.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &token_preview(&self.access_token))
            .field("refresh_token", &token_preview(&self.refresh_token))
            .finish()
    }
}

/// Returns a log-safe preview of a token (first 8 chars + ...).
///
/// Tokens of 12 characters or fewer are fully masked.
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.chars().count() > 12 {
        let head: String = token.chars().take(8).collect();
        format!("{head}...")
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_trims_tokens() {
        let pair = CredentialPair::new("  access  ", "\trefresh\n").unwrap();
        assert_eq!(pair.access_token(), "access");
        assert_eq!(pair.refresh_token(), "refresh");
    }

    #[test]
    fn test_new_rejects_blank_tokens() {
        assert_eq!(
            CredentialPair::new(" ", "refresh"),
            Err(DomainError::EmptyCredential("access token"))
        );
        assert_eq!(
            CredentialPair::new("access", ""),
            Err(DomainError::EmptyCredential("refresh token"))
        );
    }

    #[test]
    fn test_debug_does_not_leak_tokens() {
        let pair = CredentialPair::new("eyJhbGciOiJIUzI1NiJ9.secret", "short").unwrap();
        let debug = format!("{pair:?}");
        assert!(debug.contains("eyJhbGci..."));
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("short"));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let pair: CredentialPair =
            serde_json::from_str(r#"{"accessToken":"A2","refreshToken":"R2"}"#).unwrap();
        assert_eq!(pair.access_token(), "A2");
        assert_eq!(pair.refresh_token(), "R2");
        assert_eq!(
            serde_json::to_string(&pair).unwrap(),
            r#"{"accessToken":"A2","refreshToken":"R2"}"#
        );
    }

    #[test]
    fn test_deserialize_validates_tokens() {
        let pair: CredentialPair =
            serde_json::from_str(r#"{"accessToken":" A2 ","refreshToken":"R2"}"#).unwrap();
        assert_eq!(pair.access_token(), "A2");

        let blank = serde_json::from_str::<CredentialPair>(r#"{"accessToken":"A2","refreshToken":"  "}"#);
        let message = blank.unwrap_err().to_string();
        assert!(message.contains("empty credential: refresh token"), "{message}");
    }
}
