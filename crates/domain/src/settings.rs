//! Client Settings Domain Model
//!
//! Defines how the Forday client reaches the backend and where it keeps
//! credentials.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Where the credential pair is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// OS keychain / secret service (default).
    #[default]
    Keyring,
    /// Process memory only; nothing survives a restart.
    Memory,
}

impl FromStr for CredentialBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            _ => Err(DomainError::InvalidSetting {
                name: "credential_backend",
                value: s.to_string(),
            }),
        }
    }
}

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the REST backend.
    pub base_url: String,
    /// Path of the credential refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// How many times one request may be replayed after an auth failure.
    pub max_auth_retries: u32,
    /// Credential persistence backend.
    pub credential_backend: CredentialBackend,
    /// Keychain service name used by the keyring backend.
    pub keyring_service: String,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            refresh_path: "/auth/refresh".to_string(),
            request_timeout_ms: 30_000,
            max_auth_retries: 1,
            credential_backend: CredentialBackend::default(),
            keyring_service: "app.forday.client".to_string(),
            user_agent: "Forday/0.1.0".to_string(),
        }
    }
}

impl ClientSettings {
    /// Resolves a path against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the base URL or the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> DomainResult<Url> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.base_url)))?;
        // Keep any path prefix on the base URL when joining.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {path}")))
    }

    /// URL of the refresh endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the URL cannot be built.
    pub fn refresh_url(&self) -> DomainResult<Url> {
        self.endpoint(&self.refresh_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.max_auth_retries, 1);
        assert_eq!(settings.credential_backend, CredentialBackend::Keyring);
        assert_eq!(
            settings.refresh_url().unwrap().as_str(),
            "http://localhost:8080/auth/refresh"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let settings = ClientSettings {
            base_url: "https://api.forday.app/v1".to_string(),
            ..ClientSettings::default()
        };
        assert_eq!(
            settings.endpoint("/activities/3").unwrap().as_str(),
            "https://api.forday.app/v1/activities/3"
        );
        assert_eq!(
            settings.endpoint("hobbies").unwrap().as_str(),
            "https://api.forday.app/v1/hobbies"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        assert!(matches!(
            settings.refresh_url(),
            Err(DomainError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ClientSettings =
            serde_json::from_str(r#"{"base_url":"https://api.forday.app","credential_backend":"memory"}"#)
                .unwrap();
        assert_eq!(settings.base_url, "https://api.forday.app");
        assert_eq!(settings.credential_backend, CredentialBackend::Memory);
        assert_eq!(settings.refresh_path, "/auth/refresh");
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Memory".parse::<CredentialBackend>(), Ok(CredentialBackend::Memory));
        assert!("vault".parse::<CredentialBackend>().is_err());
    }
}
