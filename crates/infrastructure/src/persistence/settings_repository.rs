//! Client settings persistence.
//!
//! Settings live in the platform-specific config directory:
//! - Linux: ~/.config/forday/client.json
//! - macOS: ~/Library/Application Support/forday/client.json
//! - Windows: %APPDATA%/forday/client.json
//!
//! `FORDAY_*` environment variables override file values.

use std::path::{Path, PathBuf};

use forday_domain::{ClientSettings, DomainError};
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable};

/// Environment variable overriding `base_url`.
pub const ENV_BASE_URL: &str = "FORDAY_BASE_URL";
/// Environment variable overriding `refresh_path`.
pub const ENV_REFRESH_PATH: &str = "FORDAY_REFRESH_PATH";
/// Environment variable overriding `request_timeout_ms`.
pub const ENV_REQUEST_TIMEOUT_MS: &str = "FORDAY_REQUEST_TIMEOUT_MS";
/// Environment variable overriding `max_auth_retries`.
pub const ENV_MAX_AUTH_RETRIES: &str = "FORDAY_MAX_AUTH_RETRIES";
/// Environment variable overriding `credential_backend`.
pub const ENV_CREDENTIAL_BACKEND: &str = "FORDAY_CREDENTIAL_BACKEND";

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// An override or file value is out of range.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Repository for client settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    path: Option<PathBuf>,
}

impl SettingsRepository {
    /// Creates a repository using the platform config directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    /// Creates a repository reading and writing `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Default location of the settings file, if a config directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("forday").join("client.json"))
    }

    /// The file this repository uses.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads settings from disk and applies environment overrides.
    ///
    /// Returns defaults (plus overrides) if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if an override has an invalid value.
    pub async fn load(&self) -> Result<ClientSettings, SettingsError> {
        let settings = self.load_file().await?;
        apply_overrides(settings, |name| std::env::var(name).ok())
    }

    /// Loads settings from disk only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_file(&self) -> Result<ClientSettings, SettingsError> {
        let Some(path) = &self.path else {
            return Ok(ClientSettings::default());
        };

        match fs::read(path).await {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "Loaded client settings");
                Ok(from_json_bytes(&content)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientSettings::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Saves settings to disk, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory is known or the write fails.
    pub async fn save(&self, settings: &ClientSettings) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Err(SettingsError::NoConfigDir);
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let content = to_json_stable(settings)?;
        fs::write(path, content).await?;
        tracing::debug!(path = %path.display(), "Saved client settings");

        Ok(())
    }
}

/// Applies `FORDAY_*` overrides read through `lookup`.
///
/// # Errors
///
/// Returns `DomainError::InvalidSetting` for unparsable numeric or backend values.
pub fn apply_overrides(
    mut settings: ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    if let Some(value) = lookup(ENV_BASE_URL) {
        settings.base_url = value;
    }
    if let Some(value) = lookup(ENV_REFRESH_PATH) {
        settings.refresh_path = value;
    }
    if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_MS) {
        settings.request_timeout_ms = parse_number("request_timeout_ms", &value)?;
    }
    if let Some(value) = lookup(ENV_MAX_AUTH_RETRIES) {
        settings.max_auth_retries = parse_number("max_auth_retries", &value)?;
    }
    if let Some(value) = lookup(ENV_CREDENTIAL_BACKEND) {
        settings.credential_backend = value.parse()?;
    }
    Ok(settings)
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, DomainError> {
    value.trim().parse().map_err(|_| DomainError::InvalidSetting {
        name,
        value: value.to_string(),
    })
}
