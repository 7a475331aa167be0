//! File-backed persistence.

mod settings_repository;

pub use settings_repository::{
    ENV_BASE_URL, ENV_CREDENTIAL_BACKEND, ENV_MAX_AUTH_RETRIES, ENV_REFRESH_PATH,
    ENV_REQUEST_TIMEOUT_MS, SettingsError, SettingsRepository, apply_overrides,
};
