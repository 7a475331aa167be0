//! Credential storage using the OS keyring.
//!
//! The whole pair lives in ONE keyring item as a JSON record
//! `{accessToken, refreshToken, savedAt}`, so replacing it is a single write
//! and a reader can never see halves from two generations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forday_application::ports::{CredentialStore, CredentialStoreError};
use forday_domain::{CredentialPair, token_preview};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::serialization::{from_json, to_json_compact};

/// Keyring account name under which the pair is stored.
pub const DEFAULT_ACCOUNT: &str = "credential-pair";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    access_token: String,
    refresh_token: String,
    saved_at: DateTime<Utc>,
}

/// Credential store backed by the OS keyring.
///
/// Keyring calls block, so they run on the blocking pool. The current pair is
/// cached in memory. A write clears the cache before it starts and refills it
/// only after the keyring accepted the new pair, so a save dropped mid-write
/// costs a cold re-read instead of a stale token.
pub struct KeyringCredentialStore {
    service: String,
    entry: Arc<keyring::Entry>,
    cache: RwLock<Option<CredentialPair>>,
}

impl std::fmt::Debug for KeyringCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringCredentialStore")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl KeyringCredentialStore {
    /// Opens the keyring item for `service`.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the platform keyring cannot be used.
    pub fn new(service: impl Into<String>) -> Result<Self, CredentialStoreError> {
        let service = service.into();
        let entry = keyring::Entry::new(&service, DEFAULT_ACCOUNT).map_err(map_keyring_error)?;
        Ok(Self {
            service,
            entry: Arc::new(entry),
            cache: RwLock::new(None),
        })
    }

    /// Keyring service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, CredentialStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&keyring::Entry) -> keyring::Result<T> + Send + 'static,
    {
        let entry = Arc::clone(&self.entry);
        tokio::task::spawn_blocking(move || op(&entry))
            .await
            .map_err(|e| CredentialStoreError::Unavailable(format!("keyring task failed: {e}")))?
            .map_err(map_keyring_error)
    }
}

fn map_keyring_error(error: keyring::Error) -> CredentialStoreError {
    match error {
        keyring::Error::NoEntry => CredentialStoreError::NotFound,
        keyring::Error::BadEncoding(_) => {
            CredentialStoreError::Corrupt("keyring item is not valid UTF-8".to_string())
        }
        other => CredentialStoreError::Unavailable(other.to_string()),
    }
}

fn encode(pair: &CredentialPair) -> Result<String, CredentialStoreError> {
    let record = StoredRecord {
        access_token: pair.access_token().to_string(),
        refresh_token: pair.refresh_token().to_string(),
        saved_at: Utc::now(),
    };
    to_json_compact(&record).map_err(|e| CredentialStoreError::Corrupt(e.to_string()))
}

fn decode(secret: &str) -> Result<CredentialPair, CredentialStoreError> {
    let record: StoredRecord =
        from_json(secret).map_err(|e| CredentialStoreError::Corrupt(e.to_string()))?;
    CredentialPair::new(record.access_token, record.refresh_token)
        .map_err(|e| CredentialStoreError::Corrupt(e.to_string()))
}

#[async_trait]
impl CredentialStore for KeyringCredentialStore {
    async fn save(&self, pair: &CredentialPair) -> Result<(), CredentialStoreError> {
        let secret = encode(pair)?;
        let mut cache = self.cache.write().await;
        // The blocking write outlives this future if it is dropped.
        *cache = None;
        self.blocking(move |entry| entry.set_password(&secret))
            .await?;
        *cache = Some(pair.clone());
        tracing::debug!(
            service = %self.service,
            access = %token_preview(pair.access_token()),
            "Credentials saved to keyring"
        );
        Ok(())
    }

    async fn load(&self) -> Result<CredentialPair, CredentialStoreError> {
        if let Some(pair) = self.cache.read().await.clone() {
            return Ok(pair);
        }

        let mut cache = self.cache.write().await;
        // Another task may have filled the cache while we waited.
        if let Some(pair) = cache.clone() {
            return Ok(pair);
        }
        let secret = self.blocking(keyring::Entry::get_password).await?;
        let pair = decode(&secret)?;
        *cache = Some(pair.clone());
        Ok(pair)
    }

    async fn delete_all(&self) -> Result<(), CredentialStoreError> {
        let mut cache = self.cache.write().await;
        match self.blocking(keyring::Entry::delete_credential).await {
            Ok(()) | Err(CredentialStoreError::NotFound) => {}
            Err(e) => return Err(e),
        }
        *cache = None;
        tracing::debug!(service = %self.service, "Credentials deleted from keyring");
        Ok(())
    }
}
