//! Process-local credential store.

use async_trait::async_trait;
use forday_application::ports::{CredentialStore, CredentialStoreError};
use forday_domain::CredentialPair;
use tokio::sync::RwLock;

/// Keeps the pair in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    pair: RwLock<Option<CredentialPair>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `pair`.
    #[must_use]
    pub fn with_pair(pair: CredentialPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn save(&self, pair: &CredentialPair) -> Result<(), CredentialStoreError> {
        *self.pair.write().await = Some(pair.clone());
        Ok(())
    }

    async fn load(&self) -> Result<CredentialPair, CredentialStoreError> {
        self.pair
            .read()
            .await
            .clone()
            .ok_or(CredentialStoreError::NotFound)
    }

    async fn delete_all(&self) -> Result<(), CredentialStoreError> {
        *self.pair.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_save_replaces_pair() {
        let store = InMemoryCredentialStore::with_pair(CredentialPair::new("A1", "R1").unwrap());
        store
            .save(&CredentialPair::new("A2", "R2").unwrap())
            .await
            .unwrap();

        assert_eq!(store.load_access_token().await.unwrap(), "A2");
        assert_eq!(store.load_refresh_token().await.unwrap(), "R2");
    }

    #[tokio::test]
    async fn test_delete_all_empties_store() {
        let store = InMemoryCredentialStore::new();
        store.delete_all().await.unwrap();
        assert_eq!(store.load().await, Err(CredentialStoreError::NotFound));

        store
            .save(&CredentialPair::new("A1", "R1").unwrap())
            .await
            .unwrap();
        store.delete_all().await.unwrap();
        assert_eq!(
            store.load_refresh_token().await,
            Err(CredentialStoreError::NotFound)
        );
    }
}
