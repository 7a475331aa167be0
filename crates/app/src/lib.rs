//! Forday API client
//!
//! Wires the domain, application and infrastructure layers into one
//! [`ForDayClient`]: a reqwest transport behind the auth interceptor, a
//! credential store chosen by the settings, and a session event channel.

use std::sync::Arc;

use forday_application::{
    ApplicationError, AuthInterceptor, CredentialStore, CredentialStoreError, HttpClientError,
    RefreshCoordinator, RefreshOutcome, RequestFailure, SendAuthenticatedRequest, SessionEvent,
    SessionEvents, SessionState, SessionStatus, SignIn, SignOut, use_cases::SignInInput,
};
use forday_domain::{
    ClientSettings, CredentialBackend, CredentialPair, DomainError,
    request::{HttpMethod, RequestSpec},
    response::ResponseSpec,
};
use forday_infrastructure::{
    InMemoryCredentialStore, KeyringCredentialStore, ReqwestAuthApi, ReqwestHttpClient,
    SettingsError,
};
use tokio::sync::broadcast;

/// Session event buffer per subscriber.
const EVENT_CAPACITY: usize = 32;

/// Errors surfaced by [`ForDayClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid settings or input.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Http(#[from] HttpClientError),

    /// The credential store failed.
    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),

    /// A session use case failed.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// An authenticated request failed.
    #[error(transparent)]
    Request(#[from] RequestFailure),
}

/// Fully wired Forday client.
pub struct ForDayClient {
    settings: ClientSettings,
    store: Arc<dyn CredentialStore>,
    events: Arc<SessionEvents>,
    coordinator: Arc<RefreshCoordinator>,
    requests: SendAuthenticatedRequest<ReqwestHttpClient>,
}

impl ForDayClient {
    /// Builds a client using the credential backend named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the keyring, the HTTP client or the refresh URL
    /// cannot be set up.
    pub fn from_settings(settings: ClientSettings) -> Result<Self, ClientError> {
        let store: Arc<dyn CredentialStore> = match settings.credential_backend {
            CredentialBackend::Keyring => {
                Arc::new(KeyringCredentialStore::new(settings.keyring_service.clone())?)
            }
            CredentialBackend::Memory => Arc::new(InMemoryCredentialStore::new()),
        };
        Self::with_store(settings, store)
    }

    /// Builds a client around an existing credential store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the refresh URL cannot be set up.
    pub fn with_store(
        settings: ClientSettings,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ClientError> {
        let http = ReqwestHttpClient::from_settings(&settings)?;
        let auth_api = Arc::new(ReqwestAuthApi::from_http_client(&http, &settings)?);
        let events = Arc::new(SessionEvents::new(EVENT_CAPACITY));
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::clone(&store),
            auth_api,
            events.clone(),
        ));
        let requests = SendAuthenticatedRequest::new(http, AuthInterceptor::new(coordinator.clone()))
            .with_max_auth_retries(settings.max_auth_retries);

        tracing::debug!(
            base_url = %settings.base_url,
            backend = ?settings.credential_backend,
            "Client ready"
        );

        Ok(Self {
            settings,
            store,
            events,
            coordinator,
            requests,
        })
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Subscribes to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Stores the pair issued at login.
    ///
    /// # Errors
    ///
    /// Returns an error if a token is blank or the store rejects the write.
    pub async fn sign_in(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<CredentialPair, ClientError> {
        let input = SignInInput {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        };
        Ok(SignIn::new(Arc::clone(&self.store)).execute(input).await?)
    }

    /// Deletes the stored pair and emits the signed-out event.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the deletion.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let sign_out = SignOut::new(Arc::clone(&self.store), self.events.clone());
        Ok(sign_out.execute().await?)
    }

    /// Reports whether a pair is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn status(&self) -> Result<SessionState, ClientError> {
        Ok(SessionStatus::new(Arc::clone(&self.store)).execute().await?)
    }

    /// Forces a refresh, joining one already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.coordinator.refresh(None).await
    }

    /// Sends `method` to `path` (relative to the base URL) with the stored credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request fails.
    pub async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<ResponseSpec, ClientError> {
        let url = self.settings.endpoint(path)?;
        let mut request = RequestSpec::new(method, url.as_str())
            .with_timeout_ms(self.settings.request_timeout_ms);
        request.body = body;
        Ok(self.requests.execute(request).await?)
    }

    /// Sends a GET to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request fails.
    pub async fn get(&self, path: &str) -> Result<ResponseSpec, ClientError> {
        self.call(HttpMethod::Get, path, None).await
    }
}
