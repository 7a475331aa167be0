//! In-memory fakes for the application ports.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use forday_domain::CredentialPair;
use forday_domain::request::RequestSpec;
use forday_domain::response::ResponseSpec;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::ports::{
    AuthApi, CredentialStore, CredentialStoreError, HttpClient, HttpClientError, RefreshError,
    SessionEvent, SessionListener,
};

pub fn pair(access: &str, refresh: &str) -> CredentialPair {
    CredentialPair::new(access, refresh).unwrap()
}

/// Credential store that counts its reads and deletions.
#[derive(Default)]
pub struct MemoryStore {
    pair: Mutex<Option<CredentialPair>>,
    loads: AtomicUsize,
    deletes: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn with_pair(pair: CredentialPair) -> Self {
        let store = Self::default();
        *store.pair.lock() = Some(pair);
        store
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn save(&self, pair: &CredentialPair) -> Result<(), CredentialStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CredentialStoreError::Unavailable("disk full".to_string()));
        }
        *self.pair.lock() = Some(pair.clone());
        Ok(())
    }

    async fn load(&self) -> Result<CredentialPair, CredentialStoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.pair.lock().clone().ok_or(CredentialStoreError::NotFound)
    }

    async fn delete_all(&self) -> Result<(), CredentialStoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        *self.pair.lock() = None;
        Ok(())
    }
}

/// Refresh endpoint whose calls block until the gate is opened.
pub struct FakeAuthApi {
    result: Result<CredentialPair, RefreshError>,
    gate: Semaphore,
    calls: AtomicUsize,
    tokens_seen: Mutex<Vec<String>>,
}

impl FakeAuthApi {
    pub fn gated(result: Result<CredentialPair, RefreshError>) -> Self {
        Self {
            result,
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn open_with(result: Result<CredentialPair, RefreshError>) -> Self {
        let api = Self::gated(result);
        api.open();
        api
    }

    pub fn open(&self) {
        self.gate.close();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().clone()
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens_seen.lock().push(refresh_token.to_string());
        // A closed semaphore fails every acquire, which is how the gate opens.
        let _ = self.gate.acquire().await;
        self.result.clone()
    }
}

#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }
}

impl SessionListener for RecordingListener {
    fn notify(&self, event: SessionEvent) {
        self.events.lock().push(event);
    }
}

type Responder = Box<dyn Fn(&RequestSpec) -> Result<ResponseSpec, HttpClientError> + Send + Sync>;

/// HTTP client answering from a closure and recording what was sent.
pub struct FakeHttpClient {
    responder: Responder,
    sent: Mutex<Vec<RequestSpec>>,
}

impl FakeHttpClient {
    pub fn new(
        responder: impl Fn(&RequestSpec) -> Result<ResponseSpec, HttpClientError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<RequestSpec> {
        self.sent.lock().clone()
    }
}

impl HttpClient for FakeHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        self.sent.lock().push(request.clone());
        (self.responder)(request)
    }
}
