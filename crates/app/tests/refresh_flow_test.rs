//! End-to-end refresh flow over real HTTP.
//!
//! A local axum server plays the Forday backend: `/me` accepts only the
//! refreshed access token, `/auth/refresh` exchanges `R1` for `A2`/`R2` and
//! rejects anything else with `LOGIN_EXPIRED`.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use forday::{ClientError, ForDayClient};
use forday_application::{
    CredentialStore, CredentialStoreError, RequestFailure, SessionEvent, TerminationReason,
};
use forday_domain::{ClientSettings, CredentialBackend, CredentialPair};
use forday_infrastructure::InMemoryCredentialStore;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Backend {
    refresh_hits: Arc<AtomicUsize>,
}

fn error_body(class: &str) -> Json<Value> {
    Json(json!({
        "status": 401,
        "success": false,
        "data": { "errorClassName": class, "message": class.to_lowercase() }
    }))
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth == "Bearer A2-fresh-token" {
        (StatusCode::OK, Json(json!({ "nickname": "forday" })))
    } else {
        (StatusCode::UNAUTHORIZED, error_body("TOKEN_EXPIRED"))
    }
}

async fn legacy() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, error_body("LOGIN_EXPIRED"))
}

async fn refresh(State(backend): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    backend.refresh_hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;

    if body["refreshToken"] == "R1-refresh-token" {
        (
            StatusCode::OK,
            Json(json!({
                "status": 200,
                "success": true,
                "data": { "accessToken": "A2-fresh-token", "refreshToken": "R2-refresh-token" }
            })),
        )
    } else {
        (StatusCode::UNAUTHORIZED, error_body("LOGIN_EXPIRED"))
    }
}

async fn start_backend() -> (SocketAddr, Backend) {
    let backend = Backend::default();
    let router = Router::new()
        .route("/me", get(me))
        .route("/legacy", get(legacy))
        .route("/auth/refresh", post(refresh))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, backend)
}

async fn client_for(addr: SocketAddr, refresh_token: &str) -> (Arc<ForDayClient>, Arc<InMemoryCredentialStore>) {
    let settings = ClientSettings {
        base_url: format!("http://{addr}"),
        request_timeout_ms: 5_000,
        credential_backend: CredentialBackend::Memory,
        ..ClientSettings::default()
    };
    let store = Arc::new(InMemoryCredentialStore::with_pair(
        CredentialPair::new("A1-expired-token", refresh_token).unwrap(),
    ));
    let client = ForDayClient::with_store(settings, store.clone()).unwrap();
    (Arc::new(client), store)
}

#[tokio::test]
async fn test_concurrent_expired_requests_refresh_once() {
    let (addr, backend) = start_backend().await;
    let (client, store) = client_for(addr, "R1-refresh-token").await;
    let mut events = client.subscribe();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.get("/me").await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.status.as_u16(), 200);
        assert!(response.body_as_string_lossy().contains("forday"));
    }

    assert_eq!(backend.refresh_hits.load(Ordering::SeqCst), 1);
    let pair = store.load().await.unwrap();
    assert_eq!(pair.access_token(), "A2-fresh-token");
    assert_eq!(pair.refresh_token(), "R2-refresh-token");
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Refreshed);
}

#[tokio::test]
async fn test_rejected_refresh_terminates_session() {
    let (addr, backend) = start_backend().await;
    let (client, store) = client_for(addr, "R-revoked-token").await;
    let mut events = client.subscribe();

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.get("/me").await })
        })
        .collect();

    for handle in handles {
        let error = handle.await.unwrap().unwrap_err();
        assert!(
            matches!(error, ClientError::Request(RequestFailure::SessionTerminated)),
            "unexpected error: {error:?}"
        );
    }

    assert_eq!(backend.refresh_hits.load(Ordering::SeqCst), 1);
    assert_eq!(store.load().await, Err(CredentialStoreError::NotFound));
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Terminated {
            reason: TerminationReason::RefreshRejected
        }
    );
    // Requests that fail after the termination must not signal it again.
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_login_expired_terminates_without_refresh() {
    let (addr, backend) = start_backend().await;
    let (client, store) = client_for(addr, "R1-refresh-token").await;
    let mut events = client.subscribe();

    let error = client.get("/legacy").await.unwrap_err();

    assert!(matches!(error, ClientError::Request(RequestFailure::SessionTerminated)));
    assert_eq!(backend.refresh_hits.load(Ordering::SeqCst), 0);
    assert_eq!(store.load().await, Err(CredentialStoreError::NotFound));
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Terminated {
            reason: TerminationReason::LoginExpired
        }
    );
}

#[tokio::test]
async fn test_not_found_passes_through() {
    let (addr, backend) = start_backend().await;
    let (client, store) = client_for(addr, "R1-refresh-token").await;

    let error = client.get("/hobbies/404").await.unwrap_err();

    match error {
        ClientError::Request(RequestFailure::Status { status, .. }) => {
            assert_eq!(status.as_u16(), 404);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(backend.refresh_hits.load(Ordering::SeqCst), 0);
    assert_eq!(store.load_access_token().await.unwrap(), "A1-expired-token");
}

#[tokio::test]
async fn test_sign_in_status_sign_out() {
    let (addr, _backend) = start_backend().await;
    let (client, _store) = client_for(addr, "R1-refresh-token").await;

    client.sign_in("A2-fresh-token", "R2-refresh-token").await.unwrap();
    assert_eq!(client.get("/me").await.unwrap().status.as_u16(), 200);

    let mut events = client.subscribe();
    client.sign_out().await.unwrap();
    assert_eq!(
        client.status().await.unwrap(),
        forday_application::SessionState::SignedOut
    );
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Terminated {
            reason: TerminationReason::SignedOut
        }
    );
}
