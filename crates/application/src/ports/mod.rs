//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod auth_api;
mod credential_store;
mod http_client;
mod session;

pub use auth_api::{AuthApi, RefreshError};
pub use credential_store::{CredentialStore, CredentialStoreError};
pub use http_client::{HttpClient, HttpClientError};
pub use session::{SessionEvent, SessionListener, TerminationReason};
