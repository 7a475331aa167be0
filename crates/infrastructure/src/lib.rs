//! Forday Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer:
//! - reqwest adapters for authenticated endpoints and the refresh endpoint
//! - OS keyring and in-memory credential stores
//! - File-backed client settings

pub mod adapters;
pub mod credentials;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestAuthApi, ReqwestHttpClient};
pub use credentials::{InMemoryCredentialStore, KeyringCredentialStore};
pub use persistence::{SettingsError, SettingsRepository, apply_overrides};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_compact, to_json_stable,
};
