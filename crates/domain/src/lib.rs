//! Forday Domain - Core types for authenticated API access
//!
//! This crate defines the domain model shared by the Forday client layers:
//! credentials, the server error envelope, request/response specs and
//! client settings. All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod request;
pub mod response;
pub mod settings;

pub use auth::{CredentialPair, ErrorClass, ErrorData, ErrorEnvelope, token_preview};
pub use error::{DomainError, DomainResult};
pub use settings::{ClientSettings, CredentialBackend};
