//! Authentication domain types

mod credentials;
mod envelope;

pub use credentials::{CredentialPair, token_preview};
pub use envelope::{ErrorClass, ErrorData, ErrorEnvelope};
