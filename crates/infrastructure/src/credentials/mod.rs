//! Credential store adapters.

mod keyring_store;
mod memory_store;

pub use keyring_store::KeyringCredentialStore;
pub use memory_store::InMemoryCredentialStore;
