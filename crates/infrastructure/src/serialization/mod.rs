//! JSON helpers shared by the file and keyring adapters.
//!
//! Files are written deterministically:
//! - Fields in declaration order
//! - 2-space indentation
//! - Trailing newline
//!
//! Keyring items are written compact, on one line.

mod json;

pub use json::*;
