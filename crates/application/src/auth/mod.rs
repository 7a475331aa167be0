//! Authentication module for the Forday client.
//!
//! This module provides:
//! - Classification of failed responses into refresh / terminate / passthrough
//! - The single-flight refresh coordinator with its pending-retry queue
//! - The interceptor that attaches credentials and decides on retries
//! - A broadcast-backed session listener

mod classify;
mod coordinator;
mod decision;
mod interceptor;
mod session_events;

pub use classify::{FailureAction, classify_failure};
pub use coordinator::{RefreshCoordinator, RefreshOutcome};
pub use decision::{RequestFailure, RetryDecision};
pub use interceptor::AuthInterceptor;
pub use session_events::SessionEvents;
