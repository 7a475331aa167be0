//! Adapter implementations for application ports.

mod auth_api;
mod reqwest_client;

pub use auth_api::ReqwestAuthApi;
pub use reqwest_client::ReqwestHttpClient;
