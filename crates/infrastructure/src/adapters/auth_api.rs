//! Refresh endpoint adapter using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use forday_application::ports::{AuthApi, RefreshError};
use forday_domain::{ClientSettings, CredentialPair, DomainResult, ErrorEnvelope};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::ReqwestHttpClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBody {
    access_token: String,
    refresh_token: String,
}

/// Success bodies come either bare or inside the `{status, success, data}` wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum RefreshResponse {
    Wrapped { data: TokenBody },
    Bare(TokenBody),
}

/// Calls `POST {base_url}{refresh_path}` to exchange a refresh token.
#[derive(Debug, Clone)]
pub struct ReqwestAuthApi {
    client: Client,
    refresh_url: Url,
    timeout: Duration,
}

impl ReqwestAuthApi {
    /// Creates an adapter for the refresh endpoint described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the refresh URL cannot be built.
    pub fn new(client: Client, settings: &ClientSettings) -> DomainResult<Self> {
        Ok(Self {
            client,
            refresh_url: settings.refresh_url()?,
            timeout: Duration::from_millis(settings.request_timeout_ms),
        })
    }

    /// Creates an adapter sharing the connection pool of an HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the refresh URL cannot be built.
    pub fn from_http_client(
        http: &ReqwestHttpClient,
        settings: &ClientSettings,
    ) -> DomainResult<Self> {
        Self::new(http.inner().clone(), settings)
    }

    /// The resolved refresh endpoint.
    #[must_use]
    pub const fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }
}

#[async_trait]
impl AuthApi for ReqwestAuthApi {
    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError> {
        let response = self
            .client
            .post(self.refresh_url.clone())
            .timeout(self.timeout)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| {
                let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                RefreshError::Transport(ReqwestHttpClient::map_error(&e, timeout_ms).to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RefreshError::Transport(format!("Failed to read body: {e}")))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Refresh endpoint rejected the token");
            return Err(rejection(status.as_u16(), &body));
        }

        parse_token_body(&body)
    }
}

fn rejection(status: u16, body: &[u8]) -> RefreshError {
    RefreshError::Rejected {
        status,
        error_class: ErrorEnvelope::parse(body)
            .ok()
            .map(|envelope| envelope.error_class().as_str().to_string()),
    }
}

fn parse_token_body(body: &[u8]) -> Result<CredentialPair, RefreshError> {
    let tokens = match serde_json::from_slice::<RefreshResponse>(body)
        .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?
    {
        RefreshResponse::Wrapped { data } | RefreshResponse::Bare(data) => data,
    };
    CredentialPair::new(tokens.access_token, tokens.refresh_token)
        .map_err(|e| RefreshError::InvalidResponse(e.to_string()))
}
