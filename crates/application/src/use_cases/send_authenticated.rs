//! Send authenticated request use case.

use forday_domain::request::RequestSpec;
use forday_domain::response::ResponseSpec;

use crate::auth::{AuthInterceptor, FailureAction, RequestFailure, RetryDecision, classify_failure};
use crate::ports::HttpClient;

/// Default number of replays after a credential refresh.
pub const DEFAULT_MAX_AUTH_RETRIES: u32 = 1;

/// Use case for sending a request with the stored bearer credential,
/// refreshing and replaying it when the credential has expired.
pub struct SendAuthenticatedRequest<C: HttpClient> {
    client: C,
    interceptor: AuthInterceptor,
    max_auth_retries: u32,
}

impl<C: HttpClient> SendAuthenticatedRequest<C> {
    /// Creates a new `SendAuthenticatedRequest` use case.
    #[must_use]
    pub const fn new(client: C, interceptor: AuthInterceptor) -> Self {
        Self {
            client,
            interceptor,
            max_auth_retries: DEFAULT_MAX_AUTH_RETRIES,
        }
    }

    /// Sets how many times one request may be replayed after a refresh.
    #[must_use]
    pub const fn with_max_auth_retries(mut self, max_auth_retries: u32) -> Self {
        self.max_auth_retries = max_auth_retries;
        self
    }

    /// Sends the request.
    ///
    /// 2xx and 3xx responses are returned as-is. A 401 caused by an expired
    /// credential is absorbed by a refresh and a replay.
    ///
    /// # Errors
    /// - `InvalidRequest` if the URL is empty or not http(s)
    /// - `Transport` if no response was received
    /// - `Status` for any other error response
    /// - `SessionTerminated` if the session ended while handling a 401
    /// - `RefreshAbandoned` if the refresh this request waited on was dropped
    pub async fn execute(&self, request: RequestSpec) -> Result<ResponseSpec, RequestFailure> {
        validate(&request)?;

        let mut attempt = 0;
        loop {
            let outgoing = self.interceptor.attach_credential(request.clone()).await;
            tracing::debug!(
                request_id = %outgoing.id,
                method = %outgoing.method,
                url = %outgoing.url,
                attempt,
                "Sending request"
            );

            let (response, failure) = match self.client.execute(&outgoing).await {
                Ok(response) if !response.status.is_error() => return Ok(response),
                Ok(response) => {
                    let failure = RequestFailure::from_response(&response);
                    (Some(response), failure)
                }
                Err(e) => (None, RequestFailure::Transport(e)),
            };

            // Out of replays: only a login-expired answer still needs handling.
            if attempt >= self.max_auth_retries
                && classify_failure(response.as_ref()) != FailureAction::TerminateSession
            {
                if response.as_ref().is_some_and(ResponseSpec::is_unauthorized) {
                    tracing::warn!(request_id = %outgoing.id, attempt, "Still unauthorized after replay");
                }
                return Err(failure);
            }

            match self
                .interceptor
                .handle_failure(&outgoing, response.as_ref(), failure)
                .await
            {
                RetryDecision::Retry => attempt += 1,
                RetryDecision::DoNotRetry(failure) => return Err(failure),
            }
        }
    }
}

fn validate(request: &RequestSpec) -> Result<(), RequestFailure> {
    if request.url.trim().is_empty() {
        return Err(RequestFailure::InvalidRequest("URL is required".to_string()));
    }
    let url = request
        .parse_url()
        .map_err(|e| RequestFailure::InvalidRequest(format!("invalid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(RequestFailure::InvalidRequest(format!(
            "unsupported scheme: {scheme}"
        ))),
    }
}
