//! HTTP client for the remote store API.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{Result, SyncError};
use crate::types::*;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How request failures are retried.
///
/// Attempt `n` (zero-based) sleeps `base_delay * n` before re-sending, so the
/// first retry after a failure is immediate-ish and subsequent ones back off
/// linearly. Only retryable errors (transport, 429, 5xx) re-enter the loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Multiplied by the attempt index to produce the pre-attempt delay.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Client for the Moneta remote store API.
#[derive(Debug, Clone)]
pub struct SyncClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl SyncClient {
    /// Create a new client with the default retry policy.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the remote store (e.g., "https://api.moneta.app")
    pub fn new(base_url: &str) -> Self {
        Self::with_retry_policy(base_url, RetryPolicy::default())
    }

    /// Create a new client with an explicit retry policy.
    pub fn with_retry_policy(base_url: &str, retry: RetryPolicy) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    /// Create headers for an authenticated API request.
    fn headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| SyncError::api(0, "Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        if status.as_u16() == 401 {
            return Err(SyncError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SyncError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            SyncError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    /// Run `op` until it succeeds, returns a non-retryable error, or the
    /// retry budget is spent.
    async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err = None;
        for attempt in 0..=self.retry.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.retry.base_delay * attempt).await;
            }
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    warn!(
                        "Request failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.retry.max_retries + 1,
                        err
                    );
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.expect("retry loop ran at least once"))
    }

    /// Fetch records modified on the server since the given watermark.
    ///
    /// GET /updates?since={rfc3339}
    pub async fn fetch_updates(&self, token: &str, since: Option<&str>) -> Result<PullResponse> {
        let url = format!("{}/updates", self.base_url);
        debug!("Fetching updates since {:?}", since);

        self.with_retry(|| async {
            let mut request = self.client.get(&url).headers(self.headers(token)?);
            if let Some(since) = since {
                request = request.query(&[("since", since)]);
            }
            let response = request.send().await?;
            Self::parse_response(response).await
        })
        .await
    }

    /// Push locally modified records to the server.
    ///
    /// POST /update
    pub async fn push_updates(&self, token: &str, req: &PushRequest) -> Result<PushResponse> {
        let url = format!("{}/update", self.base_url);
        debug!(
            "Pushing {} invests, {} payments",
            req.invests.len(),
            req.payments.len()
        );

        self.with_retry(|| async {
            let response = self
                .client
                .post(&url)
                .headers(self.headers(token)?)
                .json(req)
                .send()
                .await?;
            Self::parse_response(response).await
        })
        .await
    }

    /// Exchange credentials for a bearer token.
    ///
    /// POST /login
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.auth_request("login", credentials).await
    }

    /// Create an account and receive a bearer token.
    ///
    /// POST /register
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.auth_request("register", credentials).await
    }

    async fn auth_request(&self, endpoint: &str, credentials: &Credentials) -> Result<AuthResponse> {
        let url = format!("{}/{}", self.base_url, endpoint);

        self.with_retry(|| async {
            let response = self.client.post(&url).json(credentials).send().await?;
            Self::parse_response(response).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn test_client() -> SyncClient {
        SyncClient::with_retry_policy(
            "http://localhost:0",
            RetryPolicy {
                max_retries: 3,
                base_delay: Duration::ZERO,
            },
        )
    }

    #[tokio::test]
    async fn test_persistent_server_error_exhausts_retry_budget() {
        let client = test_client();
        let attempts = AtomicU32::new(0);

        let result = client
            .with_retry(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(SyncError::api(500, "boom"))
            })
            .await;

        // Initial attempt plus three retries.
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        assert!(matches!(result, Err(SyncError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_rate_limit_then_success_recovers() {
        let client = test_client();
        let attempts = AtomicU32::new(0);

        let result = client
            .with_retry(|| async {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(SyncError::api(429, "slow down"))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let client = test_client();
        let attempts = AtomicU32::new(0);

        let result = client
            .with_retry(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(SyncError::Unauthorized)
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(SyncError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let client = test_client();
        let attempts = AtomicU32::new(0);

        let result = client
            .with_retry(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(SyncError::api(404, "missing"))
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(SyncError::Api { status: 404, .. })));
    }
}
