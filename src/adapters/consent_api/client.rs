//! Rate-limited consent API client
//!
//! Every request carries the bearer token and the `X-Requested-With` header,
//! waits for a slot on the shared [`RateLimiter`], and is retried with
//! exponential backoff on transient failures.

use super::models::{parse_last_page, parse_retry_after, Page};
use super::rate_limit::RateLimiter;
use super::retry::{with_retry, RetryPolicy};
use crate::config::{ApiConfig, SecretString};
use crate::domain::{ApiError, ExporterError, Result};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Query string parameters of a request
pub type QueryParams = Vec<(&'static str, String)>;

/// HTTP client for the consent-management API
///
/// Built once per run and shared by reference between the project lister and
/// the consent fetcher, so the limiter covers every request of the run.
///
/// # Example
///
/// ```no_run
/// use consent_export::adapters::consent_api::ConsentApiClient;
/// use consent_export::config::{secret_string, ApiConfig};
///
/// # fn example() -> consent_export::domain::Result<()> {
/// let mut config = ApiConfig::default();
/// config.access_token = Some(secret_string("token".to_string()));
/// let client = ConsentApiClient::new(&config)?;
/// # Ok(())
/// # }
/// ```
pub struct ConsentApiClient {
    /// Base URL without trailing slash
    base_url: String,

    /// Underlying HTTP client
    client: Client,

    /// Bearer token
    access_token: SecretString,

    /// Throughput cap shared by all requests
    limiter: Arc<RateLimiter>,

    /// Backoff policy for transient failures
    retry: RetryPolicy,
}

impl ConsentApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no access token is configured or the
    /// HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
        Self::with_limiter(config, limiter)
    }

    /// Create a client that draws request slots from an existing limiter
    pub fn with_limiter(config: &ApiConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let access_token = config.access_token.clone().ok_or_else(|| {
            ExporterError::Configuration("api.access_token is required".to_string())
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("consent-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ExporterError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        tracing::debug!(
            base_url = %config.base_url,
            interval_ms = limiter.interval().as_millis() as u64,
            max_retries = config.retry.max_retries,
            "Consent API client created"
        );

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            access_token,
            limiter,
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of a paginated endpoint
    ///
    /// `path` is appended to the base URL; `query` is URL-encoded.
    ///
    /// # Errors
    ///
    /// Returns the last [`ApiError`] once retries are exhausted, or the first
    /// non-retryable one.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> std::result::Result<Page<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let url = url.as_str();

        with_retry(&self.retry, || async move {
            self.limiter.acquire().await;
            self.send_once(url, query).await
        })
        .await
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> std::result::Result<Page<T>, ApiError> {
        tracing::trace!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(self.access_token.expose_secret().as_ref())
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body
            };
            return Err(if status.is_server_error() {
                ApiError::ServerError {
                    status: status.as_u16(),
                    message,
                }
            } else {
                ApiError::ClientError {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let last_page = parse_last_page(response.headers())?;

        let items = response.json::<Vec<T>>().await.map_err(|e| {
            if e.is_decode() {
                ApiError::InvalidResponse(format!("failed to decode response body: {e}"))
            } else {
                map_transport_error(e)
            }
        })?;

        Ok(Page { items, last_page })
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout(e.to_string())
    } else {
        ApiError::ConnectionFailed(e.to_string())
    }
}
