//! JSON HTTP transport for the booking service.
//!
//! One concern lives here: getting a request to the booking API and a
//! decoded body back, retrying what is worth retrying. Server errors and
//! transport failures (timeouts, refused connections) are retried under a
//! [`RetryPolicy`]; 4xx responses are handed back untouched so the API
//! layer can classify refusals.

use std::time::Duration;

use bookdesk_domain::{BookdeskError, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::IntoBookdeskError;

/// Bounded exponential backoff: attempt `n` waits `base << (n - 1)`, with
/// the shift capped so a long retry budget cannot overflow the duration.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_backoff }
    }

    fn delay(&self, retry: usize) -> Duration {
        let shift = retry.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1 << shift)
    }

    async fn pause(&self, retry: usize) {
        let delay = self.delay(retry);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

/// Retrying JSON client over the booking API.
#[derive(Clone)]
pub struct HttpClient {
    inner: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.inner.request(method, url)
    }

    /// Send `builder`, retrying 5xx responses and transient transport
    /// failures until the retry budget runs out. The response, including a
    /// final 4xx/5xx, is returned for the caller to interpret.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let mut attempt = 1usize;
        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    BookdeskError::Internal(
                        "request body cannot be cloned for retry; buffer it first".into(),
                    )
                })?
                .build()
                .map_err(IntoBookdeskError::into_bookdesk)?;

            let method = request.method().clone();
            let url = request.url().clone();
            let last = attempt >= self.retry.max_attempts;

            match self.inner.execute(request).await {
                Ok(response) if response.status().is_server_error() && !last => {
                    debug!(attempt, %method, %url, status = %response.status(), "retrying server error");
                }
                Ok(response) => {
                    debug!(attempt, %method, %url, status = %response.status(), "response received");
                    return Ok(response);
                }
                Err(err) if is_transient(&err) && !last => {
                    debug!(attempt, %method, %url, error = %err, "retrying transport failure");
                }
                Err(err) => return Err(err.into_bookdesk()),
            }

            self.retry.pause(attempt).await;
            attempt += 1;
        }
    }

    /// Decode a JSON response body into `T`.
    pub async fn read_json<T>(&self, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        response.json::<T>().await.map_err(IntoBookdeskError::into_bookdesk)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts, initial try included. Clamped to at
    /// least one.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let inner = builder.build().map_err(IntoBookdeskError::into_bookdesk)?;
        Ok(HttpClient { inner, retry: self.retry })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
