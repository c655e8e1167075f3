//! HTTP GraphQL client backed by `reqwest`.
//!
//! Features:
//! - Pooled keep-alive connections, fixed connect and request timeouts
//! - Automatic retry with exponential backoff for transient errors
//! - True HTTP batching: a JSON array of queries in one POST

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use feescan_core::error::TransportError;
use feescan_core::request::{GraphQlRequest, GraphQlResponse};
use feescan_core::transport::QueryTransport;

use crate::error::HiveError;
use crate::retry::{RetryConfig, RetryPolicy};

/// Configuration for [`HiveClient`].
#[derive(Debug, Clone)]
pub struct HiveClientConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// How long an idle pooled connection is kept for reuse.
    pub pool_idle_timeout: Duration,
    pub tcp_keepalive: Duration,
    pub retry: RetryConfig,
}

impl Default for HiveClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            tcp_keepalive: Duration::from_secs(60),
            retry: RetryConfig::default(),
        }
    }
}

/// GraphQL client for one Hive endpoint.
///
/// Construct once and share by reference (or `Arc`); dropping it closes the
/// pooled connections.
pub struct HiveClient {
    url: String,
    http: reqwest::Client,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl HiveClient {
    /// Create a client for the given GraphQL endpoint URL.
    pub fn new(url: impl Into<String>, config: HiveClientConfig) -> Result<Self, HiveError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .tcp_keepalive(config.tcp_keepalive)
            .build()
            .map_err(|e| HiveError::Client(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            http,
            retry: RetryPolicy::new(config.retry),
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, HiveError> {
        Self::new(url, HiveClientConfig::default())
    }

    fn map_reqwest(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            TransportError::Http(e.to_string())
        }
    }

    async fn post_once<B, R>(&self, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self
            .http
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        let bytes = resp.bytes().await.map_err(|e| self.map_reqwest(e))?;
        serde_json::from_slice(&bytes).map_err(TransportError::Deserialization)
    }

    async fn post<B, R>(&self, body: &B, queries: usize) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.post_once(body).await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_retryable() => match self.retry.next_delay(attempt) {
                    Some(delay) => {
                        tracing::warn!(
                            attempt,
                            queries,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            url = %self.url,
                            "retrying request"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        tracing::error!(
                            attempt,
                            queries,
                            error = %e,
                            url = %self.url,
                            "max retries exceeded"
                        );
                        return Err(e);
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl QueryTransport for HiveClient {
    async fn request(&self, req: GraphQlRequest) -> Result<GraphQlResponse, TransportError> {
        self.post(&req, 1).await
    }

    /// True HTTP batch: all queries as a JSON array in one POST.
    async fn batch_request(
        &self,
        reqs: Vec<GraphQlRequest>,
    ) -> Result<Vec<GraphQlResponse>, TransportError> {
        if reqs.is_empty() {
            return Ok(vec![]);
        }

        let responses: Vec<GraphQlResponse> = self.post(&reqs, reqs.len()).await?;
        if responses.len() != reqs.len() {
            return Err(TransportError::BatchMismatch {
                sent: reqs.len(),
                received: responses.len(),
            });
        }
        Ok(responses)
    }

    fn url(&self) -> &str {
        &self.url
    }
}
