//! Blocking JSON-over-HTTP transport.
//!
//! Uses async reqwest internally, driven on a shared tokio runtime with
//! `block_on`, so callers stay synchronous and at most one request is in
//! flight at a time.

use std::sync::LazyLock;
use std::time::Duration;

use serde_json::Value;

use crate::error::FetchError;
use crate::retry::{RetryPolicy, retry_fetch};

/// Whole-request timeout (connect + headers + body)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared tokio runtime for HTTP operations.
static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Fetch a URL and return its JSON payload, or `None` once retries are spent.
pub trait Transport {
    fn fetch_json(&self, url: &str) -> Option<Value>;
}

/// reqwest-backed [`Transport`] with a per-request timeout and retry policy
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl HttpTransport {
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(FetchError::from_reqwest)?;
        Ok(Self { client, policy })
    }

    /// One attempt: GET, require exactly 200, parse the body as JSON.
    pub fn get_once(&self, url: &str) -> Result<Value, FetchError> {
        let (status, body) = SHARED_RUNTIME
            .handle()
            .block_on(async {
                let resp = self.client.get(url).send().await?;
                let status = resp.status().as_u16();
                if status != 200 {
                    return Ok((status, None));
                }
                let body = resp.text().await?;
                Ok::<_, reqwest::Error>((status, Some(body)))
            })
            .map_err(FetchError::from_reqwest)?;

        match body {
            Some(text) => serde_json::from_str(&text).map_err(FetchError::Json),
            None => Err(FetchError::Status(status)),
        }
    }
}

impl Transport for HttpTransport {
    fn fetch_json(&self, url: &str) -> Option<Value> {
        let label = redact_url(url);
        retry_fetch(&label, &self.policy, || self.get_once(url))
    }
}

/// Mask the `api_key` query parameter so URLs can be logged.
pub fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let params: Vec<String> = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some(("api_key", _)) => "api_key=***".to_string(),
            _ => param.to_string(),
        })
        .collect();
    format!("{base}?{}", params.join("&"))
}
