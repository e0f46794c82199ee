//! Blocking JSON HTTP client.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin wrapper over `reqwest::blocking` with a fixed base URL and uniform
/// error triage. Each call is a single request/response; failures are
/// returned to the caller untouched.
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ApiClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> ApiResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    /// Client with the default timeout.
    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        Self::new(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path`, returning the response JSON.
    pub fn get(&self, path: &str) -> ApiResult<Value> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(|e| self.triage(e))?;
        self.read_json(response)
    }

    /// POST `body` to `path`, returning the response JSON.
    pub fn post<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<Value> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(|e| self.triage(e))?;
        self.read_json(response)
    }

    /// PUT `body` to `path`. The response body is discarded.
    pub fn put<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        debug!(path, "PUT");
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .map_err(|e| self.triage(e))?;
        self.check_status(response).map(|_| ())
    }

    /// DELETE `path`. The response body is discarded.
    pub fn delete(&self, path: &str) -> ApiResult<()> {
        debug!(path, "DELETE");
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .map_err(|e| self.triage(e))?;
        self.check_status(response).map(|_| ())
    }

    // ── Internal ────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn triage(&self, err: reqwest::Error) -> ApiError {
        if err.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if err.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    fn check_status(
        &self,
        response: reqwest::blocking::Response,
    ) -> ApiResult<reqwest::blocking::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn read_json(&self, response: reqwest::blocking::Response) -> ApiResult<Value> {
        let response = self.check_status(response)?;
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }
}
