// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic HTTP adapter for sub-services that are pure REST peers
//! (backend, detector). Used directly for those two; the writer uses
//! [`crate::process::ProcessAdapter`] instead since it also owns the
//! child process.
//!
//! Ported from `databuffer_writer_client.py`'s `_send_request_to_process`:
//! every call retries up to `retry_n` times, sleeping `retry_delay`
//! between attempts, treating both transport errors and a JSON envelope
//! whose `"state"` field isn't `"ok"` as a retryable failure.

use async_trait::async_trait;
use dia_core::{ConfigSection, ManagerError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Duration;

use crate::capability::{Controllable, Parameterizable, Queryable};

/// Default values matching `detector_integration_api.config`.
pub const DEFAULT_COMMUNICATION_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RETRY_N: usize = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A sub-service reachable purely over HTTP, exposing `/start`,
/// `/stop`, `/reset`, `/kill`, `/status`, `/parameters`, `/statistics`.
pub struct HttpAdapter<S> {
    base_url: String,
    client: reqwest::Client,
    retry_n: usize,
    retry_delay: Duration,
    _status: PhantomData<fn() -> S>,
}

impl<S> HttpAdapter<S> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            retry_n: DEFAULT_RETRY_N,
            retry_delay: DEFAULT_RETRY_DELAY,
            _status: PhantomData,
        }
    }

    pub fn with_retry(mut self, retry_n: usize, retry_delay: Duration) -> Self {
        self.retry_n = retry_n;
        self.retry_delay = retry_delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and retries until the JSON envelope's `"state"`
    /// field reads `"ok"`, or the retry budget is exhausted.
    async fn send_with_retry(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ManagerError> {
        let url = self.url(path);
        for attempt in 0..self.retry_n {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .timeout(DEFAULT_COMMUNICATION_TIMEOUT);
            if let Some(b) = body {
                request = request.json(b);
            }

            let outcome = async {
                let response = request.send().await.map_err(|e| e.to_string())?;
                response
                    .json::<Value>()
                    .await
                    .map_err(|e| e.to_string())
            }
            .await;

            match outcome {
                Ok(envelope) if envelope.get("state").and_then(Value::as_str) == Some("ok") => {
                    return Ok(envelope);
                }
                Ok(_) | Err(_) => {
                    tracing::debug!(url, attempt, "sub-service call not ok, retrying");
                    if attempt + 1 < self.retry_n {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        Err(ManagerError::SubserviceUnavailable(format!(
            "{url} did not respond ok within {} attempts",
            self.retry_n
        )))
    }
}

#[async_trait]
impl<S> Controllable for HttpAdapter<S>
where
    S: DeserializeOwned + Send,
{
    type Status = S;

    async fn start(&self, params: &ConfigSection) -> Result<(), ManagerError> {
        let body = serde_json::to_value(params).map_err(|e| ManagerError::Internal(e.to_string()))?;
        self.send_with_retry(reqwest::Method::POST, "/start", Some(&body))
            .await
            .map(|_| ())
    }

    async fn stop(&self) -> Result<(), ManagerError> {
        self.send_with_retry(reqwest::Method::GET, "/stop", None)
            .await
            .map(|_| ())
    }

    async fn reset(&self) -> Result<(), ManagerError> {
        self.send_with_retry(reqwest::Method::GET, "/reset", None)
            .await
            .map(|_| ())
    }

    async fn kill(&self) -> Result<(), ManagerError> {
        self.send_with_retry(reqwest::Method::GET, "/kill", None)
            .await
            .map(|_| ())
    }

    async fn get_status(&self) -> Result<Self::Status, ManagerError> {
        let envelope = self
            .send_with_retry(reqwest::Method::GET, "/status", None)
            .await?;
        let status = envelope
            .get("status")
            .cloned()
            .ok_or_else(|| ManagerError::Internal("status envelope missing 'status'".to_string()))?;
        serde_json::from_value(status).map_err(|e| ManagerError::Internal(e.to_string()))
    }
}

#[async_trait]
impl<S> Parameterizable for HttpAdapter<S>
where
    S: DeserializeOwned + Send,
{
    async fn set_parameters(&self, params: &ConfigSection) -> Result<(), ManagerError> {
        let body = serde_json::to_value(params).map_err(|e| ManagerError::Internal(e.to_string()))?;
        self.send_with_retry(reqwest::Method::POST, "/parameters", Some(&body))
            .await
            .map(|_| ())
    }

    async fn get_statistics(&self) -> Result<Value, ManagerError> {
        self.send_with_retry(reqwest::Method::GET, "/statistics", None)
            .await
    }
}

/// Detector pass-through: a single named value, read or written at
/// `/value/:name`. Only the detector adapter uses this; implemented
/// generically here since any `HttpAdapter<S>` could in principle
/// expose it.
#[async_trait]
impl<S> Queryable for HttpAdapter<S>
where
    S: DeserializeOwned + Send,
{
    async fn get_value(&self, name: &str) -> Result<Value, ManagerError> {
        let envelope = self
            .send_with_retry(reqwest::Method::GET, &format!("/value/{name}"), None)
            .await?;
        envelope
            .get("value")
            .cloned()
            .ok_or_else(|| ManagerError::Internal("value envelope missing 'value'".to_string()))
    }

    async fn set_value(&self, name: &str, value: &Value) -> Result<(), ManagerError> {
        let body = serde_json::json!({ "value": value });
        self.send_with_retry(reqwest::Method::POST, &format!("/value/{name}"), Some(&body))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
