//! HTTP client for the remote search endpoint.

use std::time::Duration;

use crate::config::RemoteConfig;
use crate::error::{UniError, UniResult};
use crate::services::api::{SearchRequest, SearchResponse};

#[derive(Debug, Clone)]
pub struct RemoteSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> UniResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UniError::RemoteFailure(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &RemoteConfig) -> UniResult<Self> {
        Self::new(&config.endpoint, Duration::from_millis(config.timeout_ms))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run `term` against the endpoint. Empty terms are refused before any
    /// request is made.
    pub async fn search(&self, term: &str) -> UniResult<Vec<usize>> {
        if term.is_empty() {
            return Err(UniError::EmptyTermRejected);
        }

        tracing::debug!("POST {} for {:?}", self.endpoint, term);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SearchRequest::new(term))
            .send()
            .await
            .map_err(|e| UniError::RemoteFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UniError::RemoteFailure(format!(
                "{} Error: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown")
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| UniError::RemoteFailure(e.to_string()))?;
        Ok(body.indices)
    }
}
