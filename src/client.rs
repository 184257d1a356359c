//! HTTP client for the text analysis service.
//!
//! One `POST <base-url>/analyze` per call. No retries, no timeout, no caching:
//! a failed attempt is reported to the caller as-is.

use crate::analysis::{AnalysisRequest, AnalysisResponse};
use crate::config::Config;
use reqwest::{Client, StatusCode};
use std::future::Future;
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("mindscan/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("request to analysis service failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("analysis service returned HTTP {status}")]
    Status { status: StatusCode },
    #[error("failed to decode analysis response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can classify a piece of text.
pub trait Analyzer {
    fn analyze(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<AnalysisResponse, AnalysisError>> + Send;
}

/// reqwest-backed client for `<base-url>/analyze`.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: Client,
    endpoint: String,
}

impl AnalysisClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str) -> Result<Self, AnalysisError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            endpoint: analyze_endpoint(base_url),
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, AnalysisError> {
        Self::new(&config.api.base_url)
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Analyzer for AnalysisClient {
    async fn analyze(&self, text: &str) -> Result<AnalysisResponse, AnalysisError> {
        tracing::debug!(endpoint = %self.endpoint, chars = text.chars().count(), "sending analysis request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&AnalysisRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status { status });
        }

        // Decode separately so a bad body is not reported as a transport failure
        let body = response.bytes().await?;
        let parsed: AnalysisResponse = serde_json::from_slice(&body)?;

        tracing::debug!(prediction = %parsed.prediction, "analysis succeeded");
        Ok(parsed)
    }
}

fn analyze_endpoint(base_url: &str) -> String {
    format!("{}/analyze", base_url.trim_end_matches('/'))
}
