//! Recommendation service client.
//!
//! Builds the streaming POST and hands the raw response body back to the
//! session controller. Everything past the status line is left to the
//! decoder.

use std::sync::Arc;

use tracing::{debug, info};

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::StreamError;
use crate::models::RecommendationRequest;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// Client for the streaming recommendation endpoint.
#[derive(Clone)]
pub struct RecommendationClient {
    http: Arc<dyn HttpClient>,
    /// Streaming endpoint URL
    pub endpoint: String,
}

impl std::fmt::Debug for RecommendationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RecommendationClient {
    /// Create a client over any [`HttpClient`] implementation.
    pub fn new(http: Arc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Create a reqwest-backed client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::from_config(config)?;
        Ok(Self::new(Arc::new(http), config.endpoint.clone()))
    }

    fn stream_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        headers
    }

    /// POST the request and return the event-stream body.
    ///
    /// Fails on connection errors and non-success statuses; no retry is
    /// attempted.
    pub async fn open_stream(
        &self,
        request: &RecommendationRequest,
    ) -> Result<ByteStream, StreamError> {
        let body = serde_json::to_string(request).map_err(|e| StreamError::Encode {
            message: e.to_string(),
        })?;

        debug!(endpoint = %self.endpoint, body_len = body.len(), "Opening recommendation stream");

        let stream = self
            .http
            .post_stream(&self.endpoint, &body, &Self::stream_headers())
            .await?;

        info!(endpoint = %self.endpoint, "Recommendation stream connected");
        Ok(stream)
    }
}
