use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::{preview, Provider};
use crate::errors::ProviderError;

/// Client for the public Google web translate endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// Endpoint URL, without query
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
}

/// One translation query
#[derive(Debug, Clone)]
pub struct GoogleRequest {
    /// Text to translate
    pub text: String,
    /// Source language tag (`sl`)
    pub source_language: String,
    /// Target language tag (`tl`)
    pub target_language: String,
}

/// Raw nested-list payload returned by the endpoint
#[derive(Debug, Clone)]
pub struct GoogleResponse(pub Value);

impl GoogleRequest {
    pub fn new(text: impl Into<String>, source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

impl GoogleResponse {
    /// Concatenate the first element of every sentence entry in the first list.
    ///
    /// Payload shape: `[[["translated", "source", ...], ...], ...]`.
    pub fn sentences(&self) -> Result<String, ProviderError> {
        let entries = self.0.get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError(format!(
                "unexpected payload shape: {}",
                preview(&self.0.to_string(), 200)
            )))?;

        Ok(entries
            .iter()
            .filter_map(|entry| entry.get(0).and_then(Value::as_str))
            .filter(|sentence| !sentence.is_empty())
            .collect())
    }
}

impl GoogleTranslate {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Full request URL with the `client, sl, tl, dt, q` query parameters
    pub fn request_url(&self, request: &GoogleRequest) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("invalid endpoint {}: {}", self.endpoint, e)))
    }

    /// Issue one translation query
    pub async fn translate(&self, request: &GoogleRequest) -> Result<GoogleResponse, ProviderError> {
        let url = self.request_url(request)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google Translate error ({}): {}", status, preview(&error_text, 200));
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: preview(&error_text, 200),
            });
        }

        let response_text = response.text().await?;
        serde_json::from_str::<Value>(&response_text)
            .map(GoogleResponse)
            .map_err(|e| ProviderError::ParseError(format!("{} (raw response: {})", e, preview(&response_text, 500))))
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    type Request = GoogleRequest;
    type Response = GoogleResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.translate(&request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.translate(&GoogleRequest::new("hello", "en", "fr")).await?;
        response.sentences().map(|_| ())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.sentences().unwrap_or_default().trim().to_string()
    }
}
