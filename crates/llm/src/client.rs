//! HTTP client for Gemini's `generateContent` endpoint.

use annotation::{GenerationError, GenerationRequest, LabelModel, ModelId};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::ApiKey;

/// Public Gemini API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// API root, without a trailing path (e.g. [`DEFAULT_BASE_URL`]).
    pub base_url: String,
    /// Model to call.
    pub model: ModelId,
    /// Credential sent with every request.
    pub api_key: ApiKey,
}

/// Errors constructing a [`GeminiClient`].
#[derive(Debug, Error)]
pub enum GeminiSetupError {
    /// The base URL is not an absolute `http`/`https` URL.
    #[error("Base URL '{0}' must start with http:// or https://")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be initialised (e.g. TLS backend failure).
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// [`LabelModel`] backed by the Gemini REST API.
///
/// Each call makes one request. No timeout is applied; a hung connection
/// blocks until the server or the OS gives up.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: ModelId,
    api_key: ApiKey,
}

impl GeminiClient {
    /// Creates a client for `settings.model`.
    pub fn new(settings: GeminiSettings) -> Result<Self, GeminiSetupError> {
        let base = settings.base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(GeminiSetupError::InvalidBaseUrl(settings.base_url));
        }
        let endpoint = format!("{base}/v1beta/models/{}:generateContent", settings.model);
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint,
            model: settings.model,
            api_key: settings.api_key,
        })
    }

    /// Returns the model this client calls.
    pub fn model(&self) -> &ModelId {
        &self.model
    }

    /// Returns the full request URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LabelModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError> {
        let body = GenerateContentRequest::new(request);
        debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        debug!(
            model = %self.model,
            status = status.as_u16(),
            "Received generateContent response"
        );

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str::<GenerateContentResponse>(&text)
            .map_err(|e| GenerationError::MalformedResponse {
                message: e.to_string(),
            })?
            .into_text()
    }
}

fn transport(error: reqwest::Error) -> GenerationError {
    GenerationError::Transport {
        message: error.to_string(),
    }
}
