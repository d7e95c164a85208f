//! Google Gemini implementation of [`RewriteClient`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client::RewriteClient;
use crate::error::ServiceError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

const API_KEY_VAR: &str = "GOOGLE_API_KEY";
const MODEL_VAR: &str = "LUMENLEX_MODEL";
const ENDPOINT_VAR: &str = "LUMENLEX_GEMINI_ENDPOINT";

/// Longest error body kept in [`ServiceError::Http`]
const MAX_ERROR_BODY: usize = 500;

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    /// HTTP-level timeout for one request
    pub request_timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
        }
    }

    /// Read `GOOGLE_API_KEY`, `LUMENLEX_MODEL` and `LUMENLEX_GEMINI_ENDPOINT`
    pub fn from_env() -> Result<Self, ServiceError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ServiceError::Config(format!(
                    "{} not found; define it in a local .env file or the environment",
                    API_KEY_VAR
                ))
            })?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var(MODEL_VAR) {
            config.model = model;
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_VAR) {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Rewrite client backed by the Gemini `generateContent` API
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ServiceError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn timeout_ms(&self) -> u64 {
        self.config
            .request_timeout
            .map(|t| t.as_millis() as u64)
            .unwrap_or_default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn build_request(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
        },
    }
}

/// Concatenate the text parts of the first candidate
fn completion_text(response: GenerateResponse) -> Result<String, ServiceError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ServiceError::NoCandidates {
            block_reason: response.prompt_feedback.and_then(|f| f.block_reason),
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    Ok(text)
}

#[async_trait]
impl RewriteClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        tracing::debug!(
            "Sending {} prompt characters to {}",
            prompt.chars().count(),
            self.config.model
        );

        let response = self
            .http
            .post(self.config.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.timeout_ms())
                } else if e.is_connect() {
                    ServiceError::Transport(format!("unable to reach the service: {}", e))
                } else {
                    ServiceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Gemini returned HTTP {}", status.as_u16());
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(self.timeout_ms())
            } else {
                ServiceError::Malformed(e.to_string())
            }
        })?;

        let text = completion_text(parsed)?;
        tracing::debug!("Received {} completion characters", text.chars().count());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
