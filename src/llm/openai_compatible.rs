// ABOUTME: OpenAI-compatible LLM provider with JSON-schema constrained output
// ABOUTME: Works against OpenAI, Ollama, vLLM, and any compatible chat completions API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planforge

//! # `OpenAI`-Compatible Provider
//!
//! Generic implementation for any `OpenAI`-compatible chat completions
//! endpoint. Requests use the `response_format: json_schema` mechanism to
//! demand output conforming to the declared schema.
//!
//! ## Configuration
//!
//! - `PLANFORGE_LLM_BASE_URL`: API endpoint (default: <https://api.openai.com/v1>)
//! - `PLANFORGE_LLM_MODEL`: Primary model
//! - `PLANFORGE_LLM_FALLBACK_MODEL`: Fallback model for retry-on-failure
//! - `PLANFORGE_LLM_API_KEY`: Bearer token (optional for local servers)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{ChatMessage, LlmProvider, StructuredRequest, StructuredResponse, TokenUsage};
use crate::constants::env_keys;
use crate::errors::{AppError, ErrorCode};

/// Default base URL (`OpenAI`)
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default primary model
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default fallback model
const DEFAULT_FALLBACK_MODEL: &str = "gpt-4o";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request timeout (plan generation completions are large)
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: Value,
    strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Primary model
    pub default_model: String,
    /// Fallback model for retry-on-failure
    pub fallback_model: String,
    /// Provider name for display/logging
    pub provider_name: String,
    /// Provider display name
    pub display_name: String,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_owned(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_owned(),
            provider_name: "openai".to_owned(),
            display_name: "OpenAI".to_owned(),
        }
    }
}

impl OpenAiCompatibleConfig {
    /// Build a configuration from environment variables
    ///
    /// Unset variables fall back to the `OpenAI` defaults. An empty API
    /// key is treated as unset, which suits local servers.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var(env_keys::LLM_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let default_model =
            env::var(env_keys::LLM_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let fallback_model = env::var(env_keys::LLM_FALLBACK_MODEL)
            .unwrap_or_else(|_| DEFAULT_FALLBACK_MODEL.to_owned());
        let api_key = env::var(env_keys::LLM_API_KEY).ok().filter(|k| !k.is_empty());

        // Detect known local servers from the URL for friendlier logs
        let (provider_name, display_name) = if base_url.contains(":11434") {
            ("ollama", "Ollama (Local)")
        } else if base_url.contains(":8000") {
            ("vllm", "vLLM (Local)")
        } else {
            ("openai", "OpenAI")
        };

        Self {
            base_url,
            api_key,
            default_model,
            fallback_model,
            provider_name: provider_name.to_owned(),
            display_name: display_name.to_owned(),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
///
/// Works with any endpoint that implements the `OpenAI` chat completions
/// API with `json_schema` response formats, including Ollama, vLLM, and
/// cloud services.
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_env() -> Result<Self, AppError> {
        let config = OpenAiCompatibleConfig::from_env();

        info!(
            "Initializing {} provider: base_url={}, model={}, fallback={}",
            config.display_name, config.base_url, config.default_model, config.fallback_model
        );

        Self::new(config)
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Parse error response from API
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::auth_invalid(format!(
                    "API authentication failed: {}",
                    error_response.error.message
                )),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    format!("LLM rate limit reached: {}", error_response.error.message),
                ),
                400 => AppError::external_service(
                    "LLM",
                    format!("API rejected request: {}", error_response.error.message),
                ),
                _ => AppError::external_service(
                    "LLM",
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            match status.as_u16() {
                502..=504 => AppError::external_service(
                    "LLM",
                    "LLM server is not responding. Is the endpoint running?".to_owned(),
                ),
                _ => AppError::external_service(
                    "LLM",
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            }
        }
    }

    /// Map a reqwest transport error to an `AppError`
    fn connect_error(&self, e: &reqwest::Error) -> AppError {
        error!(
            "Failed to send request to {}: {}",
            self.config.provider_name, e
        );
        if e.is_connect() {
            AppError::external_service(
                "LLM",
                format!(
                    "Cannot connect to {}. Is the server running at {}?",
                    self.config.display_name, self.config.base_url
                ),
            )
        } else {
            AppError::external_service("LLM", format!("Failed to connect: {e}"))
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        match self.config.provider_name.as_str() {
            "ollama" => "ollama",
            "vllm" => "vllm",
            _ => "openai",
        }
    }

    fn display_name(&self) -> &'static str {
        match self.config.provider_name.as_str() {
            "ollama" => "Ollama (Local)",
            "vllm" => "vLLM (Local)",
            _ => "OpenAI",
        }
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn fallback_model(&self) -> &str {
        &self.config.fallback_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        debug!(
            "Sending structured completion request to {} with {} messages (schema: {})",
            self.config.provider_name,
            request.messages.len(),
            request.schema_name
        );

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_schema".to_owned(),
                json_schema: JsonSchemaFormat {
                    name: request.schema_name.clone(),
                    schema: request.schema.clone(),
                    strict: true,
                },
            },
        };

        let mut http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        if let Some(ref api_key) = self.config.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await.map_err(|e| self.connect_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service("LLM", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                &body[..body.len().min(500)]
            );
            AppError::external_service("LLM", format!("Failed to parse response: {e}"))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("LLM", "API returned no choices"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| AppError::external_service("LLM", "API returned empty content"))?;

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.config.provider_name,
            content.len(),
            choice.finish_reason
        );

        Ok(StructuredResponse {
            content,
            model: openai_response.model,
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        debug!(
            "Performing {} health check at {}",
            self.config.provider_name, self.config.base_url
        );

        let mut http_request = self.client.get(self.api_url("models"));
        if let Some(ref api_key) = self.config.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await.map_err(|e| self.connect_error(&e))?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!(
                "{} health check failed with status: {}",
                self.config.provider_name,
                response.status()
            );
        }

        Ok(healthy)
    }
}
