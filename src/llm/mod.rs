// ABOUTME: LLM provider abstraction for schema-constrained plan generation
// ABOUTME: Defines the provider contract, message types, and structured request shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planforge

//! # LLM Provider Service Provider Interface
//!
//! Contract that LLM providers implement to serve structured completions
//! for Planforge. The pipeline never consumes free-form text: every
//! request carries a JSON schema the provider must constrain its output
//! to, and every response is the raw JSON the provider produced plus the
//! model that produced it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use planforge::llm::{ChatMessage, LlmProvider, StructuredRequest};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = StructuredRequest::new(
//!         vec![ChatMessage::user("Generate a plan")],
//!         "training_plan",
//!         serde_json::json!({ "type": "object" }),
//!     );
//!     let response = provider.complete_structured(&request).await;
//! }
//! ```

mod openai_compatible;
pub mod prompts;
mod structured;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use structured::{StructuredCompletionClient, StructuredOutcome};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// A single message in a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// A completion request constrained to a declared output schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier; `None` uses the provider default
    pub model: Option<String>,
    /// Name of the target schema (for providers that require one)
    pub schema_name: String,
    /// JSON schema the output must conform to
    pub schema: Value,
    /// Temperature for response randomness
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl StructuredRequest {
    /// Create a new structured request
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>, schema_name: impl Into<String>, schema: Value) -> Self {
        Self {
            messages,
            model: None,
            schema_name: schema_name.into(),
            schema,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Raw provider response to a structured completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredResponse {
    /// Raw JSON text the model produced
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// LLM provider trait for structured completion
///
/// Implement this trait to add a new LLM provider to Planforge. The
/// design follows the async trait pattern for compatibility with the
/// tokio runtime.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "openai", "ollama")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Default (primary) model used when a request names none
    fn default_model(&self) -> &str;

    /// Fallback model used after a primary-model failure
    fn fallback_model(&self) -> &str;

    /// Perform a schema-constrained completion
    async fn complete_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse, AppError>;

    /// Check if the provider is reachable and the API key is valid
    async fn health_check(&self) -> Result<bool, AppError>;
}
