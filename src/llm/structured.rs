// ABOUTME: Structured completion client with a single bounded fallback-model retry
// ABOUTME: Deserializes provider output into the target type and tracks provenance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planforge

//! # Structured Completion Client
//!
//! Wraps an [`LlmProvider`] with the pipeline's retry policy: attempt the
//! primary model once, and on any failure (provider error, timeout, or a
//! payload that does not deserialize into the target type) attempt the
//! designated fallback model exactly once. LLM calls are costly and slow,
//! so the retry count stays fixed at two attempts total.
//!
//! A fallback success is a success variant carrying provenance, not a
//! recovered error: [`StructuredOutcome::fallback_used`] tells the caller
//! which path produced the value.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ChatMessage, LlmProvider, StructuredRequest};
use crate::errors::{AppError, ErrorCode};

/// Result of a structured completion, with model provenance
#[derive(Debug, Clone)]
pub struct StructuredOutcome<T> {
    /// The deserialized, schema-conformant value
    pub value: T,
    /// Identifying name of the model that produced the value
    pub model: String,
    /// Whether the fallback model produced the value
    pub fallback_used: bool,
}

/// Schema-constrained completion client with bounded fallback
pub struct StructuredCompletionClient<P> {
    provider: P,
}

impl<P: LlmProvider> StructuredCompletionClient<P> {
    /// Wrap a provider with the fallback retry policy
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Access the wrapped provider
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Complete against the primary model, falling back once on failure
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` when both the primary and the fallback
    /// attempt fail; the details carry both failure messages.
    pub async fn complete<T: DeserializeOwned>(
        &self,
        messages: Vec<ChatMessage>,
        schema_name: &str,
        schema: Value,
    ) -> Result<StructuredOutcome<T>, AppError> {
        let primary = self.provider.default_model().to_owned();
        let fallback = self.provider.fallback_model().to_owned();

        let request = StructuredRequest::new(messages, schema_name, schema);

        let primary_error = match self.attempt(&request, &primary).await {
            Ok((value, model)) => {
                return Ok(StructuredOutcome {
                    value,
                    model,
                    fallback_used: false,
                })
            }
            Err(e) => e,
        };

        info!(
            "Primary model {} failed ({}), attempting fallback model {}",
            primary, primary_error, fallback
        );

        match self.attempt(&request, &fallback).await {
            Ok((value, model)) => Ok(StructuredOutcome {
                value,
                model,
                fallback_used: true,
            }),
            Err(fallback_error) => {
                warn!(
                    "Fallback model {} also failed: {}",
                    fallback, fallback_error
                );
                Err(AppError::new(
                    ErrorCode::GenerationFailed,
                    "Both primary and fallback model attempts failed",
                )
                .with_details(serde_json::json!({
                    "primary_model": primary,
                    "primary_error": primary_error.to_string(),
                    "fallback_model": fallback,
                    "fallback_error": fallback_error.to_string(),
                })))
            }
        }
    }

    /// One attempt against one model, including transport-level conformance
    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &StructuredRequest,
        model: &str,
    ) -> Result<(T, String), AppError> {
        let request = request.clone().with_model(model);
        let response = self.provider.complete_structured(&request).await?;

        debug!(
            "Model {} returned {} chars of structured output",
            response.model,
            response.content.len()
        );

        // A syntactically invalid payload counts as a failed attempt
        let value: T = serde_json::from_str(&response.content).map_err(|e| {
            AppError::external_service(
                "LLM",
                format!("Model output did not conform to the requested schema: {e}"),
            )
        })?;

        Ok((value, response.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{StructuredResponse, TokenUsage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, serde::Deserialize)]
    struct Payload {
        answer: u32,
    }

    /// Provider whose primary model fails a configurable number of times
    struct FlakyProvider {
        calls: AtomicU32,
        primary_failures: u32,
        content: String,
    }

    impl FlakyProvider {
        fn new(primary_failures: u32, content: &str) -> Self {
            Self {
                calls: AtomicU32::new(0),
                primary_failures,
                content: content.to_owned(),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FlakyProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn display_name(&self) -> &'static str {
            "Flaky Test Provider"
        }

        fn default_model(&self) -> &str {
            "primary-model"
        }

        fn fallback_model(&self) -> &str {
            "fallback-model"
        }

        async fn complete_structured(
            &self,
            request: &StructuredRequest,
        ) -> Result<StructuredResponse, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.primary_failures {
                return Err(AppError::external_service("LLM", "simulated outage"));
            }
            Ok(StructuredResponse {
                content: self.content.clone(),
                model: request.model.clone().unwrap_or_default(),
                usage: Some(TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
            })
        }

        async fn health_check(&self) -> Result<bool, AppError> {
            Ok(true)
        }
    }

    fn schema() -> Value {
        serde_json::json!({ "type": "object" })
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let client = StructuredCompletionClient::new(FlakyProvider::new(0, r#"{"answer":42}"#));

        let outcome: StructuredOutcome<Payload> = client
            .complete(vec![ChatMessage::user("hi")], "payload", schema())
            .await
            .unwrap();

        assert_eq!(outcome.value.answer, 42);
        assert_eq!(outcome.model, "primary-model");
        assert!(!outcome.fallback_used);
        assert_eq!(client.provider().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_used_after_primary_failure() {
        let client = StructuredCompletionClient::new(FlakyProvider::new(1, r#"{"answer":7}"#));

        let outcome: StructuredOutcome<Payload> = client
            .complete(vec![ChatMessage::user("hi")], "payload", schema())
            .await
            .unwrap();

        assert_eq!(outcome.value.answer, 7);
        assert_eq!(outcome.model, "fallback-model");
        assert!(outcome.fallback_used);
        assert_eq!(client.provider().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_both_failures_terminal_with_two_attempts() {
        let client = StructuredCompletionClient::new(FlakyProvider::new(2, r#"{"answer":1}"#));

        let err = client
            .complete::<Payload>(vec![ChatMessage::user("hi")], "payload", schema())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::GenerationFailed);
        // Exactly two attempts, never more
        assert_eq!(client.provider().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_payload_triggers_fallback() {
        // Primary "succeeds" at transport level but returns non-conformant JSON
        let client = StructuredCompletionClient::new(FlakyProvider::new(0, r#"{"wrong":"shape"}"#));

        let err = client
            .complete::<Payload>(vec![ChatMessage::user("hi")], "payload", schema())
            .await
            .unwrap_err();

        // Both attempts returned the same malformed shape
        assert_eq!(err.code, ErrorCode::GenerationFailed);
        assert_eq!(client.provider().calls.load(Ordering::SeqCst), 2);
    }
}
