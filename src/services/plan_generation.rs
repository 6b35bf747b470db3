// ABOUTME: Plan generation orchestration from validated preferences to plan preview
// ABOUTME: Drives prompt rendering, structured completion, re-validation, and audit events
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Plan Generation Service
//!
//! The write-path pipeline stage behind the rate limiter and the
//! preference validator. Every invocation emits a `requested` audit
//! event first, then exactly one terminal event (`completed` or
//! `failed`) before the call returns. Generated plans are re-validated
//! before being returned; a schema-conformant but semantically invalid
//! plan is treated as a generation failure, not a caller error.

use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::audit::{AuditLogService, AuditStore};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{render_plan_prompt, PLAN_SYSTEM_PROMPT};
use crate::llm::{ChatMessage, LlmProvider, StructuredCompletionClient};
use crate::models::{
    AiPlanResponse, AuditEventType, GenerationMetadata, PlanPreview, UserPreferences,
};
use crate::validation::validate_plan;

/// Schema name passed to the completion endpoint
const PLAN_SCHEMA_NAME: &str = "workout_plan";

/// Generation workflow over a completion client and an audit sink
pub struct PlanGenerationService<P, A> {
    completion: StructuredCompletionClient<P>,
    audit: AuditLogService<A>,
}

impl<P: LlmProvider, A: AuditStore> PlanGenerationService<P, A> {
    /// Create a generation service
    pub const fn new(completion: StructuredCompletionClient<P>, audit: AuditLogService<A>) -> Self {
        Self { completion, audit }
    }

    /// Generate a plan preview from validated preferences
    ///
    /// The preview is ephemeral. Nothing is persisted here beyond the
    /// audit trail; the caller decides whether to accept the plan.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` when both model attempts fail or when
    /// the returned plan does not survive re-validation. The outward
    /// message is generic; specifics go to the audit trail and logs.
    #[instrument(skip(self, preferences), fields(user_id = %user_id))]
    pub async fn generate_plan_preview(
        &self,
        user_id: Uuid,
        preferences: &UserPreferences,
    ) -> AppResult<PlanPreview> {
        self.audit
            .log_event(
                user_id,
                AuditEventType::AiGenerationRequested,
                json!({ "preferences": preferences }),
            )
            .await;

        let messages = vec![
            ChatMessage::system(PLAN_SYSTEM_PROMPT),
            ChatMessage::user(render_plan_prompt(preferences)),
        ];

        let outcome = match self
            .completion
            .complete::<AiPlanResponse>(messages, PLAN_SCHEMA_NAME, plan_response_schema())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(user_id = %user_id, "Plan generation failed: {e}");
                self.audit
                    .log_event(
                        user_id,
                        AuditEventType::AiGenerationFailed,
                        json!({ "error": e.message }),
                    )
                    .await;
                return Err(AppError::generation_failed());
            }
        };

        if let Err(violations) = validate_plan(&outcome.value) {
            tracing::error!(
                user_id = %user_id,
                model = %outcome.model,
                violation_count = violations.len(),
                "Generated plan failed re-validation"
            );
            self.audit
                .log_event(
                    user_id,
                    AuditEventType::AiGenerationFailed,
                    json!({
                        "error": "generated plan failed validation",
                        "violations": violations,
                    }),
                )
                .await;
            return Err(AppError::generation_failed());
        }

        self.audit
            .log_event(
                user_id,
                AuditEventType::AiGenerationCompleted,
                json!({
                    "model": outcome.model,
                    "fallback_used": outcome.fallback_used,
                }),
            )
            .await;

        tracing::info!(
            user_id = %user_id,
            model = %outcome.model,
            fallback_used = outcome.fallback_used,
            "Plan generated"
        );

        Ok(PlanPreview {
            plan: outcome.value,
            metadata: GenerationMetadata {
                model: outcome.model,
                fallback_used: outcome.fallback_used,
            },
        })
    }
}

/// JSON schema the completion endpoint must conform to
///
/// Mirrors [`AiPlanResponse`]. Optional fields are omitted from
/// `required` so the model may leave them out entirely.
#[must_use]
pub fn plan_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "description": { "type": "string" },
            "cycle_duration_weeks": { "type": "integer", "minimum": 1 },
            "schedule": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "exercises": {
                            "type": "array",
                            "minItems": 1,
                            "items": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string" },
                                    "sets": {
                                        "type": "array",
                                        "minItems": 1,
                                        "items": {
                                            "type": "object",
                                            "properties": {
                                                "reps": { "type": "integer", "minimum": 1 },
                                                "weight": { "type": "number", "minimum": 0 },
                                                "rest_seconds": { "type": "integer", "minimum": 0 },
                                                "rir": { "type": "integer", "minimum": 0, "maximum": 5 }
                                            },
                                            "required": ["reps", "rest_seconds"]
                                        }
                                    },
                                    "notes": { "type": "string" }
                                },
                                "required": ["name", "sets"]
                            }
                        }
                    },
                    "required": ["name", "exercises"]
                }
            }
        },
        "required": ["name", "description", "cycle_duration_weeks", "schedule"]
    })
}
