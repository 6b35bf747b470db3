// ABOUTME: Core domain data structures for plan generation and dashboard aggregation
// ABOUTME: Defines preference, generated plan, metadata, and upcoming workout types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Domain Models
//!
//! Shared data structures for the two Planforge subsystems: the AI plan
//! generation pipeline and the dashboard aggregation engine. Generated
//! plan types mirror the JSON schema handed to the LLM provider; stored
//! plan types mirror what the plan store persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Maximum length for free-form note fields
pub const MAX_NOTES_LEN: usize = 500;

/// Maximum length for name fields on plans, days, and exercises
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for the generated plan description
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Validated user preferences driving a generation request
///
/// Immutable once produced by the preference validator; input to
/// generation only, never persisted by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Training goal (e.g., "hypertrophy", "marathon prep")
    pub goal: String,
    /// Training methodology identifier (e.g., "5/3/1", "push-pull-legs")
    pub system: String,
    /// Day identifiers the user can train on (non-empty)
    pub available_days: Vec<String>,
    /// Target session length in minutes (strictly positive)
    pub session_duration_minutes: u32,
    /// Plan cycle length in weeks (strictly positive)
    pub cycle_duration_weeks: u32,
    /// Optional free-form notes for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A structured training plan produced by the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPlanResponse {
    /// Plan name (1-100 chars)
    pub name: String,
    /// Plan description (1-500 chars)
    pub description: String,
    /// Cycle length in weeks (strictly positive)
    pub cycle_duration_weeks: u32,
    /// Ordered workout days (at least one)
    pub schedule: Vec<WorkoutDay>,
}

/// A single workout day within a generated plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDay {
    /// Day name (1-100 chars)
    pub name: String,
    /// Ordered exercises (at least one)
    pub exercises: Vec<Exercise>,
}

/// An exercise prescription within a workout day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise name (1-100 chars)
    pub name: String,
    /// Ordered set prescriptions (at least one)
    pub sets: Vec<ExerciseSet>,
    /// Optional coaching notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A single set prescription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    /// Repetitions (strictly positive)
    pub reps: u32,
    /// Load in kilograms, if prescribed (non-negative)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Rest after the set in seconds
    pub rest_seconds: u32,
    /// Reps in reserve intensity marker (0-5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rir: Option<u8>,
}

/// Provenance of a successful generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Identifier of the model that produced the plan
    pub model: String,
    /// Whether the fallback model was used after a primary failure
    pub fallback_used: bool,
}

/// Successful generation result returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPreview {
    /// The validated generated plan
    pub plan: AiPlanResponse,
    /// Which model produced it and how
    pub metadata: GenerationMetadata,
}

/// A single upcoming workout occurrence on the dashboard
///
/// Derived on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingWorkout {
    /// Plan the occurrence belongs to
    pub plan_id: Uuid,
    /// Plan display name
    pub plan_name: String,
    /// Workout day display name
    pub day_name: String,
    /// ISO calendar date (`YYYY-MM-DD`)
    pub date: String,
    /// True for exactly the first element of a non-empty result set
    pub is_next: bool,
}

/// Coarse user lifecycle state derived from the plan set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
    /// No plans exist for the user
    New,
    /// At least one pending future workout exists
    Active,
    /// Plans exist but every occurrence is past or done
    Completed,
}

/// Dashboard read-path response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The next (at most ten) pending workout occurrences
    pub upcoming_workouts: Vec<UpcomingWorkout>,
    /// User lifecycle state
    pub user_state: UserState,
}

/// A workout occurrence record inside a stored plan schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutOccurrence {
    /// Workout day name
    pub name: String,
    /// Whether the user marked this occurrence completed
    pub done: bool,
}

/// A persisted plan as read from the plan store
///
/// The schedule maps ISO calendar dates to occurrences. A `BTreeMap`
/// keeps per-plan iteration in date order; the fixed-width zero-padded
/// format makes lexicographic and chronological order coincide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPlan {
    /// Plan identifier
    pub id: Uuid,
    /// Plan display name
    pub name: String,
    /// Archived plans are invisible to the dashboard
    pub archived: bool,
    /// Date -> occurrence mapping
    pub schedule: BTreeMap<String, WorkoutOccurrence>,
}

/// Lifecycle event types recorded by the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Generation request admitted and validated
    AiGenerationRequested,
    /// Generation produced a valid plan
    AiGenerationCompleted,
    /// Generation failed at any stage after admission
    AiGenerationFailed,
}

impl AuditEventType {
    /// Wire name of the event type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AiGenerationRequested => "ai_generation_requested",
            Self::AiGenerationCompleted => "ai_generation_completed",
            Self::AiGenerationFailed => "ai_generation_failed",
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Acting user identifier
    pub actor: Uuid,
    /// Lifecycle event type
    pub event_type: AuditEventType,
    /// Event payload (preferences, model name, or error message)
    pub payload: serde_json::Value,
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserState::New).unwrap(), "\"new\"");
        assert_eq!(
            serde_json::to_string(&UserState::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_audit_event_type_wire_names() {
        assert_eq!(
            AuditEventType::AiGenerationRequested.as_str(),
            "ai_generation_requested"
        );
        assert_eq!(
            serde_json::to_string(&AuditEventType::AiGenerationFailed).unwrap(),
            "\"ai_generation_failed\""
        );
    }

    #[test]
    fn test_plan_response_round_trips_optional_fields() {
        let json = serde_json::json!({
            "name": "Base Block",
            "description": "Four week accumulation",
            "cycle_duration_weeks": 4,
            "schedule": [{
                "name": "Day A",
                "exercises": [{
                    "name": "Squat",
                    "sets": [{ "reps": 5, "rest_seconds": 180 }]
                }]
            }]
        });

        let plan: AiPlanResponse = serde_json::from_value(json).unwrap();
        assert_eq!(plan.schedule[0].exercises[0].sets[0].reps, 5);
        assert!(plan.schedule[0].exercises[0].sets[0].weight.is_none());
        assert!(plan.schedule[0].exercises[0].notes.is_none());
    }
}
