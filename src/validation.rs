// ABOUTME: Input validation for generation preferences and LLM-produced plans
// ABOUTME: Enumerates every field violation instead of failing on the first
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Request and Plan Validation
//!
//! Two validators guard the generation pipeline. The preference validator
//! runs against the raw, untyped request payload and rejects malformed
//! requests before any expensive work. The plan schema validator re-checks
//! the LLM's structured output against the semantic bounds serde cannot
//! express (lengths, positivity, non-empty sequences) as a defense against
//! syntactically valid but semantically malformed model output.

use serde::Serialize;
use serde_json::Value;

use crate::models::{
    AiPlanResponse, UserPreferences, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_NOTES_LEN,
};

/// A single field-level validation violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field
    pub field: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl FieldViolation {
    /// Create a violation for a field
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Serialize a violation list into the error `details` payload
#[must_use]
pub fn violations_to_details(violations: &[FieldViolation]) -> Value {
    serde_json::json!({ "violations": violations })
}

/// Validate a raw preferences payload into [`UserPreferences`]
///
/// Enumerates every violation rather than short-circuiting on the first,
/// so a client can fix a whole form in one round trip. Performs no side
/// effects.
///
/// # Errors
///
/// Returns the non-empty violation list when any field is missing, of the
/// wrong type, or out of bounds.
pub fn validate_preferences(payload: &Value) -> Result<UserPreferences, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let Some(obj) = payload.as_object() else {
        return Err(vec![FieldViolation::new(
            "preferences",
            "must be a JSON object",
        )]);
    };

    let goal = require_non_empty_string(obj.get("goal"), "goal", &mut violations);
    let system = require_non_empty_string(obj.get("system"), "system", &mut violations);
    let available_days = validate_available_days(obj.get("available_days"), &mut violations);
    let session_duration_minutes = require_positive_u32(
        obj.get("session_duration_minutes"),
        "session_duration_minutes",
        &mut violations,
    );
    let cycle_duration_weeks = require_positive_u32(
        obj.get("cycle_duration_weeks"),
        "cycle_duration_weeks",
        &mut violations,
    );
    let notes = validate_notes(obj.get("notes"), "notes", &mut violations);

    if violations.is_empty() {
        // All accessors returned Some when no violation was recorded
        match (
            goal,
            system,
            available_days,
            session_duration_minutes,
            cycle_duration_weeks,
        ) {
            (Some(goal), Some(system), Some(available_days), Some(session), Some(cycle)) => {
                Ok(UserPreferences {
                    goal,
                    system,
                    available_days,
                    session_duration_minutes: session,
                    cycle_duration_weeks: cycle,
                    notes,
                })
            }
            _ => Err(vec![FieldViolation::new(
                "preferences",
                "payload could not be assembled",
            )]),
        }
    } else {
        Err(violations)
    }
}

fn require_non_empty_string(
    value: Option<&Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::String(_)) => {
            violations.push(FieldViolation::new(field, "must not be empty"));
            None
        }
        Some(_) => {
            violations.push(FieldViolation::new(field, "must be a string"));
            None
        }
        None => {
            violations.push(FieldViolation::new(field, "is required"));
            None
        }
    }
}

fn require_positive_u32(
    value: Option<&Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<u32> {
    match value {
        Some(v) => match v.as_u64() {
            Some(n) if n > 0 && n <= u64::from(u32::MAX) => Some(n as u32),
            Some(0) => {
                violations.push(FieldViolation::new(field, "must be strictly positive"));
                None
            }
            _ => {
                violations.push(FieldViolation::new(field, "must be a positive integer"));
                None
            }
        },
        None => {
            violations.push(FieldViolation::new(field, "is required"));
            None
        }
    }
}

fn validate_available_days(
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<Vec<String>> {
    let field = "available_days";
    match value {
        Some(Value::Array(items)) => {
            if items.is_empty() {
                violations.push(FieldViolation::new(field, "must contain at least one day"));
                return None;
            }
            let mut days = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(day) if !day.trim().is_empty() => {
                        // Duplicate day identifiers collapse silently
                        if !days.iter().any(|d: &String| d == day) {
                            days.push(day.to_owned());
                        }
                    }
                    _ => {
                        violations.push(FieldViolation::new(
                            format!("{field}[{i}]"),
                            "must be a non-empty string",
                        ));
                    }
                }
            }
            if days.is_empty() {
                None
            } else {
                Some(days)
            }
        }
        Some(_) => {
            violations.push(FieldViolation::new(field, "must be an array of day names"));
            None
        }
        None => {
            violations.push(FieldViolation::new(field, "is required"));
            None
        }
    }
}

fn validate_notes(
    value: Option<&Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            if s.chars().count() > MAX_NOTES_LEN {
                violations.push(FieldViolation::new(
                    field,
                    format!("must be at most {MAX_NOTES_LEN} characters"),
                ));
                None
            } else {
                Some(s.clone())
            }
        }
        Some(_) => {
            violations.push(FieldViolation::new(field, "must be a string"));
            None
        }
    }
}

/// Re-validate a deserialized plan against the full plan schema
///
/// Runs after the structured completion client has already produced a
/// well-typed [`AiPlanResponse`]; this pass enforces the bounds the type
/// system does not carry. A violation here is treated by the planner
/// exactly like a completion failure.
///
/// # Errors
///
/// Returns the non-empty violation list when any bound is broken.
pub fn validate_plan(plan: &AiPlanResponse) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    check_name(&plan.name, "name", &mut violations);
    check_bounded_text(
        &plan.description,
        "description",
        MAX_DESCRIPTION_LEN,
        &mut violations,
    );
    if plan.cycle_duration_weeks == 0 {
        violations.push(FieldViolation::new(
            "cycle_duration_weeks",
            "must be strictly positive",
        ));
    }
    if plan.schedule.is_empty() {
        violations.push(FieldViolation::new(
            "schedule",
            "must contain at least one workout day",
        ));
    }

    for (d, day) in plan.schedule.iter().enumerate() {
        let day_path = format!("schedule[{d}]");
        check_name(&day.name, &format!("{day_path}.name"), &mut violations);
        if day.exercises.is_empty() {
            violations.push(FieldViolation::new(
                format!("{day_path}.exercises"),
                "must contain at least one exercise",
            ));
        }
        for (e, exercise) in day.exercises.iter().enumerate() {
            let ex_path = format!("{day_path}.exercises[{e}]");
            check_name(&exercise.name, &format!("{ex_path}.name"), &mut violations);
            if let Some(notes) = &exercise.notes {
                check_bounded_text(
                    notes,
                    &format!("{ex_path}.notes"),
                    MAX_NOTES_LEN,
                    &mut violations,
                );
            }
            if exercise.sets.is_empty() {
                violations.push(FieldViolation::new(
                    format!("{ex_path}.sets"),
                    "must contain at least one set",
                ));
            }
            for (s, set) in exercise.sets.iter().enumerate() {
                let set_path = format!("{ex_path}.sets[{s}]");
                if set.reps == 0 {
                    violations.push(FieldViolation::new(
                        format!("{set_path}.reps"),
                        "must be strictly positive",
                    ));
                }
                if let Some(weight) = set.weight {
                    if weight < 0.0 || !weight.is_finite() {
                        violations.push(FieldViolation::new(
                            format!("{set_path}.weight"),
                            "must be a non-negative number",
                        ));
                    }
                }
                if let Some(rir) = set.rir {
                    if rir > 5 {
                        violations.push(FieldViolation::new(
                            format!("{set_path}.rir"),
                            "must be between 0 and 5",
                        ));
                    }
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_name(value: &str, field: &str, violations: &mut Vec<FieldViolation>) {
    check_bounded_text(value, field, MAX_NAME_LEN, violations);
}

fn check_bounded_text(value: &str, field: &str, max: usize, violations: &mut Vec<FieldViolation>) {
    let len = value.chars().count();
    if len == 0 {
        violations.push(FieldViolation::new(field, "must not be empty"));
    } else if len > max {
        violations.push(FieldViolation::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}
