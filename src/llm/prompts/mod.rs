// ABOUTME: System prompt and prompt rendering for training plan generation
// ABOUTME: Loads the plan generation system prompt at compile time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planforge

//! # Generation Prompts
//!
//! The system prompt is loaded at compile time from a markdown file for
//! easy maintenance; the user prompt is rendered from the validated
//! preferences.

use crate::models::UserPreferences;

/// Plan generation system prompt
///
/// Instructs the model on its coaching role, the structural constraints
/// of the output, and programming guidelines.
pub const PLAN_SYSTEM_PROMPT: &str = include_str!("plan_system.md");

/// Get the system prompt for plan generation
#[must_use]
pub const fn get_plan_system_prompt() -> &'static str {
    PLAN_SYSTEM_PROMPT
}

/// Render the user prompt from validated preferences
#[must_use]
pub fn render_plan_prompt(preferences: &UserPreferences) -> String {
    let mut prompt = format!(
        "Create a training plan with the following requirements:\n\
         - Goal: {}\n\
         - Training methodology: {}\n\
         - Available days: {}\n\
         - Session duration: {} minutes\n\
         - Cycle length: {} weeks\n",
        preferences.goal,
        preferences.system,
        preferences.available_days.join(", "),
        preferences.session_duration_minutes,
        preferences.cycle_duration_weeks,
    );

    if let Some(notes) = &preferences.notes {
        prompt.push_str(&format!("- Additional notes: {notes}\n"));
    }

    prompt.push_str(
        "\nThe schedule must contain one workout day per available day, \
         each with concrete exercises, sets, reps, rest periods, and RIR targets.",
    );

    prompt
}
