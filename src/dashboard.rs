// ABOUTME: Dashboard aggregation engine producing the upcoming workout list
// ABOUTME: Filters, sorts, and ranks pending occurrences across a user's active plans
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Dashboard Aggregation Engine
//!
//! Synchronous read path with no AI dependency. Reads all non-archived
//! plans for a user, extracts future, not-yet-completed workout
//! occurrences, sorts them, marks the first as next, and truncates the
//! result for rendering cost. Operates on a read-only snapshot per call;
//! no shared mutable state.

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{DashboardSummary, StoredPlan, UpcomingWorkout, UserState};
use crate::plan_store::PlanStore;

/// Maximum upcoming workouts returned per summary
///
/// Bounds response size and UI rendering cost, not correctness.
pub const MAX_UPCOMING_WORKOUTS: usize = 10;

/// Dashboard read service over a [`PlanStore`]
pub struct DashboardService<S> {
    plan_store: S,
}

impl<S: PlanStore> DashboardService<S> {
    /// Create a dashboard service over the given store
    pub const fn new(plan_store: S) -> Self {
        Self { plan_store }
    }

    /// Aggregate the user's upcoming workouts and lifecycle state
    ///
    /// "Today" is computed once per call from the wall-clock date, so a
    /// single consistent cutoff applies across every plan in the pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan store read fails.
    pub async fn dashboard_summary(&self, user_id: Uuid) -> AppResult<DashboardSummary> {
        tracing::debug!(user_id = %user_id, "Dashboard summary request received");

        let plans = self.plan_store.get_active_plans(user_id).await?;
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();

        Ok(summarize(&plans, &today))
    }
}

/// Pure aggregation over a plan snapshot and a fixed cutoff date
///
/// The cutoff comparison is string-based: ISO `YYYY-MM-DD` is fixed-width
/// and zero-padded, so lexicographic order equals chronological order.
#[must_use]
pub fn summarize(plans: &[StoredPlan], today: &str) -> DashboardSummary {
    if plans.is_empty() {
        return DashboardSummary {
            upcoming_workouts: Vec::new(),
            user_state: UserState::New,
        };
    }

    let mut upcoming: Vec<UpcomingWorkout> = plans
        .iter()
        .flat_map(|plan| {
            plan.schedule
                .iter()
                .filter(|(date, occurrence)| date.as_str() >= today && !occurrence.done)
                .map(|(date, occurrence)| UpcomingWorkout {
                    plan_id: plan.id,
                    plan_name: plan.name.clone(),
                    day_name: occurrence.name.clone(),
                    date: date.clone(),
                    is_next: false,
                })
        })
        .collect();

    // Plan id as secondary key keeps same-date ordering deterministic
    // regardless of store iteration order
    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then(a.plan_id.cmp(&b.plan_id)));
    upcoming.truncate(MAX_UPCOMING_WORKOUTS);

    let user_state = if upcoming.is_empty() {
        UserState::Completed
    } else {
        UserState::Active
    };

    if let Some(first) = upcoming.first_mut() {
        first.is_next = true;
    }

    DashboardSummary {
        upcoming_workouts: upcoming,
        user_state,
    }
}
