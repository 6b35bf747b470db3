// ABOUTME: Plan generation route handlers for the AI write path
// ABOUTME: Runs identity, rate limit, and validation gates before the generation service
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! Plan generation routes
//!
//! The gates run in a fixed order: identity, then rate limit, then
//! preference validation. The limiter runs before validation so invalid
//! requests still consume quota; only admitted requests reach the model.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::validation::{validate_preferences, violations_to_details};

/// Plan generation routes
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/plans/generate", post(Self::handle_generate))
            .with_state(resources)
    }

    /// Handle a plan generation request
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> Result<Response, AppError> {
        let user_id = super::require_user_id(&headers)?;

        resources.rate_limiter.check_and_record(user_id)?;

        // Missing "preferences" key indexes to Null, which the validator rejects
        let preferences = validate_preferences(&body["preferences"])
            .map_err(|violations| AppError::validation_failed(violations_to_details(&violations)))?;

        let preview = resources
            .plan_generation
            .generate_plan_preview(user_id, &preferences)
            .await?;

        Ok((StatusCode::OK, Json(preview)).into_response())
    }
}
