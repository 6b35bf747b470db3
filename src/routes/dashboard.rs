// ABOUTME: Dashboard route handlers for the workout read path
// ABOUTME: REST endpoint returning the aggregated upcoming workout summary
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! Dashboard routes
//!
//! Read-only. The dashboard never touches the rate limiter or the AI
//! path; it is safe to poll.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Dashboard routes
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create all dashboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/dashboard", get(Self::handle_summary))
            .with_state(resources)
    }

    /// Handle a dashboard summary request
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = super::require_user_id(&headers)?;

        let summary = resources.dashboard.dashboard_summary(user_id).await?;

        Ok((StatusCode::OK, Json(summary)).into_response())
    }
}
