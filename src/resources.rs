// ABOUTME: Centralized server resource container shared across HTTP handlers
// ABOUTME: Constructed once at startup and passed around as a single Arc
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Server Resources
//!
//! One container for every shared service. Handlers receive
//! `Arc<ServerResources>` as axum state instead of individual Arcs per
//! dependency, so adding a service does not ripple through signatures.

use std::sync::Arc;

use crate::audit::{AuditLogService, InMemoryAuditStore};
use crate::config::ServerConfig;
use crate::dashboard::DashboardService;
use crate::errors::AppResult;
use crate::llm::{OpenAiCompatibleProvider, StructuredCompletionClient};
use crate::plan_store::InMemoryPlanStore;
use crate::rate_limiting::SlidingWindowLimiter;
use crate::services::PlanGenerationService;

/// Shared resources for all server components
pub struct ServerResources {
    /// Loaded server configuration
    pub config: ServerConfig,
    /// Per-user sliding window limiter for generation requests
    pub rate_limiter: SlidingWindowLimiter,
    /// Plan generation pipeline
    pub plan_generation: PlanGenerationService<OpenAiCompatibleProvider, Arc<InMemoryAuditStore>>,
    /// Dashboard read service
    pub dashboard: DashboardService<Arc<InMemoryPlanStore>>,
    /// Audit event sink, also readable for inspection endpoints and tests
    pub audit_store: Arc<InMemoryAuditStore>,
    /// Plan storage backing the dashboard
    pub plan_store: Arc<InMemoryPlanStore>,
}

impl ServerResources {
    /// Wire up all services from a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM HTTP client cannot be constructed.
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let provider = OpenAiCompatibleProvider::new(config.llm.clone())?;
        let completion = StructuredCompletionClient::new(provider);

        let audit_store = Arc::new(InMemoryAuditStore::new());
        let plan_store = Arc::new(InMemoryPlanStore::new());

        Ok(Self {
            config,
            rate_limiter: SlidingWindowLimiter::new(),
            plan_generation: PlanGenerationService::new(
                completion,
                AuditLogService::new(Arc::clone(&audit_store)),
            ),
            dashboard: DashboardService::new(Arc::clone(&plan_store)),
            audit_store,
            plan_store,
        })
    }
}
