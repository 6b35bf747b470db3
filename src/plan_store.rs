// ABOUTME: Read-only plan store collaborator interface for the dashboard engine
// ABOUTME: Provides the PlanStore trait and an in-memory backend for tests and dev
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Plan Store
//!
//! The dashboard aggregator reads persisted plans through this trait.
//! Plan CRUD itself lives outside this core; the store is a read-only
//! collaborator, and this core never writes plan records.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::StoredPlan;

/// Read interface over persisted training plans
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// All non-archived plans for a user
    async fn get_active_plans(&self, user_id: Uuid) -> AppResult<Vec<StoredPlan>>;
}

/// In-memory plan store for tests and development
#[derive(Default)]
pub struct InMemoryPlanStore {
    plans: RwLock<HashMap<Uuid, Vec<StoredPlan>>>,
}

impl InMemoryPlanStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a plan for a user (test/dev helper)
    pub async fn insert_plan(&self, user_id: Uuid, plan: StoredPlan) {
        self.plans.write().await.entry(user_id).or_default().push(plan);
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn get_active_plans(&self, user_id: Uuid) -> AppResult<Vec<StoredPlan>> {
        let plans = self.plans.read().await;
        Ok(plans
            .get(&user_id)
            .map(|user_plans| {
                user_plans
                    .iter()
                    .filter(|p| !p.archived)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl<T: PlanStore + ?Sized> PlanStore for std::sync::Arc<T> {
    async fn get_active_plans(&self, user_id: Uuid) -> AppResult<Vec<StoredPlan>> {
        self.as_ref().get_active_plans(user_id).await
    }
}
