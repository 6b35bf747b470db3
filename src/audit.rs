// ABOUTME: Best-effort audit logging for generation lifecycle events
// ABOUTME: Defines the AuditStore trait and a swallow-on-failure logging service
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Audit Log Service
//!
//! Records lifecycle events (requested / completed / failed) for every
//! generation attempt. From the pipeline's perspective a write is
//! fire-and-forget: a store failure is logged to operational output and
//! swallowed, never masking or replacing the pipeline's own result.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{AuditEvent, AuditEventType};

/// Append-only audit storage collaborator
///
/// This core never reads audit records back; a store only needs to
/// accept them.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist one audit event
    async fn record(&self, event: AuditEvent) -> AppResult<()>;
}

/// Best-effort audit writer over an [`AuditStore`]
pub struct AuditLogService<S> {
    store: S,
}

impl<S: AuditStore> AuditLogService<S> {
    /// Wrap a store with swallow-on-failure semantics
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a lifecycle event without propagating store failures
    ///
    /// The timestamp is taken at call time. A failed write emits a
    /// `tracing::warn!` and nothing else; the caller's control flow is
    /// never affected.
    pub async fn log_event(
        &self,
        actor: Uuid,
        event_type: AuditEventType,
        payload: serde_json::Value,
    ) {
        let event = AuditEvent {
            actor,
            event_type,
            payload,
            timestamp: Utc::now(),
        };

        if let Err(e) = self.store.record(event).await {
            tracing::warn!(
                actor = %actor,
                event_type = event_type.as_str(),
                "Audit log write failed: {e}"
            );
        }
    }
}

/// In-memory audit store for tests and development
#[derive(Default)]
pub struct InMemoryAuditStore {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in record order
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }

    /// Count events of one type for one actor
    pub async fn count(&self, actor: Uuid, event_type: AuditEventType) -> usize {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.actor == actor && e.event_type == event_type)
            .count()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.events.write().await.push(event);
        Ok(())
    }
}

#[async_trait]
impl<T: AuditStore + ?Sized> AuditStore for std::sync::Arc<T> {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.as_ref().record(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::sync::Arc;

    /// Store that always fails, for verifying swallow semantics
    struct BrokenStore;

    #[async_trait]
    impl AuditStore for BrokenStore {
        async fn record(&self, _event: AuditEvent) -> AppResult<()> {
            Err(AppError::internal("audit store offline"))
        }
    }

    #[tokio::test]
    async fn test_events_are_recorded_in_order() {
        let store = Arc::new(InMemoryAuditStore::new());
        let service = AuditLogService::new(Arc::clone(&store));
        let actor = Uuid::new_v4();

        service
            .log_event(
                actor,
                AuditEventType::AiGenerationRequested,
                serde_json::json!({"goal": "strength"}),
            )
            .await;
        service
            .log_event(
                actor,
                AuditEventType::AiGenerationCompleted,
                serde_json::json!({"model": "gpt-4o-mini"}),
            )
            .await;

        let events = store.events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, AuditEventType::AiGenerationRequested);
        assert_eq!(events[1].event_type, AuditEventType::AiGenerationCompleted);
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let service = AuditLogService::new(BrokenStore);

        // Must not panic or propagate
        service
            .log_event(
                Uuid::new_v4(),
                AuditEventType::AiGenerationFailed,
                serde_json::json!({"error": "provider outage"}),
            )
            .await;
    }
}
