// ABOUTME: Per-user sliding-window rate limiting for the plan generation endpoint
// ABOUTME: Guards the expensive LLM call with an in-process request quota
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Sliding-Window Rate Limiter
//!
//! Admission control for generation requests. Each user gets a rolling
//! one-hour window of request timestamps; a request is admitted only while
//! fewer than ten timestamps survive in the window. A sliding window (not
//! a fixed bucket) avoids burst-at-boundary abuse; pruning is lazy since
//! windows are small and per-user.
//!
//! State is volatile process memory: a restart resets all counters. That
//! is acceptable for a single-instance deployment and must be migrated to
//! shared external storage before scaling horizontally.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Rolling window length in seconds
pub const WINDOW_SECS: i64 = 3600;

/// Maximum admitted requests per window
pub const MAX_REQUESTS_PER_WINDOW: u32 = 10;

/// Outcome of an admitted rate-limit check
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitDecision {
    /// Requests remaining in the current window after this one
    pub remaining: u32,
    /// When the oldest surviving entry ages out of the window
    pub reset_at: DateTime<Utc>,
}

/// Per-user sliding-window request limiter
///
/// The map is keyed by user id; the `DashMap` entry guard makes the
/// prune-check-record sequence atomic per key, so two concurrent requests
/// for the same user cannot both be admitted one-over-limit.
pub struct SlidingWindowLimiter {
    windows: DashMap<Uuid, Vec<DateTime<Utc>>>,
    window: Duration,
    max_requests: u32,
}

impl SlidingWindowLimiter {
    /// Create a limiter with the fixed production window and quota
    #[must_use]
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
            window: Duration::seconds(WINDOW_SECS),
            max_requests: MAX_REQUESTS_PER_WINDOW,
        }
    }

    /// Check the user's quota and record the request if admitted
    ///
    /// Prunes entries older than the window, rejects without recording
    /// when the surviving count has reached the quota, and otherwise
    /// appends the current timestamp. The whole sequence runs under the
    /// per-key entry guard.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] with `RateLimitExceeded` when the quota is
    /// exhausted; the error details carry the limit and reset time.
    pub fn check_and_record(&self, user_id: Uuid) -> AppResult<RateLimitDecision> {
        self.check_and_record_at(user_id, Utc::now())
    }

    fn check_and_record_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<RateLimitDecision> {
        let cutoff = now - self.window;
        let mut entry = self.windows.entry(user_id).or_default();

        entry.retain(|ts| *ts > cutoff);

        if entry.len() as u32 >= self.max_requests {
            let reset_at = entry
                .first()
                .map_or(now + self.window, |oldest| *oldest + self.window);
            tracing::debug!(
                user_id = %user_id,
                in_window = entry.len(),
                "Generation request rejected by rate limiter"
            );
            return Err(AppError::rate_limit_exceeded(self.max_requests, reset_at));
        }

        entry.push(now);

        let reset_at = entry
            .first()
            .map_or(now + self.window, |oldest| *oldest + self.window);

        Ok(RateLimitDecision {
            remaining: self.max_requests - entry.len() as u32,
            reset_at,
        })
    }

    /// Number of users currently tracked (for diagnostics)
    #[must_use]
    pub fn tracked_users(&self) -> usize {
        self.windows.len()
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}
