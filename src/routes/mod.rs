// ABOUTME: Route module organization for Planforge HTTP endpoints
// ABOUTME: Route definitions and thin handlers that delegate to service layers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! Route modules for the Planforge HTTP server
//!
//! Each domain module contains route definitions and thin handler
//! functions that delegate to the service layer. Handlers own transport
//! concerns only: identity extraction, status codes, and JSON envelopes.

/// Dashboard aggregation routes
pub mod dashboard;
/// Health check routes
pub mod health;
/// Plan generation routes
pub mod plans;

pub use dashboard::DashboardRoutes;
pub use health::HealthRoutes;
pub use plans::PlanRoutes;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::errors::AppError;

/// Extract the authenticated user id from the `x-user-id` header
///
/// Identity verification happens upstream; this layer only requires the
/// header to be present and a well-formed UUID.
///
/// # Errors
///
/// Returns `AuthInvalid` when the header is missing or not a UUID.
pub fn require_user_id(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::auth_invalid("Missing x-user-id header"))?;

    Uuid::parse_str(raw).map_err(|_| AppError::auth_invalid("Invalid x-user-id header"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_require_user_id_accepts_valid_uuid() {
        let mut headers = HeaderMap::new();
        let id = Uuid::new_v4();
        headers.insert("x-user-id", id.to_string().parse().unwrap());
        assert_eq!(require_user_id(&headers).unwrap(), id);
    }

    #[test]
    fn test_require_user_id_rejects_missing_header() {
        let headers = HeaderMap::new();
        let err = require_user_id(&headers).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthInvalid);
    }

    #[test]
    fn test_require_user_id_rejects_malformed_uuid() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "not-a-uuid".parse().unwrap());
        let err = require_user_id(&headers).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthInvalid);
    }
}
