// ABOUTME: Shared helpers for integration tests
// ABOUTME: HTTP request builders and common fixtures

pub mod axum_test;
