// ABOUTME: Main library entry point for the Planforge training plan API
// ABOUTME: Provides AI plan generation and workout dashboard aggregation over REST
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

#![deny(unsafe_code)]

//! # Planforge
//!
//! An API server for AI-assisted training plan generation and workout
//! dashboards. Users submit training preferences; the server validates
//! them, enforces a per-user hourly quota, asks an LLM for a structured
//! plan with one bounded fallback retry, re-validates the result, and
//! returns an ephemeral plan preview. A separate read path aggregates
//! the user's active plans into an upcoming workout dashboard.
//!
//! ## Architecture
//!
//! - **Routes**: Thin axum handlers owning transport concerns only
//! - **Services**: The generation pipeline and its audit trail
//! - **Dashboard**: Pure aggregation over a plan store snapshot
//! - **LLM**: OpenAI-compatible provider with schema-constrained output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use planforge::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Planforge configured with HTTP port: {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Audit trail for generation lifecycle events
pub mod audit;
/// Environment-based server configuration
pub mod config;
/// Service constants and environment variable keys
pub mod constants;
/// Dashboard aggregation engine
pub mod dashboard;
/// Error types and HTTP error responses
pub mod errors;
/// LLM provider abstraction and structured completion
pub mod llm;
/// Logging setup
pub mod logging;
/// Domain data structures
pub mod models;
/// Plan storage abstraction
pub mod plan_store;
/// Per-user sliding-window rate limiting
pub mod rate_limiting;
/// Shared server resource container
pub mod resources;
/// HTTP route definitions and handlers
pub mod routes;
/// Business workflow services
pub mod services;
/// Preference and plan validation
pub mod validation;
