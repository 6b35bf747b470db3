// ABOUTME: Environment-based server configuration for Planforge
// ABOUTME: Loads ports, timeouts, and LLM endpoint settings from process environment
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Configuration Module
//!
//! All configuration comes from environment variables, loaded once at
//! startup. A `.env` file is honored when present. The loaded config is
//! immutable for the process lifetime.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::constants::{defaults, env_keys};
use crate::llm::OpenAiCompatibleConfig;

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Outer per-request timeout applied by the HTTP layer
    pub request_timeout: Duration,
    /// Completion endpoint settings
    pub llm: OpenAiCompatibleConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable fails to parse. Unset
    /// variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        let http_port = match env::var(env_keys::HTTP_PORT) {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid {} value", env_keys::HTTP_PORT))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let timeout_secs = match env::var(env_keys::REQUEST_TIMEOUT_SECS) {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid {} value", env_keys::REQUEST_TIMEOUT_SECS))?,
            Err(_) => defaults::REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            http_port,
            request_timeout: Duration::from_secs(timeout_secs),
            llm: OpenAiCompatibleConfig::from_env(),
        })
    }

    /// Configuration summary for startup logging, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Planforge Server Configuration:\n\
             - HTTP Port: {}\n\
             - Request Timeout: {}s\n\
             - LLM Base URL: {}\n\
             - LLM Model: {} (fallback: {})\n\
             - LLM API Key: {}",
            self.http_port,
            self.request_timeout.as_secs(),
            self.llm.base_url,
            self.llm.default_model,
            self.llm.fallback_model,
            if self.llm.api_key.is_some() {
                "Configured"
            } else {
                "Not set"
            },
        )
    }
}
