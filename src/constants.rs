// ABOUTME: System-wide constants and environment variable keys for Planforge
// ABOUTME: Single place for service identity, defaults, and env key names
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Constants Module
//!
//! Service identity, network defaults, and the environment variable keys
//! the configuration layer reads. Keeping key names here prevents drift
//! between the config loader and the provider constructors.

/// Service name used in logs and the health endpoint
pub const SERVICE_NAME: &str = "planforge-server";

/// Network-related defaults
pub mod defaults {
    /// Default HTTP port when `PLANFORGE_HTTP_PORT` is unset
    pub const HTTP_PORT: u16 = 8080;

    /// Default outer request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 150;
}

/// Environment variable key names
pub mod env_keys {
    /// HTTP listen port override
    pub const HTTP_PORT: &str = "PLANFORGE_HTTP_PORT";

    /// Outer request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "PLANFORGE_REQUEST_TIMEOUT_SECS";

    /// Base URL of the OpenAI-compatible completion endpoint
    pub const LLM_BASE_URL: &str = "PLANFORGE_LLM_BASE_URL";

    /// Primary model identifier
    pub const LLM_MODEL: &str = "PLANFORGE_LLM_MODEL";

    /// Fallback model identifier, tried once after a failed primary attempt
    pub const LLM_FALLBACK_MODEL: &str = "PLANFORGE_LLM_FALLBACK_MODEL";

    /// Bearer token for the completion endpoint
    pub const LLM_API_KEY: &str = "PLANFORGE_LLM_API_KEY";

    /// Log format selector (json, pretty, compact)
    pub const LOG_FORMAT: &str = "PLANFORGE_LOG_FORMAT";
}
