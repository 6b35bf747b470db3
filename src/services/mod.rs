// ABOUTME: Service layer orchestrating business workflows above the transport
// ABOUTME: Transport handlers call services; services never touch HTTP types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Service Layer
//!
//! Protocol-agnostic orchestration. Handlers translate transport concerns
//! into service calls and service results back into responses.

pub mod plan_generation;

pub use plan_generation::PlanGenerationService;
