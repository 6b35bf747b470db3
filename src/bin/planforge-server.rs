// ABOUTME: Planforge HTTP server binary
// ABOUTME: Wires configuration, logging, services, and the axum router together
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Planforge

//! # Planforge Server Binary
//!
//! Starts the HTTP API for plan generation and the workout dashboard.

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use planforge::{
    config::ServerConfig,
    logging,
    resources::ServerResources,
    routes::{DashboardRoutes, HealthRoutes, PlanRoutes},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

#[derive(Parser)]
#[command(name = "planforge-server")]
#[command(about = "Planforge - AI-assisted training plan generation API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Planforge Server");
    info!("{}", config.summary());

    let http_port = config.http_port;
    let request_timeout = config.request_timeout;
    let resources = Arc::new(ServerResources::new(config)?);

    let app = Router::new()
        .merge(HealthRoutes::routes())
        .merge(PlanRoutes::routes(Arc::clone(&resources)))
        .merge(DashboardRoutes::routes(Arc::clone(&resources)))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Planforge Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown signal handler: {e}");
        // Without a signal handler the server would be unkillable; run
        // until the process is terminated externally instead
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
