// Main entry point - Dependency injection, poll loop and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::application::chart_registry::ChartRegistry;
use crate::application::poll_loop::PollLoop;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::status_client::HttpStatusClient;
use crate::infrastructure::view_store::ViewStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_chart, get_dashboard, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Status source and renderer (infrastructure layer)
    let source = Arc::new(HttpStatusClient::new(
        &config.status_url,
        config.request_timeout(),
    )?);
    let views = ViewStore::new();

    // The registry is owned by the poll loop and never shared
    let registry = ChartRegistry::new(Arc::new(views.clone()));
    tracing::info!(
        "Polling {} every {:?}",
        source.status_url(),
        config.poll_interval()
    );
    let poll_loop = PollLoop::new(source, registry, config.poll_interval());
    tokio::spawn(poll_loop.run());

    let state = Arc::new(AppState { views });

    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/charts/:id", get(get_chart))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Starting bench-dashboard on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    axum::serve(listener, router).await?;

    Ok(())
}
