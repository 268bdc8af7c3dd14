//! Web front end for simulated discussion threads.
//!
//! Run with: cargo run -p threadsim-server
//!
//! Then open http://127.0.0.1:8080 in your browser.

mod config;
mod pages;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use threadsim_generator::OpenAiGenerator;
use threadsim_session::SessionManager;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::parse();

    let generator = OpenAiGenerator::new(config.generator_config())
        .context("failed to build text generation client")?;
    let manager = Arc::new(
        SessionManager::new(Arc::new(generator)).with_streamer_config(config.streamer_config()),
    );

    let app = routes::app(manager)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(model = %config.model, "Server listening on http://{}", config.bind);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
