//! Command line and environment configuration.

use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use threadsim_core::StreamerConfig;
use threadsim_generator::OpenAiConfig;

/// Simulated discussion threads over a web UI.
#[derive(Debug, Clone, Parser)]
#[command(name = "threadsim-server", version, about)]
pub struct Config {
    /// API key for the text generation provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model used for every generation call
    #[arg(long, env = "THREADSIM_MODEL", default_value = threadsim_generator::openai::DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the chat completions API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = threadsim_generator::openai::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Address to listen on
    #[arg(long, env = "THREADSIM_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Observer poll interval in milliseconds
    #[arg(long, env = "THREADSIM_POLL_INTERVAL_MS", default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// Timeout for a single provider request in seconds
    #[arg(long, env = "THREADSIM_REQUEST_TIMEOUT_SECS", default_value_t = 120)]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn generator_config(&self) -> OpenAiConfig {
        OpenAiConfig::new(self.api_key.clone())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    pub const fn streamer_config(&self) -> StreamerConfig {
        StreamerConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}
