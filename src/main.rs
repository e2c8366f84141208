//! # Whale Watch Server
//!
//! HTTP API behind a Solana whale-tracking dashboard, built with Rust, Axum
//! and Tokio. Token holdings and recent transactions come from Helius, wallet
//! verdicts from Gemini, and every upstream call sits behind one in-process
//! TTL cache.
//!
//! ## Architecture
//! - `cache`: the shared TTL cache, its key scheme and the expiry sweeper
//! - `providers`: HTTP clients for Helius, Gemini and the market data APIs
//! - `services`: cache-aware fetchers and the wallet data orchestrator
//! - `routes`: HTTP route handlers organized by functionality
//! - `server`: state wiring, CORS and the listener
//! - `config`: environment variable configuration
//!
//! ## Environment Setup
//! Copy `.env.example` to `.env` and set `HELIUS_API_KEY` and
//! `GEMINI_API_KEY`. Without them the server still runs and serves demo data.
//!
//! ## Health Check
//! ```bash
//! curl http://localhost:3000/ping
//! ```

mod cache;
mod config;
mod providers;
mod routes;
mod server;
mod services;
mod state_structs;
mod wallet;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!("🏁 Starting Whale Watch Server...");
    tracing::info!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;
    for warning in config.cache.ttl_ordering_warnings() {
        tracing::warn!("[Cache] {}", warning);
    }

    server::start(config).await
}
