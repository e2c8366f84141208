//! # Server Module
//!
//! HTTP server setup and route configuration for the whale watch server.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::cache::{TtlCache, spawn_sweeper};
use crate::config::Config;
use crate::providers::{
    AnalysisSource, AssetSource, GeminiClient, HeliusClient, MarketDataClient, MarketSource,
    TransactionSource,
};
use crate::routes;
use crate::services::{
    HoldingsFetcher, MarketStatsService, TransactionFetcher, WalletAnalyzer, WalletDataOrchestrator,
};

/// Upstream data sources the services are built on
pub struct Sources {
    pub assets: Arc<dyn AssetSource>,
    pub transactions: Arc<dyn TransactionSource>,
    pub analysis: Arc<dyn AnalysisSource>,
    pub market: Arc<dyn MarketSource>,
}

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<TtlCache>,
    pub orchestrator: Arc<WalletDataOrchestrator>,
    pub market: Arc<MarketStatsService>,
}

impl AppState {
    /// Build the production HTTP clients and wire them to one shared cache
    pub fn from_config(config: &Config) -> Result<Self> {
        let helius = HeliusClient::new(&config.providers).context("Failed to build Helius client")?;
        let helius = Arc::new(helius);
        let gemini =
            GeminiClient::new(&config.providers).context("Failed to build Gemini client")?;
        let market = MarketDataClient::new(&config.providers)
            .context("Failed to build market data client")?;

        if config.providers.helius_api_key.is_none() {
            warn!("HELIUS_API_KEY not set, holdings and transactions will use demo data");
        }
        if config.providers.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set, AI analysis will be unavailable");
        }

        let sources = Sources {
            assets: helius.clone(),
            transactions: helius,
            analysis: Arc::new(gemini),
            market: Arc::new(market),
        };
        Ok(Self::with_sources(config, sources))
    }

    pub fn with_sources(config: &Config, sources: Sources) -> Self {
        let ttl = &config.cache;
        let cache = Arc::new(TtlCache::with_capacity_limit(ttl.max_entries));

        let orchestrator = WalletDataOrchestrator::new(
            cache.clone(),
            HoldingsFetcher::new(cache.clone(), sources.assets, ttl.holdings_ttl),
            TransactionFetcher::new(
                cache.clone(),
                sources.transactions,
                ttl.transactions_ttl,
                config.providers.transaction_limit,
            ),
            WalletAnalyzer::new(cache.clone(), sources.analysis, ttl.analysis_ttl),
            ttl.wallet_ttl,
        );

        let market = MarketStatsService::new(
            cache.clone(),
            sources.market,
            ttl.market_stats_ttl,
            config.providers.market_lookup_timeout,
        );

        Self {
            cache,
            orchestrator: Arc::new(orchestrator),
            market: Arc::new(market),
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
}

/// Main app router with every route module merged in
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(routes::health::create_routes())
        .merge(routes::wallet::create_routes())
        .merge(routes::market::create_routes())
        .layer(ServiceBuilder::new().layer(cors_layer(allowed_origins)))
        .with_state(state)
}

/// Starts the whale watch HTTP server and the cache sweeper.
///
/// Runs until the listener fails or the process is terminated.
pub async fn start(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    // A zero interval disables the sweeper; expired entries still vanish on read
    if !config.cache.sweep_interval.is_zero() {
        spawn_sweeper(state.cache.clone(), config.cache.sweep_interval);
    }

    let app = create_router(state, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    info!("🐋 Whale Watch Server starting...");
    info!("📡 Listening on http://{}", addr);
    info!("🏥 Health check available at http://{}/ping", addr);
    info!("👛 Wallet endpoints available at http://{}/api/v1/wallet/*", addr);
    info!(
        "🗄️  Cache TTLs: holdings {:?}, wallet {:?}, analysis {:?}, transactions {:?}",
        config.cache.holdings_ttl,
        config.cache.wallet_ttl,
        config.cache.analysis_ttl,
        config.cache.transactions_ttl
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
