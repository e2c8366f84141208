//! # Providers Module
//!
//! HTTP clients for the upstream services, each behind a small trait so the
//! cache-aware fetchers can be driven by fakes in tests.
//!
//! - `helius`: token holdings (DAS `getAssetsByOwner`) and enhanced transactions
//! - `gemini`: wallet analysis via `generateContent`
//! - `market`: SOL price (CoinGecko, Binance) and network TPS

pub mod gemini;
pub mod helius;
pub mod market;

pub use gemini::GeminiClient;
pub use helius::HeliusClient;
pub use market::MarketDataClient;

use async_trait::async_trait;

use crate::wallet::types::{AnalysisResult, Language, ProviderError, TokenHolding, WhaleTransaction};

#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the normalized fungible holdings of `address`, sorted by value
    async fn fetch_holdings(&self, address: &str) -> Result<Vec<TokenHolding>, ProviderError>;
}

#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch up to `limit` recent transactions of `address`, newest first
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<WhaleTransaction>, ProviderError>;
}

#[async_trait]
pub trait AnalysisSource: Send + Sync {
    /// Ask the model for a verdict on `holdings`
    async fn analyze_holdings(
        &self,
        address: &str,
        holdings: &[TokenHolding],
        lang: Language,
    ) -> Result<AnalysisResult, ProviderError>;
}

#[async_trait]
pub trait MarketSource: Send + Sync {
    /// SOL/USD spot price
    async fn sol_price(&self) -> Result<f64, ProviderError>;

    /// Recent network transactions per second
    async fn network_tps(&self) -> Result<f64, ProviderError>;
}
