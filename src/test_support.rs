//! Fakes and fixtures shared by unit tests

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::{Config, ProviderConfig};
use crate::providers::{AnalysisSource, AssetSource, MarketSource, TransactionSource};
use crate::server::{AppState, Sources};
use crate::wallet::types::{
    AnalysisResult, Language, ProviderError, RiskLevel, Sentiment, TokenHolding, WhaleTransaction,
};

pub const WHALE: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
pub const OTHER_WHALE: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

/// Provider config pointing every upstream at `uri`, with no API keys
pub fn provider_config(uri: &str) -> ProviderConfig {
    ProviderConfig {
        helius_api_key: None,
        helius_rpc_url: uri.to_string(),
        helius_api_url: format!("{}/v0", uri),
        gemini_api_key: None,
        gemini_api_url: format!("{}/v1beta", uri),
        gemini_model: "gemini-test".to_string(),
        solana_rpc_url: uri.to_string(),
        coingecko_url: uri.to_string(),
        binance_url: uri.to_string(),
        solscan_url: uri.to_string(),
        solanafm_url: uri.to_string(),
        request_timeout: Duration::from_secs(5),
        ai_timeout: Duration::from_secs(5),
        market_lookup_timeout: Duration::from_secs(5),
        transaction_limit: 10,
    }
}

pub fn holding(symbol: &str, total: f64) -> TokenHolding {
    TokenHolding {
        mint: format!("{}-mint", symbol),
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        balance: 1_000.0,
        decimals: 6,
        price_per_token: Some(total / 1_000.0),
        total_price: Some(total),
        image_url: None,
        is_native: false,
        is_mock: false,
    }
}

pub fn transaction(signature: &str) -> WhaleTransaction {
    WhaleTransaction {
        signature: signature.to_string(),
        timestamp: 1_700_000_000,
        kind: "SWAP".to_string(),
        description: format!("swap {}", signature),
        source: "JUPITER".to_string(),
        fee: 0.000005,
        is_mock: false,
    }
}

pub fn analysis(summary: &str) -> AnalysisResult {
    AnalysisResult {
        sentiment: Sentiment::Bullish,
        summary: summary.to_string(),
        risk_level: RiskLevel::High,
        reasoning: "concentrated early entries".to_string(),
        is_fallback: false,
    }
}

/// Scripted responses: each call pops the next one, the last one repeats.
/// `None` means the call fails.
struct Script<T> {
    responses: Mutex<VecDeque<Option<T>>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    fn new(responses: Vec<Option<T>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn next(&self) -> Result<T, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock();
        let response = if responses.len() > 1 {
            responses.pop_front().flatten()
        } else {
            responses.front().cloned().flatten()
        };
        response.ok_or_else(|| ProviderError::InvalidResponse("scripted failure".to_string()))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub struct FakeAssets(Script<Vec<TokenHolding>>);

impl FakeAssets {
    pub fn new(responses: Vec<Option<Vec<TokenHolding>>>) -> Self {
        Self(Script::new(responses))
    }

    pub fn calls(&self) -> usize {
        self.0.calls()
    }
}

#[async_trait]
impl AssetSource for FakeAssets {
    async fn fetch_holdings(&self, _address: &str) -> Result<Vec<TokenHolding>, ProviderError> {
        self.0.next()
    }
}

pub struct FakeTransactions(Script<Vec<WhaleTransaction>>);

impl FakeTransactions {
    pub fn new(responses: Vec<Option<Vec<WhaleTransaction>>>) -> Self {
        Self(Script::new(responses))
    }

    pub fn calls(&self) -> usize {
        self.0.calls()
    }
}

#[async_trait]
impl TransactionSource for FakeTransactions {
    async fn fetch_transactions(
        &self,
        _address: &str,
        _limit: usize,
    ) -> Result<Vec<WhaleTransaction>, ProviderError> {
        self.0.next()
    }
}

pub struct FakeAnalysis(Script<AnalysisResult>);

impl FakeAnalysis {
    pub fn new(responses: Vec<Option<AnalysisResult>>) -> Self {
        Self(Script::new(responses))
    }

    pub fn calls(&self) -> usize {
        self.0.calls()
    }
}

#[async_trait]
impl AnalysisSource for FakeAnalysis {
    async fn analyze_holdings(
        &self,
        _address: &str,
        _holdings: &[TokenHolding],
        _lang: Language,
    ) -> Result<AnalysisResult, ProviderError> {
        self.0.next()
    }
}

/// Market source whose lookups can be made to hang past any timeout
pub struct FakeMarket {
    price: Script<f64>,
    tps: Script<f64>,
    delay: Duration,
}

impl FakeMarket {
    pub fn new(prices: Vec<Option<f64>>, tps: Vec<Option<f64>>) -> Self {
        Self {
            price: Script::new(prices),
            tps: Script::new(tps),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn price_calls(&self) -> usize {
        self.price.calls()
    }
}

#[async_trait]
impl MarketSource for FakeMarket {
    async fn sol_price(&self) -> Result<f64, ProviderError> {
        tokio::time::sleep(self.delay).await;
        self.price.next()
    }

    async fn network_tps(&self) -> Result<f64, ProviderError> {
        tokio::time::sleep(self.delay).await;
        self.tps.next()
    }
}

/// Router state wired to the given fakes with default TTLs
pub fn state_with(
    assets: Arc<dyn AssetSource>,
    transactions: Arc<dyn TransactionSource>,
    analysis: Arc<dyn AnalysisSource>,
    market: Arc<dyn MarketSource>,
) -> AppState {
    let config = Config::from_lookup(|_| None).expect("default config");
    AppState::with_sources(
        &config,
        Sources {
            assets,
            transactions,
            analysis,
            market,
        },
    )
}

/// Router state whose sources all succeed with small fixed data
pub fn test_state() -> AppState {
    state_with(
        Arc::new(FakeAssets::new(vec![Some(vec![holding("SOL", 1_500.0)])])),
        Arc::new(FakeTransactions::new(vec![Some(vec![transaction("sig-1")])])),
        Arc::new(FakeAnalysis::new(vec![Some(analysis("steady accumulation"))])),
        Arc::new(FakeMarket::new(vec![Some(150.0)], vec![Some(3000.0)])),
    )
}
