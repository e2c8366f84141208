use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::warn;

use crate::config::ProviderConfig;
use crate::providers::MarketSource;
use crate::wallet::types::ProviderError;

/// SOL price from CoinGecko with Binance as backup. TPS comes from Solscan,
/// then Solana RPC performance samples, then SolanaFM.
pub struct MarketDataClient {
    client: Client,
    coingecko_url: String,
    binance_url: String,
    solscan_url: String,
    rpc_url: String,
    solanafm_url: String,
}

impl MarketDataClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        // Helius serves the same RPC method with better rate limits
        let rpc_url = match &config.helius_api_key {
            Some(key) => {
                let base = config.helius_rpc_url.trim_end_matches('/');
                format!("{}/?api-key={}", base, key)
            }
            None => config.solana_rpc_url.clone(),
        };

        Ok(Self {
            client,
            coingecko_url: config.coingecko_url.trim_end_matches('/').to_string(),
            binance_url: config.binance_url.trim_end_matches('/').to_string(),
            solscan_url: config.solscan_url.trim_end_matches('/').to_string(),
            rpc_url,
            solanafm_url: config.solanafm_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                provider: "Market",
                message: format!("HTTP {} from {}", response.status(), url),
            });
        }

        Ok(response.json().await?)
    }

    async fn coingecko_price(&self) -> Result<f64, ProviderError> {
        let url = format!("{}/simple/price", self.coingecko_url);
        let json = self.get_json(&url, &[("ids", "solana"), ("vs_currencies", "usd")]).await?;

        positive(json["solana"]["usd"].as_f64(), "CoinGecko returned no SOL price")
    }

    async fn binance_price(&self) -> Result<f64, ProviderError> {
        let url = format!("{}/ticker/price", self.binance_url);
        let json = self.get_json(&url, &[("symbol", "SOLUSDT")]).await?;

        // Binance quotes prices as strings
        let price = json["price"].as_str().and_then(|p| p.parse::<f64>().ok());
        positive(price, "Binance returned no SOL price")
    }

    async fn solscan_tps(&self) -> Result<f64, ProviderError> {
        let url = format!("{}/chaininfo", self.solscan_url);
        let json = self.get_json(&url, &[("cluster", "mainnet")]).await?;

        positive(json["data"]["tps"].as_f64(), "Solscan returned no TPS").map(f64::round)
    }

    async fn rpc_tps(&self) -> Result<f64, ProviderError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getRecentPerformanceSamples",
            "params": [1]
        });

        let response = self.client.post(&self.rpc_url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Api {
                provider: "Solana RPC",
                message: format!("HTTP {}", response.status()),
            });
        }

        let json: Value = response.json().await?;
        let sample = &json["result"][0];
        let transactions = positive(sample["numTransactions"].as_f64(), "no performance samples")?;
        let period = sample["samplePeriodSecs"].as_f64().filter(|p| *p > 0.0).unwrap_or(1.0);

        Ok((transactions / period).round())
    }

    async fn solanafm_tps(&self) -> Result<f64, ProviderError> {
        let url = format!("{}/network/stats", self.solanafm_url);
        let json = self.get_json(&url, &[]).await?;

        let tps = json["tps"]
            .as_f64()
            .filter(|t| *t > 0.0)
            .or_else(|| json["transactions_per_second"].as_f64());
        positive(tps, "SolanaFM returned no TPS").map(f64::round)
    }
}

/// Upstreams answer 0 or omit the field when they have no data
fn positive(value: Option<f64>, missing: &str) -> Result<f64, ProviderError> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ProviderError::InvalidResponse(missing.to_string()))
}

#[async_trait]
impl MarketSource for MarketDataClient {
    async fn sol_price(&self) -> Result<f64, ProviderError> {
        match self.coingecko_price().await {
            Ok(price) => Ok(price),
            Err(e) => {
                warn!("[MarketData] CoinGecko price fetch failed: {}", e);
                self.binance_price().await
            }
        }
    }

    async fn network_tps(&self) -> Result<f64, ProviderError> {
        match self.solscan_tps().await {
            Ok(tps) => return Ok(tps),
            Err(e) => warn!("[MarketData] Solscan TPS fetch failed: {}", e),
        }
        match self.rpc_tps().await {
            Ok(tps) => return Ok(tps),
            Err(e) => warn!("[MarketData] RPC TPS fetch failed: {}", e),
        }
        self.solanafm_tps().await
    }
}
