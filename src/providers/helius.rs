use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::config::ProviderConfig;
use crate::providers::{AssetSource, TransactionSource};
use crate::wallet::short_address;
use crate::wallet::types::{ProviderError, TokenHolding, WhaleTransaction};

const PROVIDER: &str = "Helius";
/// Largest page the DAS API serves
const PAGE_LIMIT: usize = 1000;
/// Hard stop for pathological wallets
const MAX_PAGES: usize = 100;
const LAMPORTS_PER_SOL: f64 = 1e9;
const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";
const SOL_LOGO_URL: &str = concat!(
    "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/",
    "So11111111111111111111111111111111111111112/logo.png"
);
/// Used when DAS returns a native balance without a price
const FALLBACK_SOL_PRICE: f64 = 145.5;

/// Client for the Helius RPC (DAS) and REST (enhanced transactions) APIs
pub struct HeliusClient {
    client: Client,
    rpc_url: String,
    api_url: String,
    api_key: Option<String>,
}

impl HeliusClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            rpc_url: config.helius_rpc_url.trim_end_matches('/').to_string(),
            api_url: config.helius_api_url.trim_end_matches('/').to_string(),
            api_key: config.helius_api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key.as_deref().ok_or(ProviderError::MissingApiKey(PROVIDER))
    }

    /// Fetch one `getAssetsByOwner` page, returning its items and, for the
    /// first page, the native balance object.
    async fn fetch_asset_page(
        &self,
        api_key: &str,
        address: &str,
        page: usize,
    ) -> Result<(Vec<Value>, Option<Value>), ProviderError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": format!("page-{}", page),
            "method": "getAssetsByOwner",
            "params": {
                "ownerAddress": address,
                "page": page,
                "limit": PAGE_LIMIT,
                "displayOptions": {
                    "showFungible": true,
                    "showNativeBalance": page == 1,
                    "showCollectionMetadata": false,
                    "showUnverifiedCollections": false
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/", self.rpc_url))
            .query(&[("api-key", api_key)])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: format!("HTTP {} for getAssetsByOwner page {}", response.status(), page),
            });
        }

        let json: Value = response.json().await?;

        if let Some(err) = json.get("error").filter(|e| !e.is_null()) {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: err["message"].as_str().unwrap_or("DAS API error").to_string(),
            });
        }

        let result = json
            .get("result")
            .filter(|r| !r.is_null())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("DAS response has no result".to_string())
            })?;

        let items = result["items"].as_array().cloned().unwrap_or_default();
        let native_balance = result.get("nativeBalance").filter(|n| !n.is_null()).cloned();

        Ok((items, native_balance))
    }
}

#[async_trait]
impl AssetSource for HeliusClient {
    async fn fetch_holdings(&self, address: &str) -> Result<Vec<TokenHolding>, ProviderError> {
        let api_key = self.api_key()?;

        let mut items = Vec::new();
        let mut native_balance = None;

        for page in 1..=MAX_PAGES {
            match self.fetch_asset_page(api_key, address, page).await {
                Ok((page_items, native)) => {
                    let page_len = page_items.len();
                    items.extend(page_items);
                    if page == 1 {
                        native_balance = native;
                    }

                    if page_len < PAGE_LIMIT {
                        break;
                    }
                    if page == MAX_PAGES {
                        warn!(
                            "[DAS] Reached max pages ({}) for {}",
                            MAX_PAGES,
                            short_address(address)
                        );
                    } else {
                        debug!("[DAS] Page {}: {} items, fetching next page", page, page_len);
                    }
                }
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    // Keep what the earlier pages returned
                    error!("[DAS] Error fetching page {}: {}", page, e);
                    break;
                }
            }
        }

        info!("[DAS] Fetched {} total assets for {}", items.len(), short_address(address));

        Ok(normalize_assets(&items, native_balance.as_ref()))
    }
}

#[async_trait]
impl TransactionSource for HeliusClient {
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<WhaleTransaction>, ProviderError> {
        let api_key = self.api_key()?;
        let url = format!("{}/addresses/{}/transactions", self.api_url, address);

        let response = self
            .client
            .get(&url)
            .query(&[("api-key", api_key.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: format!(
                    "HTTP {} for transactions of {}",
                    response.status(),
                    short_address(address)
                ),
            });
        }

        let json: Value = response.json().await?;
        parse_transactions(&json)
    }
}

/// Turn raw DAS items into sorted holdings.
///
/// Only fungible assets with a positive balance survive; the native SOL
/// balance, when present, is added as its own holding.
pub fn normalize_assets(items: &[Value], native_balance: Option<&Value>) -> Vec<TokenHolding> {
    let mut holdings: Vec<TokenHolding> = items
        .iter()
        .filter(|item| {
            matches!(item["interface"].as_str(), Some("FungibleToken") | Some("FungibleAsset"))
        })
        .filter_map(normalize_asset)
        .filter(|holding| holding.balance > 0.0)
        .collect();

    if let Some(native) = native_balance {
        let lamports = native["lamports"].as_f64().unwrap_or(0.0);
        if lamports > 0.0 {
            let balance = lamports / LAMPORTS_PER_SOL;
            let price = native["price_per_sol"]
                .as_f64()
                .filter(|p| *p > 0.0)
                .unwrap_or(FALLBACK_SOL_PRICE);
            let total = native["total_price"]
                .as_f64()
                .filter(|t| *t > 0.0)
                .unwrap_or(balance * price);

            holdings.insert(
                0,
                TokenHolding {
                    mint: WRAPPED_SOL_MINT.to_string(),
                    symbol: "SOL".to_string(),
                    name: "Solana".to_string(),
                    balance,
                    decimals: 9,
                    price_per_token: Some(price),
                    total_price: Some(total),
                    image_url: Some(SOL_LOGO_URL.to_string()),
                    is_native: true,
                    is_mock: false,
                },
            );
        }
    }

    // Stable sort keeps the native holding ahead of equally valued tokens
    holdings.sort_by(|a, b| b.total_value().total_cmp(&a.total_value()));
    holdings
}

fn normalize_asset(item: &Value) -> Option<TokenHolding> {
    let info = item.get("token_info").filter(|i| !i.is_null())?;

    let raw_balance = info["balance"].as_f64().unwrap_or(0.0);
    if raw_balance <= 0.0 {
        return None;
    }

    let decimals = info["decimals"].as_u64().unwrap_or(0).min(u8::MAX as u64) as u8;
    let balance = if decimals > 0 {
        raw_balance / 10f64.powi(decimals as i32)
    } else {
        raw_balance
    };

    let metadata = &item["content"]["metadata"];
    let symbol = non_empty(&info["symbol"])
        .or_else(|| non_empty(&metadata["symbol"]))
        .unwrap_or("UNKNOWN")
        .to_string();
    let name = non_empty(&metadata["name"]).unwrap_or(&symbol).to_string();

    let mint = non_empty(&info["mint"])
        .or_else(|| non_empty(&item["id"]))
        .unwrap_or_default()
        .to_string();

    let price_info = info.get("price_info").filter(|p| !p.is_null());
    let image_url = non_empty(&item["content"]["links"]["image"])
        .or_else(|| non_empty(&item["content"]["files"][0]["uri"]))
        .map(str::to_string);

    Some(TokenHolding {
        mint,
        symbol,
        name,
        balance,
        decimals,
        price_per_token: price_info.map(|p| p["price_per_token"].as_f64().unwrap_or(0.0)),
        total_price: price_info.map(|p| p["total_price"].as_f64().unwrap_or(0.0)),
        image_url,
        is_native: false,
        is_mock: false,
    })
}

/// Map the enhanced-transactions array into whale transactions
pub fn parse_transactions(json: &Value) -> Result<Vec<WhaleTransaction>, ProviderError> {
    let entries = json.as_array().ok_or_else(|| {
        ProviderError::InvalidResponse("transactions response is not an array".to_string())
    })?;

    Ok(entries
        .iter()
        .map(|tx| WhaleTransaction {
            signature: tx["signature"].as_str().unwrap_or_default().to_string(),
            timestamp: tx["timestamp"].as_i64().unwrap_or(0),
            kind: tx["type"].as_str().unwrap_or("UNKNOWN").to_string(),
            description: non_empty(&tx["description"])
                .unwrap_or("On-chain verification pending")
                .to_string(),
            source: tx["source"].as_str().unwrap_or("UNKNOWN").to_string(),
            fee: tx["fee"].as_f64().unwrap_or(0.0) / LAMPORTS_PER_SOL,
            is_mock: false,
        })
        .collect())
}

fn non_empty(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
