//! Configuration module for environment variables and application settings

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Result, anyhow};

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Upstream API endpoints and credentials
    pub providers: ProviderConfig,

    /// Cache TTLs and sizing
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Helius API key; without it holdings and transactions fall back to demo data
    pub helius_api_key: Option<String>,
    pub helius_rpc_url: String,
    pub helius_api_url: String,
    /// Gemini API key; without it analysis falls back to a neutral verdict
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    /// Public RPC used for TPS samples when no Helius key is configured
    pub solana_rpc_url: String,
    pub coingecko_url: String,
    pub binance_url: String,
    /// TPS sources tried before and after the RPC samples
    pub solscan_url: String,
    pub solanafm_url: String,
    pub request_timeout: Duration,
    pub ai_timeout: Duration,
    /// Per-lookup deadline for market stats
    pub market_lookup_timeout: Duration,
    pub transaction_limit: usize,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub holdings_ttl: Duration,
    pub transactions_ttl: Duration,
    pub analysis_ttl: Duration,
    pub wallet_ttl: Duration,
    pub market_stats_ttl: Duration,
    /// Zero means unbounded
    pub max_entries: usize,
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            holdings_ttl: Duration::from_millis(10 * 60 * 1000),
            transactions_ttl: Duration::from_millis(5 * 60 * 1000),
            analysis_ttl: Duration::from_millis(8 * 60 * 1000),
            wallet_ttl: Duration::from_millis(10 * 60 * 1000),
            market_stats_ttl: Duration::from_millis(30 * 1000),
            max_entries: 0,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Describe every way the TTLs break the expected freshness ordering
    /// (holdings and snapshots longest, transactions shortest).
    pub fn ttl_ordering_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.analysis_ttl >= self.holdings_ttl {
            warnings.push(format!(
                "analysis TTL {:?} is not shorter than holdings TTL {:?}",
                self.analysis_ttl, self.holdings_ttl
            ));
        }
        if self.transactions_ttl >= self.analysis_ttl {
            warnings.push(format!(
                "transactions TTL {:?} is not shorter than analysis TTL {:?}",
                self.transactions_ttl, self.analysis_ttl
            ));
        }
        if self.wallet_ttl > self.holdings_ttl {
            warnings.push(format!(
                "wallet snapshot TTL {:?} outlives holdings TTL {:?}",
                self.wallet_ttl, self.holdings_ttl
            ));
        }
        warnings
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let string_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let millis_or = |key: &str, default: Duration| -> Result<Duration> {
            Ok(Duration::from_millis(parse_or(get(key), key, default.as_millis() as u64)?))
        };

        let cache_defaults = CacheConfig::default();

        Ok(Self {
            server: ServerConfig {
                host: string_or("SERVER_HOST", "0.0.0.0"),
                // $PORT wins so the server runs unchanged on PaaS hosts
                port: parse_or(get("PORT").or_else(|| get("SERVER_PORT")), "PORT", 3000)?,
                allowed_origins: get("CORS_ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(|o| o.trim().to_string())
                            .filter(|o| !o.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },

            providers: ProviderConfig {
                helius_api_key: get("HELIUS_API_KEY").or_else(|| get("API_KEY")),
                helius_rpc_url: string_or("HELIUS_RPC_URL", "https://mainnet.helius-rpc.com"),
                helius_api_url: string_or("HELIUS_API_URL", "https://api.helius.xyz/v0"),
                gemini_api_key: get("GEMINI_API_KEY"),
                gemini_api_url: string_or(
                    "GEMINI_API_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
                gemini_model: string_or("GEMINI_MODEL", "gemini-1.5-flash"),
                solana_rpc_url: string_or("SOLANA_RPC_URL", "https://api.mainnet-beta.solana.com"),
                coingecko_url: string_or("COINGECKO_API_URL", "https://api.coingecko.com/api/v3"),
                binance_url: string_or("BINANCE_API_URL", "https://api.binance.com/api/v3"),
                solscan_url: string_or("SOLSCAN_API_URL", "https://api.solscan.io"),
                solanafm_url: string_or("SOLANAFM_API_URL", "https://api.solanafm.com/v1"),
                request_timeout: millis_or("REQUEST_TIMEOUT_MS", Duration::from_secs(10))?,
                ai_timeout: millis_or("AI_TIMEOUT_MS", Duration::from_secs(30))?,
                market_lookup_timeout: millis_or(
                    "MARKET_LOOKUP_TIMEOUT_MS",
                    Duration::from_secs(5),
                )?,
                transaction_limit: parse_or(get("TRANSACTION_LIMIT"), "TRANSACTION_LIMIT", 10)?,
            },

            cache: CacheConfig {
                holdings_ttl: millis_or("CACHE_HOLDINGS_TTL_MS", cache_defaults.holdings_ttl)?,
                transactions_ttl: millis_or(
                    "CACHE_TRANSACTIONS_TTL_MS",
                    cache_defaults.transactions_ttl,
                )?,
                analysis_ttl: millis_or("CACHE_ANALYSIS_TTL_MS", cache_defaults.analysis_ttl)?,
                wallet_ttl: millis_or("CACHE_WALLET_TTL_MS", cache_defaults.wallet_ttl)?,
                market_stats_ttl: millis_or(
                    "CACHE_MARKET_STATS_TTL_MS",
                    cache_defaults.market_stats_ttl,
                )?,
                max_entries: parse_or(get("CACHE_MAX_ENTRIES"), "CACHE_MAX_ENTRIES", 0)?,
                sweep_interval: millis_or(
                    "CACHE_SWEEP_INTERVAL_MS",
                    cache_defaults.sweep_interval,
                )?,
            },
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e| anyhow!("{} has invalid value {:?}: {}", key, value, e)),
        None => Ok(default),
    }
}
