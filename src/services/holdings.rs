use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{CacheKey, TtlCache};
use crate::providers::AssetSource;
use crate::wallet::fallback::mock_holdings;
use crate::wallet::short_address;
use crate::wallet::types::TokenHolding;

/// Cache-aware front for the asset source
pub struct HoldingsFetcher {
    cache: Arc<TtlCache>,
    source: Arc<dyn AssetSource>,
    ttl: Duration,
}

impl HoldingsFetcher {
    pub fn new(cache: Arc<TtlCache>, source: Arc<dyn AssetSource>, ttl: Duration) -> Self {
        Self { cache, source, ttl }
    }

    /// Holdings for `address`, sorted by value.
    ///
    /// With `use_cache` a live `holdings:` entry is returned without touching
    /// the source. Any fetch result, including an empty one, replaces the
    /// entry. A failed fetch yields demo holdings that are not cached.
    pub async fn get_holdings(&self, address: &str, use_cache: bool) -> Vec<TokenHolding> {
        let key = CacheKey::Holdings(address).to_string();

        if use_cache {
            if let Some(cached) = self.cache.get::<Vec<TokenHolding>>(&key) {
                info!("[Cache] Using cached holdings for {}", short_address(address));
                return cached;
            }
        }

        match self.source.fetch_holdings(address).await {
            Ok(holdings) => {
                info!(
                    "[DAS] Fetched {} holdings for {}",
                    holdings.len(),
                    short_address(address)
                );
                self.cache.set(key, holdings.clone(), self.ttl);
                holdings
            }
            Err(e) => {
                warn!(
                    "[DAS] Holdings fetch failed for {}, serving demo data: {}",
                    short_address(address),
                    e
                );
                mock_holdings(address)
            }
        }
    }
}
