use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheKey, TtlCache};
use crate::providers::MarketSource;
use crate::wallet::types::{MarketStats, ProviderError};

const DEFAULT_SOL_PRICE: f64 = 145.20;
const DEFAULT_TPS: f64 = 2840.0;

/// SOL price and network TPS for the dashboard header
pub struct MarketStatsService {
    cache: Arc<TtlCache>,
    source: Arc<dyn MarketSource>,
    ttl: Duration,
    lookup_timeout: Duration,
    last_known: RwLock<MarketStats>,
}

impl MarketStatsService {
    pub fn new(
        cache: Arc<TtlCache>,
        source: Arc<dyn MarketSource>,
        ttl: Duration,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            source,
            ttl,
            lookup_timeout,
            last_known: RwLock::new(MarketStats {
                sol_price: DEFAULT_SOL_PRICE,
                tps: DEFAULT_TPS,
            }),
        }
    }

    /// Current stats. Never fails: a lookup that errors or times out is
    /// replaced by the last good value.
    pub async fn get_market_stats(&self) -> MarketStats {
        let key = CacheKey::MarketStats.to_string();
        if let Some(stats) = self.cache.get::<MarketStats>(&key) {
            return stats;
        }

        let (price, tps) = tokio::join!(
            self.lookup("SOL price", self.source.sol_price()),
            self.lookup("TPS", self.source.network_tps()),
        );

        let stats = {
            let mut last = self.last_known.write();
            if price > 0.0 {
                last.sol_price = price;
            }
            if tps > 0.0 {
                last.tps = tps;
            }
            *last
        };

        if price > 0.0 || tps > 0.0 {
            self.cache.set(key, stats, self.ttl);
        } else {
            warn!("[Market] All lookups failed, serving last known stats");
        }

        stats
    }

    /// Resolve a lookup to its value, or 0 on error or timeout
    async fn lookup<F>(&self, name: &str, fut: F) -> f64
    where
        F: Future<Output = Result<f64, ProviderError>>,
    {
        let outcome = match tokio::time::timeout(self.lookup_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.lookup_timeout)),
        };

        match outcome {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            Ok(value) => {
                debug!("[Market] {} lookup returned {}", name, value);
                0.0
            }
            Err(e) => {
                warn!("[Market] {} lookup failed: {}", name, e);
                0.0
            }
        }
    }
}
