use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{CacheKey, TtlCache};
use crate::providers::TransactionSource;
use crate::wallet::fallback::mock_transactions;
use crate::wallet::short_address;
use crate::wallet::types::WhaleTransaction;

/// Cache-aware front for the transaction source. Entries live shorter than
/// holdings since new activity shows up here first.
pub struct TransactionFetcher {
    cache: Arc<TtlCache>,
    source: Arc<dyn TransactionSource>,
    ttl: Duration,
    limit: usize,
}

impl TransactionFetcher {
    pub fn new(
        cache: Arc<TtlCache>,
        source: Arc<dyn TransactionSource>,
        ttl: Duration,
        limit: usize,
    ) -> Self {
        Self { cache, source, ttl, limit }
    }

    pub async fn get_recent_transactions(
        &self,
        address: &str,
        use_cache: bool,
    ) -> Vec<WhaleTransaction> {
        let key = CacheKey::Transactions(address).to_string();

        if use_cache {
            if let Some(cached) = self.cache.get::<Vec<WhaleTransaction>>(&key) {
                info!("[Cache] Using cached transactions for {}", short_address(address));
                return cached;
            }
        }

        match self.source.fetch_transactions(address, self.limit).await {
            Ok(transactions) => {
                self.cache.set(key, transactions.clone(), self.ttl);
                transactions
            }
            Err(e) => {
                warn!(
                    "[API] Transaction fetch failed for {}, serving demo data: {}",
                    short_address(address),
                    e
                );
                mock_transactions()
            }
        }
    }
}
