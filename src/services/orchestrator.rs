//! # Wallet Data Orchestrator
//!
//! Assembles the full view of a wallet (holdings, recent transactions and an
//! AI verdict) and caches the assembled snapshot under `wallet:<address>`.
//! Each part is also cached on its own by its fetcher, so a snapshot miss
//! usually costs only the parts that expired.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::cache::{CacheKey, TtlCache};
use crate::services::{HoldingsFetcher, TransactionFetcher, WalletAnalyzer};
use crate::wallet::fallback::small_wallet_analysis;
use crate::wallet::types::{Language, WalletError, WalletSnapshot, WalletView};
use crate::wallet::{is_valid_solana_address, short_address};

pub struct WalletDataOrchestrator {
    cache: Arc<TtlCache>,
    holdings: HoldingsFetcher,
    transactions: TransactionFetcher,
    analyzer: WalletAnalyzer,
    ttl: Duration,
}

impl WalletDataOrchestrator {
    pub fn new(
        cache: Arc<TtlCache>,
        holdings: HoldingsFetcher,
        transactions: TransactionFetcher,
        analyzer: WalletAnalyzer,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            holdings,
            transactions,
            analyzer,
            ttl,
        }
    }

    pub fn holdings(&self) -> &HoldingsFetcher {
        &self.holdings
    }

    pub fn transactions(&self) -> &TransactionFetcher {
        &self.transactions
    }

    pub fn analyzer(&self) -> &WalletAnalyzer {
        &self.analyzer
    }

    /// Full view of `address` with the analysis in `lang`.
    ///
    /// An invalid address is the only error; upstream failures show up as
    /// flagged demo data inside the view instead.
    pub async fn fetch_wallet_data(
        &self,
        address: &str,
        lang: Language,
        force_refresh: bool,
    ) -> Result<WalletView, WalletError> {
        let address = address.trim();
        if !is_valid_solana_address(address) {
            return Err(WalletError::InvalidAddress(address.to_string()));
        }

        let key = CacheKey::Wallet(address).to_string();
        let use_cache = !force_refresh;

        if use_cache {
            match self.cache.get::<WalletSnapshot>(&key) {
                Some(snapshot) if snapshot.language == lang => {
                    info!("[Cache] Using cached wallet data for {}", short_address(address));
                    return Ok(WalletView {
                        snapshot,
                        from_cache: true,
                    });
                }
                Some(_) => info!(
                    "[Cache] Wallet snapshot for {} is in another language, rebuilding",
                    short_address(address)
                ),
                None => {}
            }
        }

        let (tokens, transactions) = tokio::join!(
            self.holdings.get_holdings(address, use_cache),
            self.transactions.get_recent_transactions(address, use_cache),
        );

        let analysis = if tokens.is_empty() {
            small_wallet_analysis(lang)
        } else {
            self.analyzer.analyze(address, &tokens, lang, use_cache).await
        };

        let snapshot = WalletSnapshot {
            address: address.to_string(),
            language: lang,
            tokens,
            transactions,
            analysis,
            fetched_at: Utc::now(),
        };

        if snapshot.contains_fallback() {
            warn!(
                "[Cache] Wallet data for {} contains fallback data, not caching",
                short_address(address)
            );
        } else {
            self.cache.set(key, snapshot.clone(), self.ttl);
        }

        Ok(WalletView {
            snapshot,
            from_cache: false,
        })
    }

    /// Rebuild the view from the upstream sources, replacing every cached part
    pub async fn refresh(&self, address: &str, lang: Language) -> Result<WalletView, WalletError> {
        self.fetch_wallet_data(address, lang, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        FakeAnalysis, FakeAssets, FakeTransactions, WHALE, analysis, holding, transaction,
    };

    const WALLET_TTL: Duration = Duration::from_secs(600);

    struct Harness {
        cache: Arc<TtlCache>,
        assets: Arc<FakeAssets>,
        txs: Arc<FakeTransactions>,
        ai: Arc<FakeAnalysis>,
        orchestrator: WalletDataOrchestrator,
    }

    fn harness(assets: FakeAssets, txs: FakeTransactions, ai: FakeAnalysis) -> Harness {
        let cache = Arc::new(TtlCache::new());
        let assets = Arc::new(assets);
        let txs = Arc::new(txs);
        let ai = Arc::new(ai);

        let orchestrator = WalletDataOrchestrator::new(
            cache.clone(),
            HoldingsFetcher::new(cache.clone(), assets.clone(), Duration::from_secs(600)),
            TransactionFetcher::new(cache.clone(), txs.clone(), Duration::from_secs(300), 10),
            WalletAnalyzer::new(cache.clone(), ai.clone(), Duration::from_secs(480)),
            WALLET_TTL,
        );

        Harness {
            cache,
            assets,
            txs,
            ai,
            orchestrator,
        }
    }

    fn healthy() -> Harness {
        harness(
            FakeAssets::new(vec![Some(vec![holding("SOL", 1_500.0)])]),
            FakeTransactions::new(vec![Some(vec![transaction("sig-1")])]),
            FakeAnalysis::new(vec![Some(analysis("smart money"))]),
        )
    }

    #[tokio::test]
    async fn invalid_address_is_rejected_before_any_fetch() {
        let h = healthy();

        for address in ["", "not-a-wallet", "0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl"] {
            let err = h
                .orchestrator
                .fetch_wallet_data(address, Language::En, false)
                .await
                .unwrap_err();
            assert!(matches!(err, WalletError::InvalidAddress(_)));
        }
        assert_eq!(h.assets.calls(), 0);
        assert!(h.cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_view_is_served_from_snapshot() {
        let h = healthy();

        let first = h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        assert!(!first.from_cache);

        let second = h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.snapshot, first.snapshot);

        assert_eq!(h.assets.calls(), 1);
        assert_eq!(h.txs.calls(), 1);
        assert_eq!(h.ai.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn surrounding_whitespace_maps_to_the_same_snapshot() {
        let h = healthy();

        h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        let padded = format!("  {}\n", WHALE);
        let view = h.orchestrator.fetch_wallet_data(&padded, Language::En, false).await.unwrap();

        assert!(view.from_cache);
        assert_eq!(view.snapshot.address, WHALE);
    }

    #[tokio::test(start_paused = true)]
    async fn other_language_rebuilds_with_cached_parts() {
        let h = harness(
            FakeAssets::new(vec![Some(vec![holding("SOL", 1_500.0)])]),
            FakeTransactions::new(vec![Some(vec![transaction("sig-1")])]),
            FakeAnalysis::new(vec![Some(analysis("english")), Some(analysis("chinese"))]),
        );

        h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        let zh = h.orchestrator.fetch_wallet_data(WHALE, Language::Zh, false).await.unwrap();

        assert!(!zh.from_cache);
        assert_eq!(zh.snapshot.language, Language::Zh);
        assert_eq!(zh.snapshot.analysis.summary, "chinese");
        assert_eq!(h.assets.calls(), 1);
        assert_eq!(h.txs.calls(), 1);
        assert_eq!(h.ai.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_bypasses_every_layer_and_repopulates() {
        let h = harness(
            FakeAssets::new(vec![
                Some(vec![holding("SOL", 1_500.0)]),
                Some(vec![holding("JUP", 800.0)]),
            ]),
            FakeTransactions::new(vec![
                Some(vec![transaction("sig-1")]),
                Some(vec![transaction("sig-2")]),
            ]),
            FakeAnalysis::new(vec![Some(analysis("before")), Some(analysis("after"))]),
        );

        h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        let refreshed = h.orchestrator.refresh(WHALE, Language::En).await.unwrap();

        assert!(!refreshed.from_cache);
        assert_eq!(refreshed.snapshot.tokens[0].symbol, "JUP");
        assert_eq!(refreshed.snapshot.transactions[0].signature, "sig-2");
        assert_eq!(refreshed.snapshot.analysis.summary, "after");

        let cached = h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        assert!(cached.from_cache);
        assert_eq!(cached.snapshot.analysis.summary, "after");
        assert_eq!(h.assets.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_wallet_skips_the_model() {
        let h = harness(
            FakeAssets::new(vec![Some(vec![])]),
            FakeTransactions::new(vec![Some(vec![])]),
            FakeAnalysis::new(vec![Some(analysis("unused"))]),
        );

        let view = h.orchestrator.fetch_wallet_data(WHALE, Language::Zh, false).await.unwrap();

        assert_eq!(h.ai.calls(), 0);
        assert_eq!(view.snapshot.analysis, small_wallet_analysis(Language::Zh));
        let again = h.orchestrator.fetch_wallet_data(WHALE, Language::Zh, false).await.unwrap();
        assert!(again.from_cache);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_with_demo_data_is_not_cached() {
        let h = harness(
            FakeAssets::new(vec![None]),
            FakeTransactions::new(vec![Some(vec![transaction("sig-1")])]),
            FakeAnalysis::new(vec![Some(analysis("demo verdict"))]),
        );

        let view = h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        assert!(view.snapshot.tokens.iter().all(|t| t.is_mock));

        let again = h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        assert!(!again.from_cache);
        assert_eq!(h.assets.calls(), 2);
        // transactions were real, so their own entry still serves the retry
        assert_eq!(h.txs.calls(), 1);
        assert!(h.cache.get::<WalletSnapshot>(&CacheKey::Wallet(WHALE).to_string()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_with_fallback_analysis_is_not_cached() {
        let h = harness(
            FakeAssets::new(vec![Some(vec![holding("SOL", 1_500.0)])]),
            FakeTransactions::new(vec![Some(vec![transaction("sig-1")])]),
            FakeAnalysis::new(vec![None]),
        );

        let view = h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        assert!(view.snapshot.analysis.is_fallback);
        assert!(h.cache.get::<WalletSnapshot>(&CacheKey::Wallet(WHALE).to_string()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_expires_after_wallet_ttl() {
        let h = healthy();

        h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();
        tokio::time::advance(WALLET_TTL).await;
        let view = h.orchestrator.fetch_wallet_data(WHALE, Language::En, false).await.unwrap();

        assert!(!view.from_cache);
        // holdings share the wallet TTL, transactions and analysis are shorter
        assert_eq!(h.assets.calls(), 2);
        assert_eq!(h.txs.calls(), 2);
        assert_eq!(h.ai.calls(), 2);
    }
}
