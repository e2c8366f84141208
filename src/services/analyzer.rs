use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{CacheKey, TtlCache};
use crate::providers::AnalysisSource;
use crate::wallet::fallback::unavailable_analysis;
use crate::wallet::short_address;
use crate::wallet::types::{AnalysisResult, Language, TokenHolding};

/// AI verdicts per address and language
pub struct WalletAnalyzer {
    cache: Arc<TtlCache>,
    source: Arc<dyn AnalysisSource>,
    ttl: Duration,
}

impl WalletAnalyzer {
    pub fn new(cache: Arc<TtlCache>, source: Arc<dyn AnalysisSource>, ttl: Duration) -> Self {
        Self { cache, source, ttl }
    }

    /// Analyze `holdings` for `address` in `lang`.
    ///
    /// Provider failures produce a neutral placeholder flagged
    /// `is_fallback`. Neither the placeholder nor a verdict derived from demo
    /// holdings is cached.
    pub async fn analyze(
        &self,
        address: &str,
        holdings: &[TokenHolding],
        lang: Language,
        use_cache: bool,
    ) -> AnalysisResult {
        let key = CacheKey::Analysis { address, lang }.to_string();

        if use_cache {
            if let Some(cached) = self.cache.get::<AnalysisResult>(&key) {
                info!("[Cache] Using cached AI analysis for {} ({})", short_address(address), lang);
                return cached;
            }
        }

        let Some(result) = self.request(address, holdings, lang).await else {
            return unavailable_analysis(lang);
        };

        if holdings.iter().any(|h| h.is_mock) {
            info!(
                "[AI] Not caching analysis of demo holdings for {}",
                short_address(address)
            );
        } else {
            self.cache.set(key, result.clone(), self.ttl);
        }
        result
    }

    /// Analyze holdings supplied by a caller rather than fetched for
    /// `address`. The `ai:` entry describes the fetched holdings, so this
    /// neither reads nor writes it.
    pub async fn analyze_uncached(
        &self,
        address: &str,
        holdings: &[TokenHolding],
        lang: Language,
    ) -> AnalysisResult {
        self.request(address, holdings, lang)
            .await
            .unwrap_or_else(|| unavailable_analysis(lang))
    }

    async fn request(
        &self,
        address: &str,
        holdings: &[TokenHolding],
        lang: Language,
    ) -> Option<AnalysisResult> {
        match self.source.analyze_holdings(address, holdings, lang).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("[AI] Analysis failed for {}: {}", short_address(address), e);
                None
            }
        }
    }
}
