//! # Services Module
//!
//! Cache-aware services between the HTTP routes and the upstream providers.
//! Every fetch follows the same protocol: look up the cache key, return a
//! live hit, otherwise fetch and store a verified result with the TTL for
//! its data kind. Failures fall back to flagged demo data that is never
//! stored.

pub mod analyzer;
pub mod holdings;
pub mod market_stats;
pub mod orchestrator;
pub mod transactions;

pub use analyzer::WalletAnalyzer;
pub use holdings::HoldingsFetcher;
pub use market_stats::MarketStatsService;
pub use orchestrator::WalletDataOrchestrator;
pub use transactions::TransactionFetcher;
