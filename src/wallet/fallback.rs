//! Demo data and placeholder verdicts served when an upstream call fails.
//!
//! Everything built here is flagged (`is_mock` / `is_fallback`) so the
//! fetchers can keep it out of the cache.

use chrono::Utc;

use crate::wallet::types::{
    AnalysisResult, Language, RiskLevel, Sentiment, TokenHolding, WhaleTransaction,
};

fn mock_holding(
    mint: &str,
    symbol: &str,
    name: &str,
    balance: f64,
    decimals: u8,
    price: f64,
    total: f64,
) -> TokenHolding {
    TokenHolding {
        mint: mint.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        balance,
        decimals,
        price_per_token: Some(price),
        total_price: Some(total),
        image_url: None,
        is_native: false,
        is_mock: true,
    }
}

/// Demo holdings for `address`
pub fn mock_holdings(address: &str) -> Vec<TokenHolding> {
    // The foundation wallet gets a recognisable whale-sized portfolio
    if address.contains("vines1") {
        return vec![
            mock_holding("1", "SOL", "Solana", 42_069.5, 9, 145.2, 6_108_418.0),
            mock_holding("2", "JUP", "Jupiter", 1_250_000.0, 6, 1.12, 1_400_000.0),
        ];
    }

    vec![
        mock_holding("m1", "SOL", "Solana (Demo)", 10.5, 9, 145.0, 1_522.5),
        mock_holding("m2", "BONK", "Bonk (Demo)", 50_000_000.0, 5, 0.00002, 1_000.0),
    ]
}

/// Demo transactions timestamped relative to now
pub fn mock_transactions() -> Vec<WhaleTransaction> {
    let now = Utc::now().timestamp();
    vec![
        WhaleTransaction {
            signature: "mock_1".to_string(),
            timestamp: now - 300,
            kind: "SWAP".to_string(),
            description: "Swapped 100 SOL for 12,000 JUP (Simulated)".to_string(),
            source: "Jupiter".to_string(),
            fee: 0.000005,
            is_mock: true,
        },
        WhaleTransaction {
            signature: "mock_2".to_string(),
            timestamp: now - 3600,
            kind: "TRANSFER".to_string(),
            description: "Received 5,000 USDC (Simulated)".to_string(),
            source: "System".to_string(),
            fee: 0.000005,
            is_mock: true,
        },
    ]
}

/// Placeholder verdict when the AI provider is unreachable
pub fn unavailable_analysis(lang: Language) -> AnalysisResult {
    let summary = match lang {
        Language::Zh => "AI 分析暂时不可用，请稍后再试。",
        Language::En => "AI analysis temporarily unavailable. Please try again later.",
    };

    AnalysisResult {
        sentiment: Sentiment::Neutral,
        summary: summary.to_string(),
        risk_level: RiskLevel::Medium,
        reasoning: "AI service error occurred.".to_string(),
        is_fallback: true,
    }
}

/// Verdict for wallets without any fungible holdings. No provider call is
/// made for these, so the result is a regular (cacheable) answer.
pub fn small_wallet_analysis(lang: Language) -> AnalysisResult {
    let summary = match lang {
        Language::Zh => "该钱包目前资产规模较小，AI 建议持续观测。",
        Language::En => "Small asset scale detected, AI suggests continued observation.",
    };

    AnalysisResult {
        sentiment: Sentiment::Neutral,
        summary: summary.to_string(),
        risk_level: RiskLevel::Low,
        reasoning: "Minimal on-chain footprint for high-fidelity classification.".to_string(),
        is_fallback: false,
    }
}
