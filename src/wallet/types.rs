use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fungible token (or native SOL) held by a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub mint: String,
    pub symbol: String,
    pub name: String,
    /// Balance in UI units (raw amount scaled by `decimals`)
    pub balance: f64,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_token: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_native: bool,
    /// Demo data served when the upstream fetch failed
    #[serde(default)]
    pub is_mock: bool,
}

impl TokenHolding {
    /// USD value used for ordering; unpriced tokens count as zero
    pub fn total_value(&self) -> f64 {
        self.total_price.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhaleTransaction {
    pub signature: String,
    /// Unix seconds
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub source: String,
    /// Fee in SOL
    pub fee: f64,
    #[serde(default)]
    pub is_mock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// AI verdict on a wallet's holdings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub summary: String,
    pub risk_level: RiskLevel,
    #[serde(alias = "smartMoneyReasoning")]
    pub reasoning: String,
    /// Set on the neutral placeholder returned when the provider failed
    #[serde(default)]
    pub is_fallback: bool,
}

/// Language the analysis is written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Zh,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// Instruction appended to the analysis prompt
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            Self::En => "Please provide the analysis in English.",
            Self::Zh => "请使用简体中文进行分析。",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Holdings, transactions and analysis for one address, cached as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub address: String,
    pub language: Language,
    pub tokens: Vec<TokenHolding>,
    pub transactions: Vec<WhaleTransaction>,
    pub analysis: AnalysisResult,
    pub fetched_at: DateTime<Utc>,
}

impl WalletSnapshot {
    /// True when any part of the snapshot is demo or placeholder data
    pub fn contains_fallback(&self) -> bool {
        self.tokens.iter().any(|t| t.is_mock)
            || self.transactions.iter().any(|t| t.is_mock)
            || self.analysis.is_fallback
    }
}

/// Snapshot as served to clients
#[derive(Debug, Clone, Serialize)]
pub struct WalletView {
    #[serde(flatten)]
    pub snapshot: WalletSnapshot,
    pub from_cache: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub sol_price: f64,
    pub tps: f64,
}

/// Failures talking to an upstream provider.
///
/// These never reach HTTP clients: fetchers turn them into fallback data.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("{provider} API error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0} API key not configured")]
    MissingApiKey(&'static str),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

// Request URLs carry API keys in their query strings and must not reach logs
impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

/// Errors surfaced to callers of the orchestrator
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid Solana address: {0}")]
    InvalidAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_accepts_provider_field_names() {
        let parsed: AnalysisResult = serde_json::from_value(json!({
            "sentiment": "Bullish",
            "summary": "Rotating into majors",
            "riskLevel": "High",
            "smartMoneyReasoning": "Early entries across three launches"
        }))
        .unwrap();

        assert_eq!(parsed.sentiment, Sentiment::Bullish);
        assert_eq!(parsed.risk_level, RiskLevel::High);
        assert_eq!(parsed.reasoning, "Early entries across three launches");
        assert!(!parsed.is_fallback);
    }

    #[test]
    fn analysis_rejects_unknown_sentiment() {
        let parsed = serde_json::from_value::<AnalysisResult>(json!({
            "sentiment": "Euphoric",
            "summary": "",
            "riskLevel": "Low",
            "reasoning": ""
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn language_parses_and_defaults() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        assert_eq!(" zh ".parse::<Language>(), Ok(Language::Zh));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Zh);
        assert_eq!(serde_json::to_value(Language::En).unwrap(), json!("en"));
    }

    #[test]
    fn transaction_kind_serializes_as_type() {
        let tx = WhaleTransaction {
            signature: "sig".into(),
            timestamp: 1,
            kind: "SWAP".into(),
            description: "d".into(),
            source: "Jupiter".into(),
            fee: 0.000005,
            is_mock: false,
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "SWAP");
        assert!(value.get("kind").is_none());
    }
}
