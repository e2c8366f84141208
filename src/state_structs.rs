// --- Request and response bodies for the HTTP API ---
use serde::{Deserialize, Serialize};

use crate::wallet::types::{Language, TokenHolding, WhaleTransaction};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// --- Query strings ---
#[derive(Debug, Default, Deserialize)]
pub struct WalletQuery {
    pub lang: Option<Language>,
    /// Skip every cache layer and overwrite with fresh data
    pub refresh: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    pub refresh: Option<bool>,
}

// --- Request bodies ---
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    /// Holdings to analyze; fetched (through the cache) when omitted
    pub holdings: Option<Vec<TokenHolding>>,
    pub lang: Option<Language>,
    pub refresh: Option<bool>,
}

// --- Responses ---
#[derive(Debug, Serialize)]
pub struct HoldingsResponse {
    pub address: String,
    pub tokens: Vec<TokenHolding>,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub address: String,
    pub transactions: Vec<WhaleTransaction>,
}
