//! Cache key construction
//!
//! Every key the service stores goes through [`CacheKey`], so the namespace
//! prefixes stay in one place and two data kinds can never share a key.

use std::fmt;

use crate::wallet::types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey<'a> {
    /// Normalized token holdings for an address
    Holdings(&'a str),
    /// Recent transactions for an address
    Transactions(&'a str),
    /// Combined holdings + transactions + analysis snapshot
    Wallet(&'a str),
    /// AI analysis for an address in one language
    Analysis { address: &'a str, lang: Language },
    /// SOL price and network TPS
    MarketStats,
}

impl CacheKey<'_> {
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Holdings(_) => "holdings",
            Self::Transactions(_) => "transactions",
            Self::Wallet(_) => "wallet",
            Self::Analysis { .. } => "ai",
            Self::MarketStats => "market",
        }
    }
}

impl fmt::Display for CacheKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Holdings(address) | Self::Transactions(address) | Self::Wallet(address) => {
                write!(f, "{}:{}", self.namespace(), address)
            }
            Self::Analysis { address, lang } => {
                write!(f, "{}:{}:{}", self.namespace(), address, lang)
            }
            Self::MarketStats => write!(f, "{}:stats", self.namespace()),
        }
    }
}
