//! # Wallet Routes
//!
//! Whale wallet endpoints. Every handler validates the address first and
//! answers 400 for anything that is not a Solana public key; upstream
//! failures never surface as errors since the services fall back to
//! flagged demo data.
//!
//! Each endpoint accepts `refresh=true` to bypass the cache and overwrite it.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use tracing::{info, warn};

use crate::server::AppState;
use crate::state_structs::{
    AnalyzeRequest, ErrorResponse, HoldingsResponse, RefreshQuery, TransactionsResponse,
    WalletQuery,
};
use crate::wallet::fallback::small_wallet_analysis;
use crate::wallet::types::{AnalysisResult, Language, WalletError, WalletView};
use crate::wallet::{is_valid_solana_address, short_address};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

fn validated(address: &str) -> Result<&str, ApiError> {
    let address = address.trim();
    if is_valid_solana_address(address) {
        Ok(address)
    } else {
        warn!("Invalid wallet address provided: {}", address);
        Err(bad_request(WalletError::InvalidAddress(address.to_string()).to_string()))
    }
}

/// Holdings, transactions and AI verdict in one response
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/api/v1/wallet/{address}?lang=en|zh&refresh=true`
pub async fn get_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<WalletQuery>,
) -> Result<Json<WalletView>, ApiError> {
    let lang = query.lang.unwrap_or_default();

    let view = if query.refresh.unwrap_or(false) {
        state.orchestrator.refresh(&address, lang).await
    } else {
        state.orchestrator.fetch_wallet_data(&address, lang, false).await
    };

    view.map(Json).map_err(|e| bad_request(e.to_string()))
}

pub async fn get_holdings(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<HoldingsResponse>, ApiError> {
    let address = validated(&address)?;
    let use_cache = !query.refresh.unwrap_or(false);

    let tokens = state.orchestrator.holdings().get_holdings(address, use_cache).await;

    Ok(Json(HoldingsResponse {
        address: address.to_string(),
        tokens,
    }))
}

pub async fn get_transactions(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let address = validated(&address)?;
    let use_cache = !query.refresh.unwrap_or(false);

    let transactions = state
        .orchestrator
        .transactions()
        .get_recent_transactions(address, use_cache)
        .await;

    Ok(Json(TransactionsResponse {
        address: address.to_string(),
        transactions,
    }))
}

/// AI verdict for the given holdings, or for the wallet's current holdings
/// when the body carries none.
///
/// Only the fetched-holdings path uses the cached `ai:` entry; a verdict on
/// caller-supplied holdings is computed fresh and never stored.
pub async fn analyze_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let address = validated(&address)?;
    let lang = request.lang.unwrap_or_default();
    let use_cache = !request.refresh.unwrap_or(false);
    let analyzer = state.orchestrator.analyzer();

    let result = match request.holdings {
        Some(holdings) if holdings.is_empty() => small_wallet(address, lang),
        Some(holdings) => analyzer.analyze_uncached(address, &holdings, lang).await,
        None => {
            let holdings = state.orchestrator.holdings().get_holdings(address, use_cache).await;
            if holdings.is_empty() {
                small_wallet(address, lang)
            } else {
                analyzer.analyze(address, &holdings, lang, use_cache).await
            }
        }
    };

    Ok(Json(result))
}

fn small_wallet(address: &str, lang: Language) -> AnalysisResult {
    info!("[AI] No holdings for {}, skipping model", short_address(address));
    small_wallet_analysis(lang)
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/wallet/{address}", get(get_wallet))
        .route("/api/v1/wallet/{address}/holdings", get(get_holdings))
        .route("/api/v1/wallet/{address}/transactions", get(get_transactions))
        .route("/api/v1/wallet/{address}/analyze", post(analyze_wallet))
}
