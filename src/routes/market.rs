use axum::{Router, extract::State, response::Json, routing::get};

use crate::server::AppState;
use crate::wallet::types::MarketStats;

/// SOL price and network TPS, cached for a few seconds
pub async fn get_market_stats(State(state): State<AppState>) -> Json<MarketStats> {
    Json(state.market.get_market_stats().await)
}

pub fn create_routes() -> Router<AppState> {
    Router::new().route("/api/v1/market/stats", get(get_market_stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::test_support::{FakeAnalysis, FakeAssets, FakeMarket, FakeTransactions, state_with};

    #[tokio::test]
    async fn serves_camel_case_stats() {
        let state = state_with(
            Arc::new(FakeAssets::new(vec![None])),
            Arc::new(FakeTransactions::new(vec![None])),
            Arc::new(FakeAnalysis::new(vec![None])),
            Arc::new(FakeMarket::new(vec![Some(172.5)], vec![Some(3200.0)])),
        );

        let response = create_routes()
            .with_state(state)
            .oneshot(Request::builder().uri("/api/v1/market/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "solPrice": 172.5, "tps": 3200.0 }));
    }
}
