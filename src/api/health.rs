use axum::{extract::State, Json};
use serde::Serialize;
use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub network: String,
    pub llm: String,
    pub market_trends: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let llm_status = if state.config.llm_enabled() {
        "configured".to_string()
    } else {
        "local-only".to_string()
    };

    let market_status = if state.config.coinmarketcap_api_key.is_some() {
        "configured".to_string()
    } else {
        "missing-key".to_string()
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        network: state.config.solana_network.as_str().to_string(),
        llm: llm_status,
        market_trends: market_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::app_state;

    #[tokio::test]
    async fn health_reports_optional_providers() {
        let Json(health) = health_check(State(app_state(None))).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.network, "devnet");
        assert_eq!(health.llm, "local-only");
        assert_eq!(health.market_trends, "missing-key");
    }
}
