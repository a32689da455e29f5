use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    error::{AppError, Result},
    models::MarketTrendsResponse,
};

use super::AppState;

/// GET /api/market-data
pub async fn get_market_data(State(state): State<AppState>) -> Result<Json<Value>> {
    let data = state.market.markets().await?;
    Ok(Json(data))
}

/// POST /api/market-data
pub async fn post_market_data() -> Result<Json<Value>> {
    Err(AppError::NotImplemented)
}

/// GET /api/market-trends
pub async fn get_market_trends(
    State(state): State<AppState>,
) -> Result<Json<MarketTrendsResponse>> {
    let trends = state.market.trends().await?;
    tracing::debug!("Serving {} market listings", trends.data.len());
    Ok(Json(trends))
}
