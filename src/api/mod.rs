// src/api/mod.rs

pub mod health;
pub mod intent_parser;
pub mod market;
pub mod swap;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::services::{AIService, MarketDataService, PriceOracle, SessionStore, WalletDataCache};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionStore>,
    pub wallets: Arc<WalletDataCache>,
    pub prices: Arc<dyn PriceOracle>,
    pub ai: Arc<AIService>,
    pub market: Arc<MarketDataService>,
}

/// All HTTP routes, without the CORS and tracing layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Chat
        .route("/api/intent-parser", post(intent_parser::parse_intent))
        // Market
        .route(
            "/api/market-data",
            get(market::get_market_data).post(market::post_market_data),
        )
        .route("/api/market-trends", get(market::get_market_trends))
        // Swap
        .route("/api/swap-execution", post(swap::execute_swap))
        .with_state(state)
}

// Internal helper that reads a JS-style truthy flag from loose client JSON.
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}

// Internal helper that keeps only the list entries that deserialize as `T`.
pub(crate) fn lenient_list<T: DeserializeOwned>(value: Option<Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

// Internal helper that reads a non-blank string field.
pub(crate) fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
