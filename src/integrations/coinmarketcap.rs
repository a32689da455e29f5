use std::time::Duration;

use crate::constants::MARKET_API_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::models::MarketTrendsResponse;

const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// CoinMarketCap pro API client. Requires an API key.
#[derive(Debug, Clone)]
pub struct CoinMarketCapClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl CoinMarketCapClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(MARKET_API_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to build CoinMarketCap client: {}", e))
            })?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Latest listings, trimmed to the fields in `MarketTrendsResponse`.
    /// Non-2xx answers surface as `AppError::Upstream` with the upstream status.
    pub async fn latest_listings(&self, limit: u32) -> Result<MarketTrendsResponse> {
        let url = format!(
            "{}/cryptocurrency/listings/latest?limit={}",
            self.api_url, limit
        );

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("CoinMarketCap request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("CoinMarketCap API error ({}): {}", status, error_text);
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: "Failed to fetch market data".to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Invalid CoinMarketCap payload: {e}")))
    }
}
