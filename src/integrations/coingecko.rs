use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::{MARKET_API_TIMEOUT_SECS, MARKET_DATA_PER_PAGE};
use crate::error::{AppError, Result};

/// Spot price entry returned by `simple/price`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct SimplePrice {
    pub usd: Option<f64>,
    pub usd_24h_change: Option<f64>,
}

/// CoinGecko public API client
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    api_url: String,
    client: reqwest::Client,
}

impl CoinGeckoClient {
    pub fn new(api_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(MARKET_API_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build CoinGecko client: {}", e)))?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// USD prices with 24h change, keyed by CoinGecko id.
    pub async fn simple_price(&self, ids: &[&str]) -> Result<HashMap<String, SimplePrice>> {
        let url = url::Url::parse_with_params(
            &format!("{}/simple/price", self.api_url),
            &[
                ("ids", ids.join(",")),
                ("vs_currencies", "usd".to_string()),
                ("include_24hr_change", "true".to_string()),
            ],
        )
        .map_err(|e| AppError::Internal(format!("Invalid CoinGecko URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Failed to fetch prices: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::ExternalAPI(format!("Price endpoint returned error status: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Invalid price payload: {e}")))
    }

    /// Top coins by market cap, passed through untouched.
    pub async fn markets(&self) -> Result<serde_json::Value> {
        let url = format!(
            "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page=1",
            self.api_url, MARKET_DATA_PER_PAGE
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Failed to fetch markets: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::ExternalAPI(format!("Markets endpoint returned error status: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Invalid markets payload: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_price_payload_deserializes() {
        let payload = serde_json::json!({
            "solana": { "usd": 142.1, "usd_24h_change": -2.5 },
            "bonk": { "usd": 0.000021 }
        });
        let parsed: HashMap<String, SimplePrice> = serde_json::from_value(payload).unwrap();
        assert_eq!(parsed["solana"].usd, Some(142.1));
        assert_eq!(parsed["solana"].usd_24h_change, Some(-2.5));
        assert_eq!(parsed["bonk"].usd_24h_change, None);
    }

    #[test]
    fn new_trims_trailing_slash() {
        let client = CoinGeckoClient::new("https://api.coingecko.com/api/v3/".to_string()).unwrap();
        assert_eq!(client.api_url, "https://api.coingecko.com/api/v3");
    }
}
