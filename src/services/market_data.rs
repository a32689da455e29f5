use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::constants::{MARKET_TRENDS_CACHE_TTL_SECS, MARKET_TRENDS_LIMIT};
use crate::error::{AppError, Result};
use crate::integrations::{CoinGeckoClient, CoinMarketCapClient};
use crate::models::MarketTrendsResponse;

const MARKET_DATA_FAILED: &str = "Failed to fetch market data";

#[derive(Debug, Clone)]
struct CachedTrends {
    fetched_at: Instant,
    response: MarketTrendsResponse,
}

/// Market overview for the UI: CoinGecko markets passthrough and
/// CoinMarketCap listings reused for a short window.
pub struct MarketDataService {
    coingecko: CoinGeckoClient,
    coinmarketcap: Option<CoinMarketCapClient>,
    trends_ttl: Duration,
    trends: RwLock<Option<CachedTrends>>,
}

impl MarketDataService {
    pub fn new(coingecko: CoinGeckoClient, coinmarketcap: Option<CoinMarketCapClient>) -> Self {
        Self {
            coingecko,
            coinmarketcap,
            trends_ttl: Duration::from_secs(MARKET_TRENDS_CACHE_TTL_SECS),
            trends: RwLock::new(None),
        }
    }

    /// Raw `coins/markets` payload.
    pub async fn markets(&self) -> Result<serde_json::Value> {
        self.coingecko.markets().await.map_err(|e| {
            tracing::error!("Market data fetch failed: {}", e);
            AppError::Upstream {
                status: 500,
                message: MARKET_DATA_FAILED.to_string(),
            }
        })
    }

    /// Latest listings. Fails with `NotConfigured` when no API key is set,
    /// before any cache lookup.
    pub async fn trends(&self) -> Result<MarketTrendsResponse> {
        let client = self.coinmarketcap.as_ref().ok_or_else(|| {
            tracing::error!("CoinMarketCap API key not found");
            AppError::NotConfigured("API key not configured".to_string())
        })?;

        if let Some(cached) = self.trends.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.trends_ttl {
                return Ok(cached.response.clone());
            }
        }

        let response = client
            .latest_listings(MARKET_TRENDS_LIMIT)
            .await
            .map_err(|e| match e {
                AppError::Upstream { .. } => e,
                other => {
                    tracing::error!("Error fetching from CoinMarketCap: {}", other);
                    AppError::Upstream {
                        status: 500,
                        message: MARKET_DATA_FAILED.to_string(),
                    }
                }
            })?;

        *self.trends.write().await = Some(CachedTrends {
            fetched_at: Instant::now(),
            response: response.clone(),
        });
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::market::{CoinListing, ListingQuote, ListingStatus, UsdQuote};

    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn listings() -> MarketTrendsResponse {
        MarketTrendsResponse {
            data: vec![CoinListing {
                id: 5426,
                name: "Solana".to_string(),
                symbol: "SOL".to_string(),
                quote: ListingQuote {
                    usd: UsdQuote {
                        price: Some(150.0),
                        percent_change_24h: Some(2.1),
                        percent_change_7d: Some(-4.0),
                        market_cap: Some(7.0e10),
                        volume_24h: Some(3.0e9),
                    },
                },
            }],
            status: ListingStatus {
                timestamp: "2024-01-01T00:00:00.000Z".to_string(),
                error_code: 0,
                error_message: None,
            },
        }
    }

    fn service(with_key: bool) -> MarketDataService {
        let coingecko = CoinGeckoClient::new(UNREACHABLE.to_string()).unwrap();
        let coinmarketcap = with_key.then(|| {
            CoinMarketCapClient::new(UNREACHABLE.to_string(), "test-key".to_string()).unwrap()
        });
        MarketDataService::new(coingecko, coinmarketcap)
    }

    #[tokio::test]
    async fn trends_without_key_is_not_configured() {
        // Memastikan tanpa API key langsung gagal, bahkan jika cache terisi
        let service = service(false);
        *service.trends.write().await = Some(CachedTrends {
            fetched_at: Instant::now(),
            response: listings(),
        });
        let err = service.trends().await.unwrap_err();
        assert!(matches!(err, AppError::NotConfigured(ref msg) if msg == "API key not configured"));
    }

    #[tokio::test(start_paused = true)]
    async fn trends_are_served_from_cache_within_window() {
        let service = service(true);
        *service.trends.write().await = Some(CachedTrends {
            fetched_at: Instant::now(),
            response: listings(),
        });

        tokio::time::advance(Duration::from_secs(119)).await;
        assert_eq!(service.trends().await.unwrap(), listings());
    }

    #[tokio::test]
    async fn unreachable_upstream_maps_to_market_data_error() {
        let service = service(true);
        let err = service.trends().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Upstream { status: 500, ref message } if message == MARKET_DATA_FAILED
        ));

        let err = service.markets().await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 500, .. }));
    }
}
