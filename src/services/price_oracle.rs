// Token prices with a short-lived cache and deterministic fallbacks.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::constants::{PRICE_CACHE_TTL_SECS, SWAP_FEE_RATE, TREND_THRESHOLD_PCT};
use crate::error::{AppError, Result};
use crate::integrations::CoinGeckoClient;
use crate::models::token::{token_info, SUPPORTED_TOKENS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub price: f64,
    pub change_24h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Up,
    Down,
    Stable,
}

impl PriceTrend {
    pub fn from_change(change_24h: f64) -> Self {
        if change_24h > TREND_THRESHOLD_PCT {
            PriceTrend::Up
        } else if change_24h < -TREND_THRESHOLD_PCT {
            PriceTrend::Down
        } else {
            PriceTrend::Stable
        }
    }
}

/// Output of a price-based swap estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapValueEstimate {
    pub estimated_value: f64,
    /// Percent, e.g. `0.5` means 0.5%.
    pub price_impact: f64,
    pub trend: PriceTrend,
    pub from_price_usd: f64,
    pub to_price_usd: f64,
}

#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// USD quote for a supported token symbol.
    async fn quote(&self, symbol: &str) -> Result<PriceQuote>;
}

// Internal helper that normalizes symbols for price lookups.
pub fn normalize_symbol(token: &str) -> String {
    token.trim().to_ascii_uppercase()
}

// Internal helper that provides deterministic fallback prices.
pub fn fallback_price_for(token: &str) -> f64 {
    match normalize_symbol(token).as_str() {
        "SOL" => 150.0,
        "USDT" | "USDC" => 1.0,
        "BONK" => 0.00002,
        "JUP" => 0.8,
        "JTO" => 2.5,
        "RAY" => 1.8,
        "PYTH" => 0.35,
        "MEME" => 0.01,
        "WIF" => 1.5,
        _ => 0.0,
    }
}

// Internal helper that returns sane min/max USD bounds for known assets.
fn bounds_for(token: &str) -> (f64, f64) {
    match normalize_symbol(token).as_str() {
        "USDT" | "USDC" => (0.5, 2.0),
        "SOL" => (0.1, 100_000.0),
        "BONK" => (0.000_000_01, 1.0),
        _ => (0.000_000_01, 1_000_000.0),
    }
}

// Internal helper that validates a raw USD price.
pub fn sanitize_price_usd(token: &str, value: f64) -> Option<f64> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    let (min, max) = bounds_for(token);
    if value < min || value > max {
        return None;
    }
    Some(value)
}

/// Price impact tiers by USD notional.
pub fn price_impact_for(usd_value: f64) -> f64 {
    if usd_value < 1_000.0 {
        0.0
    } else if usd_value < 10_000.0 {
        0.1
    } else if usd_value < 100_000.0 {
        0.5
    } else {
        1.5
    }
}

/// Estimates the output of swapping `amount` of `from` into `to` after the
/// pool fee.
pub async fn estimate_swap(
    prices: &dyn PriceOracle,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<SwapValueEstimate> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::BadRequest(format!("Invalid swap amount: {}", amount)));
    }
    let from_quote = prices.quote(from).await?;
    let to_quote = prices.quote(to).await?;
    if to_quote.price <= 0.0 {
        return Err(AppError::Internal(format!("No usable price for {}", to)));
    }

    let usd_value = amount * from_quote.price;
    let estimated_value = usd_value / to_quote.price * (1.0 - SWAP_FEE_RATE);

    Ok(SwapValueEstimate {
        estimated_value,
        price_impact: price_impact_for(usd_value),
        trend: PriceTrend::from_change(to_quote.change_24h),
        from_price_usd: from_quote.price,
        to_price_usd: to_quote.price,
    })
}

#[derive(Debug, Clone, Copy)]
struct CachedQuote {
    fetched_at: Instant,
    quote: PriceQuote,
}

/// CoinGecko-backed oracle. Quotes are cached per symbol; a failed fetch
/// falls back to the static price table so callers always get a number for
/// supported tokens.
pub struct CoinGeckoPriceOracle {
    client: CoinGeckoClient,
    ttl: Duration,
    cache: RwLock<HashMap<String, CachedQuote>>,
}

impl CoinGeckoPriceOracle {
    pub fn new(client: CoinGeckoClient) -> Self {
        Self {
            client,
            ttl: Duration::from_secs(PRICE_CACHE_TTL_SECS),
            cache: RwLock::new(HashMap::new()),
        }
    }

    async fn cached(&self, symbol: &str) -> Option<PriceQuote> {
        let guard = self.cache.read().await;
        let entry = guard.get(symbol)?;
        if entry.fetched_at.elapsed() < self.ttl {
            return Some(entry.quote);
        }
        None
    }

    /// Refreshes every supported token in one request.
    pub async fn refresh_all(&self) -> Result<usize> {
        let ids: Vec<&str> = SUPPORTED_TOKENS.iter().map(|t| t.coingecko_id).collect();
        let prices = self.client.simple_price(&ids).await?;

        let now = Instant::now();
        let mut guard = self.cache.write().await;
        let mut updated = 0;
        for token in SUPPORTED_TOKENS {
            let Some(entry) = prices.get(token.coingecko_id) else {
                continue;
            };
            let Some(price) = entry.usd.and_then(|p| sanitize_price_usd(token.symbol, p)) else {
                continue;
            };
            guard.insert(
                token.symbol.to_string(),
                CachedQuote {
                    fetched_at: now,
                    quote: PriceQuote {
                        price,
                        change_24h: entry.usd_24h_change.unwrap_or(0.0),
                    },
                },
            );
            updated += 1;
        }
        Ok(updated)
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoPriceOracle {
    async fn quote(&self, symbol: &str) -> Result<PriceQuote> {
        let symbol = normalize_symbol(symbol);
        let token = token_info(&symbol)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported token: {}", symbol)))?;

        if let Some(quote) = self.cached(&symbol).await {
            return Ok(quote);
        }

        match self.client.simple_price(&[token.coingecko_id]).await {
            Ok(prices) => {
                let fetched = prices.get(token.coingecko_id).and_then(|entry| {
                    let price = sanitize_price_usd(&symbol, entry.usd?)?;
                    Some(PriceQuote {
                        price,
                        change_24h: entry.usd_24h_change.unwrap_or(0.0),
                    })
                });
                if let Some(quote) = fetched {
                    self.cache.write().await.insert(
                        symbol.clone(),
                        CachedQuote {
                            fetched_at: Instant::now(),
                            quote,
                        },
                    );
                    return Ok(quote);
                }
                tracing::warn!("CoinGecko returned no usable price for {}", symbol);
            }
            Err(e) => {
                tracing::warn!("Price fetch failed for {}: {}", symbol, e);
            }
        }

        Ok(PriceQuote {
            price: fallback_price_for(&symbol),
            change_24h: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticPriceOracle;

    #[test]
    fn trend_uses_one_percent_band() {
        assert_eq!(PriceTrend::from_change(2.5), PriceTrend::Up);
        assert_eq!(PriceTrend::from_change(-1.5), PriceTrend::Down);
        assert_eq!(PriceTrend::from_change(0.9), PriceTrend::Stable);
        assert_eq!(PriceTrend::from_change(-1.0), PriceTrend::Stable);
    }

    #[test]
    fn fallback_prices_cover_supported_tokens() {
        // Memastikan semua token yang didukung punya harga cadangan
        for token in SUPPORTED_TOKENS {
            assert!(fallback_price_for(token.symbol) > 0.0, "{}", token.symbol);
        }
        assert_eq!(fallback_price_for("doge"), 0.0);
    }

    #[test]
    fn sanitize_rejects_depegged_stablecoin() {
        assert_eq!(sanitize_price_usd("USDC", 0.2), None);
        assert_eq!(sanitize_price_usd("USDC", 0.999), Some(0.999));
        assert_eq!(sanitize_price_usd("SOL", f64::NAN), None);
    }

    #[test]
    fn price_impact_grows_with_notional() {
        assert_eq!(price_impact_for(150.0), 0.0);
        assert_eq!(price_impact_for(5_000.0), 0.1);
        assert_eq!(price_impact_for(50_000.0), 0.5);
        assert_eq!(price_impact_for(500_000.0), 1.5);
    }

    #[tokio::test]
    async fn estimate_swap_applies_pool_fee() {
        let oracle = StaticPriceOracle::default();
        let estimate = estimate_swap(&oracle, "SOL", "USDC", 1.0).await.unwrap();
        // 1 SOL at $150 into USDC at $1, minus 0.3%
        assert!((estimate.estimated_value - 149.55).abs() < 1e-9);
        assert_eq!(estimate.from_price_usd, 150.0);
        assert_eq!(estimate.trend, PriceTrend::Stable);
        assert_eq!(estimate.price_impact, 0.0);
    }

    #[tokio::test]
    async fn estimate_swap_propagates_oracle_failure() {
        let oracle = StaticPriceOracle::failing();
        assert!(estimate_swap(&oracle, "SOL", "USDC", 1.0).await.is_err());
    }

    #[tokio::test]
    async fn unsupported_symbol_is_rejected_without_fetching() {
        let client = CoinGeckoClient::new("http://127.0.0.1:9".to_string()).unwrap();
        let oracle = CoinGeckoPriceOracle::new(client);
        let err = oracle.quote("DOGE").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_to_static_price() {
        let client = CoinGeckoClient::new("http://127.0.0.1:9".to_string()).unwrap();
        let oracle = CoinGeckoPriceOracle::new(client);
        let quote = oracle.quote("sol").await.unwrap();
        assert_eq!(quote.price, fallback_price_for("SOL"));
        assert_eq!(quote.change_24h, 0.0);
    }
}
