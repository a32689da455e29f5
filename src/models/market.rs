use serde::{Deserialize, Serialize};

// ==================== MARKET TRENDS ====================
// Upstream listings are deserialized straight into these types, which keeps
// only the fields the UI reads.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrendsResponse {
    pub data: Vec<CoinListing>,
    pub status: ListingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinListing {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub quote: ListingQuote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingQuote {
    #[serde(rename = "USD")]
    pub usd: UsdQuote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsdQuote {
    pub price: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingStatus {
    pub timestamp: String,
    pub error_code: i64,
    pub error_message: Option<String>,
}
