use serde::Serialize;

/// Static reference data for the tokens the assistant understands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    pub description: &'static str,
    pub use_cases: &'static str,
    pub price_range: Option<&'static str>,
    pub trend_indicators: &'static [&'static str],
    pub category: &'static str,
    pub year_launched: u16,
    pub market_sentiment: Option<&'static str>,
    pub issuer: Option<&'static str>,
    /// Mainnet mint; `None` for native SOL.
    pub mint: Option<&'static str>,
    pub coingecko_id: &'static str,
}

pub const SUPPORTED_TOKENS: &[TokenInfo] = &[
    TokenInfo {
        symbol: "SOL",
        name: "Solana",
        decimals: 9,
        description: "Native token of the Solana blockchain, known for high throughput and low fees",
        use_cases: "Transaction fees, staking, governance, DeFi collateral",
        price_range: Some("$20-$100 historically"),
        trend_indicators: &["Ecosystem growth", "Developer activity", "DeFi TVL"],
        category: "L1 blockchain",
        year_launched: 2020,
        market_sentiment: Some("Bullish after 2023 recovery"),
        issuer: None,
        mint: None,
        coingecko_id: "solana",
    },
    TokenInfo {
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        description: "A regulated stablecoin pegged to the US dollar issued by Circle",
        use_cases: "Store of value, trading pairs, cross-border payments, yield farming",
        price_range: Some("~$1.00 (stablecoin)"),
        trend_indicators: &["Regulatory compliance", "Corporate adoption"],
        category: "Stablecoin",
        year_launched: 2018,
        market_sentiment: None,
        issuer: Some("Circle"),
        mint: Some("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
        coingecko_id: "usd-coin",
    },
    TokenInfo {
        symbol: "USDT",
        name: "Tether",
        decimals: 6,
        description: "The largest stablecoin by market cap, pegged to the US dollar",
        use_cases: "Trading pairs, store of value, global payments",
        price_range: Some("~$1.00 (stablecoin)"),
        trend_indicators: &["Exchange reserves", "Regulatory scrutiny"],
        category: "Stablecoin",
        year_launched: 2014,
        market_sentiment: None,
        issuer: Some("Tether Limited"),
        mint: Some("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB"),
        coingecko_id: "tether",
    },
    TokenInfo {
        symbol: "BONK",
        name: "Bonk",
        decimals: 5,
        description: "A community-focused Solana meme coin with the Shiba Inu dog mascot",
        use_cases: "Community engagement, tipping, NFT purchases on Solana",
        price_range: Some("High volatility meme token"),
        trend_indicators: &[
            "Social media mentions",
            "Community engagement",
            "Whale movements",
        ],
        category: "Meme coin",
        year_launched: 2022,
        market_sentiment: Some("Cyclical hype patterns"),
        issuer: None,
        mint: Some("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"),
        coingecko_id: "bonk",
    },
    TokenInfo {
        symbol: "JUP",
        name: "Jupiter",
        decimals: 6,
        description: "Governance token for Jupiter, Solana's leading DEX aggregator",
        use_cases: "Governance, fee sharing, liquidity provision incentives",
        price_range: Some("Trending upward since 2024 launch"),
        trend_indicators: &["Trading volume", "TVL growth", "Protocol revenue"],
        category: "DEX token",
        year_launched: 2024,
        market_sentiment: Some("Strong as leading Solana DEX"),
        issuer: None,
        mint: Some("JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN"),
        coingecko_id: "jupiter-exchange-solana",
    },
    TokenInfo {
        symbol: "JTO",
        name: "Jito",
        decimals: 9,
        description: "Governance token for Jito's MEV infrastructure on Solana",
        use_cases: "Governance, staking, revenue sharing",
        price_range: Some("Stable with growth potential"),
        trend_indicators: &["Validator adoption", "Solana block production stats"],
        category: "Infrastructure token",
        year_launched: 2023,
        market_sentiment: Some("Technical adoption focus"),
        issuer: None,
        mint: Some("jtojtomepa8beP8AuQc6eXt5FriJwfFMwQx2v2f9mCL"),
        coingecko_id: "jito-governance-token",
    },
    TokenInfo {
        symbol: "RAY",
        name: "Raydium",
        decimals: 6,
        description: "AMM and liquidity provider on Solana with concentrated liquidity features",
        use_cases: "Trading, liquidity provision, yield farming",
        price_range: Some("DeFi token with moderate volatility"),
        trend_indicators: &["TVL", "Trading fees generated", "New pool launches"],
        category: "DEX token",
        year_launched: 2021,
        market_sentiment: Some("Recovering alongside Solana DeFi ecosystem"),
        issuer: None,
        mint: Some("4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R"),
        coingecko_id: "raydium",
    },
    TokenInfo {
        symbol: "PYTH",
        name: "Pyth Network",
        decimals: 6,
        description: "Oracle protocol providing real-time market data across blockchains",
        use_cases: "Governance, staking for data validation",
        price_range: None,
        trend_indicators: &["Cross-chain integrations", "Data provider partnerships"],
        category: "Oracle token",
        year_launched: 2023,
        market_sentiment: Some("Growth with DeFi adoption"),
        issuer: None,
        mint: Some("HZ1JovNiVvGrGNiiYvEozEVgZ58xaU3RKwX8eACQBCt3"),
        coingecko_id: "pyth-network",
    },
    TokenInfo {
        symbol: "MEME",
        name: "Memecoin",
        decimals: 6,
        description: "Multi-chain meme token focused on internet culture and humor",
        use_cases: "Community engagement, memetic value",
        price_range: Some("Highly volatile, follows meme cycles"),
        trend_indicators: &[
            "Social media virality",
            "Celebrity mentions",
            "New exchange listings",
        ],
        category: "Meme coin",
        year_launched: 2023,
        market_sentiment: Some("Follows broader meme coin trends"),
        issuer: None,
        mint: None,
        coingecko_id: "memecoin-2",
    },
    TokenInfo {
        symbol: "WIF",
        name: "Dogwifhat",
        decimals: 6,
        description: "Solana meme coin featuring a dog wearing a pink hat, went viral in 2023",
        use_cases: "Community status, NFT integration",
        price_range: Some("Extremely volatile, reached major peaks in 2023-2024"),
        trend_indicators: &["Twitter mentions", "Influencer activity", "New listings"],
        category: "Meme coin",
        year_launched: 2023,
        market_sentiment: Some("One of Solana's most successful meme coins"),
        issuer: None,
        mint: Some("EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm"),
        coingecko_id: "dogwifcoin",
    },
];

pub fn token_info(symbol: &str) -> Option<&'static TokenInfo> {
    SUPPORTED_TOKENS
        .iter()
        .find(|token| token.symbol.eq_ignore_ascii_case(symbol.trim()))
}

pub fn token_by_mint(mint: &str) -> Option<&'static TokenInfo> {
    SUPPORTED_TOKENS
        .iter()
        .find(|token| token.mint == Some(mint))
}

pub fn is_supported_token(symbol: &str) -> bool {
    token_info(symbol).is_some()
}

/// Comma separated list of supported symbols, in table order.
pub fn supported_symbols() -> String {
    SUPPORTED_TOKENS
        .iter()
        .map(|token| token.symbol)
        .collect::<Vec<_>>()
        .join(", ")
}
