/// Application constants

// Session store
pub const DEFAULT_SESSION_ID: &str = "default";
pub const PREFERRED_TOKENS_CAP: usize = 5;
pub const CONTEXT_RECENT_MESSAGES: usize = 5;

// Wallet data
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;
pub const SOL_FEE_RESERVE: f64 = 0.01;
pub const LOW_BALANCE_TIP_THRESHOLD: f64 = 0.05;
pub const WALLET_CACHE_MAX_ENTRIES: usize = 10_000;
pub const WALLET_CACHE_STALE_SECS: u64 = 600;
pub const CONTEXT_TRANSACTION_LIMIT: usize = 5;
pub const ROUTE_TRANSACTION_LIMIT: usize = 10;
pub const HISTORY_REPLY_LIMIT: usize = 5;
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const SOLANA_EXPLORER_ADDRESS_URL: &str = "https://explorer.solana.com/address";

// Suggestions
pub const CONTEXT_SUGGESTION_CAP: usize = 4;
pub const MATCHER_SUGGESTION_CAP: usize = 3;

// Pricing
pub const PRICE_CACHE_TTL_SECS: u64 = 60;
pub const SWAP_FEE_RATE: f64 = 0.003;
pub const SWAP_SLIPPAGE_RATE: f64 = 0.005;
pub const SOLANA_NETWORK_FEE_SOL: f64 = 0.000005;
pub const TREND_THRESHOLD_PCT: f64 = 1.0;

// Market data
pub const MARKET_TRENDS_CACHE_TTL_SECS: u64 = 120;
pub const MARKET_TRENDS_LIMIT: u32 = 30;
pub const MARKET_DATA_PER_PAGE: u32 = 100;

// External endpoints
pub const DEFAULT_MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_COINMARKETCAP_API_URL: &str = "https://pro-api.coinmarketcap.com/v1";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

// HTTP client timeouts
pub const RPC_TIMEOUT_SECS: u64 = 10;
pub const MARKET_API_TIMEOUT_SECS: u64 = 10;
pub const LLM_TIMEOUT_SECS: u64 = 25;
