use serde::Deserialize;
use std::env;

use crate::constants::{
    DEFAULT_COINGECKO_API_URL, DEFAULT_COINMARKETCAP_API_URL, DEFAULT_DEVNET_RPC_URL,
    DEFAULT_MAINNET_RPC_URL, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolanaNetwork {
    Mainnet,
    Devnet,
}

impl SolanaNetwork {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "mainnet" | "mainnet-beta" => Ok(Self::Mainnet),
            "devnet" => Ok(Self::Devnet),
            other => anyhow::bail!("Unsupported SOLANA_NETWORK: {}", other),
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Mainnet => DEFAULT_MAINNET_RPC_URL,
            Self::Devnet => DEFAULT_DEVNET_RPC_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Devnet => "devnet",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Blockchain
    pub solana_network: SolanaNetwork,
    pub solana_rpc_url: String,

    // Market data
    pub coingecko_api_url: String,
    pub coinmarketcap_api_url: String,
    pub coinmarketcap_api_key: Option<String>,

    // LLM provider
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,

    // Limits
    pub request_timeout_secs: u64,
    pub wallet_cache_ttl_secs: u64,
    pub max_history_length: usize,

    // CORS
    pub cors_allowed_origins: String,
}

// Internal helper that treats blank env values as unset.
fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let solana_network =
            SolanaNetwork::parse(&env::var("SOLANA_NETWORK").unwrap_or_default())?;

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            solana_network,
            solana_rpc_url: optional_env("SOLANA_RPC_URL")
                .unwrap_or_else(|| solana_network.default_rpc_url().to_string()),

            coingecko_api_url: optional_env("COINGECKO_API_URL")
                .unwrap_or_else(|| DEFAULT_COINGECKO_API_URL.to_string()),
            coinmarketcap_api_url: optional_env("COINMARKETCAP_API_URL")
                .unwrap_or_else(|| DEFAULT_COINMARKETCAP_API_URL.to_string()),
            coinmarketcap_api_key: optional_env("COINMARKETCAP_API_KEY"),

            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: optional_env("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),

            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            wallet_cache_ttl_secs: env::var("WALLET_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            max_history_length: env::var("MAX_HISTORY_LENGTH")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.solana_rpc_url)
            .map_err(|e| anyhow::anyhow!("SOLANA_RPC_URL is invalid: {}", e))?;
        url::Url::parse(&self.coingecko_api_url)
            .map_err(|e| anyhow::anyhow!("COINGECKO_API_URL is invalid: {}", e))?;
        url::Url::parse(&self.coinmarketcap_api_url)
            .map_err(|e| anyhow::anyhow!("COINMARKETCAP_API_URL is invalid: {}", e))?;

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.wallet_cache_ttl_secs == 0 {
            anyhow::bail!("WALLET_CACHE_TTL_SECS must be > 0");
        }
        if self.max_history_length == 0 {
            anyhow::bail!("MAX_HISTORY_LENGTH must be > 0");
        }

        if self.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; falling back to local intent matching only");
        }
        if self.coinmarketcap_api_key.is_none() {
            tracing::warn!("COINMARKETCAP_API_KEY not set; /api/market-trends will fail");
        }
        if self.solana_rpc_url == self.solana_network.default_rpc_url() {
            tracing::warn!(
                "Using public {} RPC endpoint; expect rate limits",
                self.solana_network.as_str()
            );
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_devnet(&self) -> bool {
        self.solana_network == SolanaNetwork::Devnet
    }

    pub fn llm_enabled(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            solana_network: SolanaNetwork::Devnet,
            solana_rpc_url: DEFAULT_DEVNET_RPC_URL.to_string(),
            coingecko_api_url: DEFAULT_COINGECKO_API_URL.to_string(),
            coinmarketcap_api_url: DEFAULT_COINMARKETCAP_API_URL.to_string(),
            coinmarketcap_api_key: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            request_timeout_secs: 30,
            wallet_cache_ttl_secs: 30,
            max_history_length: 10,
            cors_allowed_origins: "*".to_string(),
        }
    }
}
