use axum::http::HeaderValue;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod integrations;
mod models;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use config::Config;
use constants::LLM_TIMEOUT_SECS;
use integrations::{
    CoinGeckoClient, CoinMarketCapClient, LlmProvider, OpenAiChatProvider, SolanaRpcClient,
};
use services::{
    AIService, CoinGeckoPriceOracle, ContextAssembler, IntentMatcher, MarketDataService,
    PriceOracle, SessionStore, WalletDataCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web3_wallet_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Web3 wallet backend");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Solana network: {} ({})",
        config.solana_network.as_str(),
        config.solana_rpc_url
    );
    if config.is_devnet() {
        tracing::warn!("Running against devnet; balances and prices will not match mainnet");
    }

    let app_state = build_state(config).await?;
    let addr: SocketAddr = format!("{}:{}", app_state.config.host, app_state.config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    // Build router
    let app = build_router(app_state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: Config) -> anyhow::Result<api::AppState> {
    let coingecko = CoinGeckoClient::new(config.coingecko_api_url.clone())?;

    let oracle = Arc::new(CoinGeckoPriceOracle::new(coingecko.clone()));
    match oracle.refresh_all().await {
        Ok(count) => tracing::info!("Warmed {} token prices", count),
        Err(e) => tracing::warn!("Price warm-up failed, using fallbacks until next fetch: {}", e),
    }
    let prices: Arc<dyn PriceOracle> = oracle;

    let rpc = SolanaRpcClient::new(config.solana_rpc_url.clone())?.with_price_oracle(prices.clone());
    let wallets = Arc::new(WalletDataCache::new(
        Arc::new(rpc),
        Duration::from_secs(config.wallet_cache_ttl_secs),
    ));

    let sessions = Arc::new(SessionStore::new(config.max_history_length)?);
    let matcher = Arc::new(IntentMatcher::new(prices.clone(), wallets.clone())?);
    let assembler = Arc::new(ContextAssembler::new(
        sessions.clone(),
        wallets.clone(),
        prices.clone(),
    ));

    let llm: Option<Arc<dyn LlmProvider>> = match config.openai_api_key.as_deref() {
        Some(api_key) => {
            let provider = OpenAiChatProvider::new(
                api_key,
                config.openai_base_url.as_str(),
                config.openai_model.as_str(),
                LLM_TIMEOUT_SECS,
            )?;
            tracing::info!("LLM provider: {} ({})", provider.name(), config.openai_model);
            Some(Arc::new(provider) as Arc<dyn LlmProvider>)
        }
        None => {
            tracing::info!("No LLM provider configured; using local intent matcher only");
            None
        }
    };
    let ai = Arc::new(AIService::new(sessions.clone(), matcher, assembler, llm));

    let coinmarketcap = match config.coinmarketcap_api_key.clone() {
        Some(api_key) => Some(CoinMarketCapClient::new(
            config.coinmarketcap_api_url.clone(),
            api_key,
        )?),
        None => None,
    };
    let market = Arc::new(MarketDataService::new(coingecko, coinmarketcap));

    Ok(api::AppState {
        config,
        sessions,
        wallets,
        prices,
        ai,
        market,
    })
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    api::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
