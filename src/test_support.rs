// Shared test doubles for the wallet provider, price oracle and LLM seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::AppState;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::integrations::{CoinGeckoClient, CoinMarketCapClient, LlmProvider};
use crate::models::{ChatMessage, TokenBalance, TransactionKind, WalletBalances, WalletTransaction};
use crate::services::price_oracle::{PriceOracle, PriceQuote};
use crate::services::wallet_cache::{WalletDataCache, WalletDataProvider};
use crate::services::{AIService, ContextAssembler, IntentMatcher, MarketDataService, SessionStore};

pub(crate) const WALLET: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

pub(crate) fn sample_balances() -> WalletBalances {
    WalletBalances {
        sol_balance: 2.5,
        token_balances: vec![TokenBalance {
            symbol: "USDC".to_string(),
            mint: Some("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string()),
            balance: 40.0,
            decimals: Some(6),
            usd_value: Some(40.0),
        }],
    }
}

pub(crate) fn sample_transactions() -> Vec<WalletTransaction> {
    vec![
        WalletTransaction {
            signature: "sig-swap".to_string(),
            timestamp: 1_700_000_000,
            tx_type: TransactionKind::Swap,
            amount: "0.5000".to_string(),
            from_token: "SOL".to_string(),
            to_token: Some("USDC".to_string()),
            status: "confirmed".to_string(),
            description: "Swapped 0.5000 SOL to USDC".to_string(),
        },
        WalletTransaction {
            signature: "sig-transfer".to_string(),
            timestamp: 1_699_000_000,
            tx_type: TransactionKind::Transfer,
            amount: "0.1000".to_string(),
            from_token: "SOL".to_string(),
            to_token: None,
            status: "confirmed".to_string(),
            description: "Transferred 0.1000 SOL".to_string(),
        },
    ]
}

/// Wallet provider with canned data, call counters and a failure switch.
pub(crate) struct StubWalletProvider {
    balances: WalletBalances,
    transactions: Vec<WalletTransaction>,
    failing: AtomicBool,
    balance_calls: AtomicUsize,
    transaction_calls: AtomicUsize,
}

impl StubWalletProvider {
    pub(crate) fn new(balances: WalletBalances) -> Self {
        Self {
            balances,
            transactions: Vec::new(),
            failing: AtomicBool::new(false),
            balance_calls: AtomicUsize::new(0),
            transaction_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        let provider = Self::new(WalletBalances::default());
        provider.set_failing(true);
        provider
    }

    pub(crate) fn with_transactions(mut self, transactions: Vec<WalletTransaction>) -> Self {
        self.transactions = transactions;
        self
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn transaction_calls(&self) -> usize {
        self.transaction_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletDataProvider for StubWalletProvider {
    async fn get_wallet_data(&self, _address: &str) -> Result<WalletBalances> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::BlockchainRPC("connection refused".to_string()));
        }
        Ok(self.balances.clone())
    }

    async fn get_recent_transactions(
        &self,
        _address: &str,
        limit: usize,
    ) -> Result<Vec<WalletTransaction>> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::BlockchainRPC("connection refused".to_string()));
        }
        Ok(self.transactions.iter().take(limit).cloned().collect())
    }
}

/// Fixed prices; SOL 150, stablecoins 1, BONK 0.00002.
pub(crate) struct StaticPriceOracle {
    quotes: HashMap<String, PriceQuote>,
    failing: bool,
}

impl Default for StaticPriceOracle {
    fn default() -> Self {
        let quotes = [
            ("SOL", 150.0, 0.0),
            ("USDC", 1.0, 0.0),
            ("USDT", 1.0, 0.0),
            ("BONK", 0.00002, 5.0),
            ("JUP", 0.8, -3.0),
            ("WIF", 1.5, 0.0),
        ]
        .into_iter()
        .map(|(symbol, price, change_24h)| (symbol.to_string(), PriceQuote { price, change_24h }))
        .collect();
        Self {
            quotes,
            failing: false,
        }
    }
}

impl StaticPriceOracle {
    pub(crate) fn failing() -> Self {
        Self {
            quotes: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn quote(&self, symbol: &str) -> Result<PriceQuote> {
        if self.failing {
            return Err(AppError::ExternalAPI("price feed unavailable".to_string()));
        }
        self.quotes
            .get(&symbol.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported token: {}", symbol)))
    }
}

/// LLM double that replays a fixed reply (or error) and records what it saw.
pub(crate) struct ScriptedLlm {
    reply: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl ScriptedLlm {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            reply: None,
            delay: None,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages
            .lock()
            .expect("scripted llm lock should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_messages
            .lock()
            .expect("scripted llm lock should not be poisoned") = messages;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply
            .clone()
            .ok_or_else(|| AppError::LlmProvider("scripted failure".to_string()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub(crate) fn wallet_cache(provider: Arc<StubWalletProvider>) -> Arc<WalletDataCache> {
    let ttl = Duration::from_secs(Config::for_tests().wallet_cache_ttl_secs);
    Arc::new(WalletDataCache::new(provider, ttl))
}

/// Port 9 (discard) refuses connections, so upstream calls fail fast.
pub(crate) const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Full route state over test doubles; market clients point at
/// `UNREACHABLE_URL`.
pub(crate) fn app_state_with(
    provider: Arc<StubWalletProvider>,
    llm: Option<Arc<ScriptedLlm>>,
    config: Config,
) -> AppState {
    let sessions = Arc::new(SessionStore::new(config.max_history_length).unwrap());
    let wallets = Arc::new(WalletDataCache::new(
        provider,
        Duration::from_secs(config.wallet_cache_ttl_secs),
    ));
    let prices: Arc<dyn PriceOracle> = Arc::new(StaticPriceOracle::default());
    let matcher = Arc::new(IntentMatcher::new(prices.clone(), wallets.clone()).unwrap());
    let assembler = Arc::new(ContextAssembler::new(
        sessions.clone(),
        wallets.clone(),
        prices.clone(),
    ));
    let ai = Arc::new(AIService::new(
        sessions.clone(),
        matcher,
        assembler,
        llm.map(|llm| llm as Arc<dyn LlmProvider>),
    ));
    let coinmarketcap = config.coinmarketcap_api_key.clone().map(|key| {
        CoinMarketCapClient::new(UNREACHABLE_URL.to_string(), key).unwrap()
    });
    let market = Arc::new(MarketDataService::new(
        CoinGeckoClient::new(UNREACHABLE_URL.to_string()).unwrap(),
        coinmarketcap,
    ));

    AppState {
        config,
        sessions,
        wallets,
        prices,
        ai,
        market,
    }
}

pub(crate) fn app_state(llm: Option<Arc<ScriptedLlm>>) -> AppState {
    let provider = StubWalletProvider::new(sample_balances()).with_transactions(sample_transactions());
    app_state_with(Arc::new(provider), llm, Config::for_tests())
}
