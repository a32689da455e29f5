use serde::{Deserialize, Serialize};

use super::wallet::{TokenBalance, WalletTransaction};

// ==================== INTENTS ====================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapIntent {
    pub amount: String,
    pub from_token: String,
    pub to_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<String>,
    /// Set to "100%" for "swap all" requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
}

/// Structured action extracted from free text, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Intent {
    Swap(SwapIntent),
    Balance {
        address: Option<String>,
    },
    Price {
        token: String,
        price: f64,
    },
    History {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transactions: Option<Vec<WalletTransaction>>,
    },
    TokenInfo {
        token: String,
    },
    MarketTrends,
    Help,
}

impl Intent {
    pub fn action(&self) -> &'static str {
        match self {
            Intent::Swap(_) => "swap",
            Intent::Balance { .. } => "balance",
            Intent::Price { .. } => "price",
            Intent::History { .. } => "history",
            Intent::TokenInfo { .. } => "tokenInfo",
            Intent::MarketTrends => "marketTrends",
            Intent::Help => "help",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentResult {
    pub message: String,
    pub intent: Option<Intent>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl IntentResult {
    pub fn new(message: impl Into<String>, intent: Option<Intent>) -> Self {
        Self {
            message: message.into(),
            intent,
            suggestions: Vec::new(),
        }
    }

    pub fn without_intent(message: impl Into<String>) -> Self {
        Self::new(message, None)
    }
}

/// Wallet facts the matcher handlers can see.
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
    pub wallet_connected: bool,
    pub wallet_address: Option<String>,
    pub balance: f64,
    pub token_balances: Vec<TokenBalance>,
    /// Most recently mentioned tokens first, from the session profile.
    pub preferred_tokens: Vec<String>,
}

impl MatchContext {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(address: impl Into<String>, balance: f64) -> Self {
        Self {
            wallet_connected: true,
            wallet_address: Some(address.into()),
            balance,
            ..Self::default()
        }
    }

    pub fn with_tokens(mut self, token_balances: Vec<TokenBalance>) -> Self {
        self.token_balances = token_balances;
        self
    }
}
