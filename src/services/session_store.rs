// In-memory sessions: chat history plus the profile inferred from it.

use std::collections::HashMap;

use regex::Regex;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{ChatMessage, ChatRole, ExpertiseLevel, Session, UserProfile};

const ADVANCED_TERMS: &[&str] = &[
    "liquidity pool",
    "impermanent loss",
    "yield farming",
    "amm",
    "slippage tolerance",
    "tokenomics",
    "staking",
    "gdp",
    "market cap",
    "mev",
    "jito",
    "flashbots",
    "arbitrage",
    "derivative",
    "options",
    "futures",
    "tvl",
    "order book",
    "liquidity",
    "consensus",
    "mempool",
    "gas optimization",
    "validator",
];

const INTERMEDIATE_TERMS: &[&str] = &[
    "defi",
    "staking",
    "wallet",
    "blockchain",
    "transaction",
    "nft",
    "token",
    "crypto",
    "exchange",
    "market",
    "trading",
    "network",
    "gas fee",
    "chain",
    "block",
];

const TOKEN_PATTERNS: &[&str] = &[
    r"\b(sol|solana)\b",
    r"\b(usdc|usd coin)\b",
    r"\b(usdt|tether)\b",
    r"\b(bonk)\b",
    r"\b(jup|jupiter)\b",
    r"\b(jto)\b",
    r"\b(ray|raydium)\b",
    r"\b(wif|dogwifhat)\b",
    r"\b(meme)\b",
];

const INTEREST_PATTERNS: &[(&str, &str)] = &[
    (
        r"\b(defi|yield|farming|staking|liquidity|pool|swap|exchange|dex)\b",
        "defi",
    ),
    (
        r"\b(nft|collectible|art|pfp|jpeg|collection|creator|rarity)\b",
        "nft",
    ),
    (
        r"\b(dao|governance|voting|proposal|vote|community|token holder)\b",
        "governance",
    ),
    (r"\b(meme|dog coin|pepe|doge|shib|bonk|wif)\b", "meme coins"),
    (
        r"\b(trade|trading|chart|candle|technical|indicator|resistance|support)\b",
        "trading",
    ),
    (
        r"\b(security|safety|hack|exploit|vulnerability|risk|protect)\b",
        "security",
    ),
];

fn normalize_token(raw: &str) -> String {
    match raw {
        "solana" => "SOL".to_string(),
        "usd coin" => "USDC".to_string(),
        "tether" => "USDT".to_string(),
        "jupiter" => "JUP".to_string(),
        "raydium" => "RAY".to_string(),
        "dogwifhat" => "WIF".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

fn contains_any_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Keyword guess of what the user is after, kept for analytics.
pub fn detect_intent(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();

    if contains_any_keyword(&lower, &["swap", "exchange", "trade", "convert"]) {
        Some("swap")
    } else if contains_any_keyword(&lower, &["balance", "portfolio", "holding"]) {
        Some("balance")
    } else if contains_any_keyword(&lower, &["history", "transaction", "recent", "activity"]) {
        Some("history")
    } else if contains_any_keyword(&lower, &["price", "worth", "value", "cost"]) {
        Some("price")
    } else if contains_any_keyword(&lower, &["trend", "market", "chart"]) {
        Some("market")
    } else {
        None
    }
}

struct ProfilePatterns {
    tokens: Vec<Regex>,
    interests: Vec<(Regex, &'static str)>,
}

impl ProfilePatterns {
    fn compile() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| AppError::Internal(format!("Invalid profile pattern {}: {}", pattern, e)))
        };
        let tokens = TOKEN_PATTERNS
            .iter()
            .map(|pattern| compile(*pattern))
            .collect::<Result<Vec<_>>>()?;
        let interests = INTEREST_PATTERNS
            .iter()
            .map(|(pattern, interest)| Ok((compile(*pattern)?, *interest)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tokens, interests })
    }

    fn analyze(&self, profile: &mut UserProfile, text: &str) {
        let lower = text.to_lowercase();

        if contains_any_keyword(&lower, ADVANCED_TERMS) {
            profile.raise_expertise(ExpertiseLevel::Advanced);
        }
        if profile.expertise_level != ExpertiseLevel::Advanced
            && contains_any_keyword(&lower, INTERMEDIATE_TERMS)
        {
            profile.raise_expertise(ExpertiseLevel::Intermediate);
        }

        for pattern in &self.tokens {
            if let Some(found) = pattern.captures(&lower).and_then(|caps| caps.get(1)) {
                profile.remember_token(&normalize_token(found.as_str()));
            }
        }

        for (pattern, interest) in &self.interests {
            if pattern.is_match(&lower) {
                profile.add_interest(interest);
            }
        }
    }
}

/// Session map guarded by one lock. Each call is atomic on its own; a caller
/// that reads, awaits something else, then writes back can still lose a
/// concurrent update to the same session.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    max_history: usize,
    patterns: ProfilePatterns,
}

impl SessionStore {
    pub fn new(max_history: usize) -> Result<Self> {
        Ok(Self {
            sessions: RwLock::new(HashMap::new()),
            max_history,
            patterns: ProfilePatterns::compile()?,
        })
    }

    /// Snapshot of the session, creating it with the default profile.
    pub async fn get_or_create(&self, session_id: &str) -> Session {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            return session.clone();
        }
        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id))
            .clone()
    }

    /// Appends to the history, dropping the oldest messages past the cap.
    /// User messages also update the profile.
    pub async fn append_message(&self, session_id: &str, message: ChatMessage) {
        let user_text = (message.role == ChatRole::User).then(|| message.content.clone());
        {
            let mut guard = self.sessions.write().await;
            guard
                .entry(session_id.to_string())
                .or_insert_with(|| Session::new(session_id))
                .push_message(message, self.max_history);
        }
        if let Some(text) = user_text {
            self.update_profile(session_id, &text).await;
        }
    }

    /// Scans `text` for expertise, token and interest hints and records the
    /// detected intent as the session's last command.
    pub async fn update_profile(&self, session_id: &str, text: &str) {
        let mut guard = self.sessions.write().await;
        let session = guard
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));

        self.patterns.analyze(&mut session.profile, text);
        session.profile.last_intent = detect_intent(text).map(str::to_string);
        session.profile.last_command = Some(text.to_string());
        tracing::debug!(
            "Session {} intent={:?} expertise={}",
            session_id,
            session.profile.last_intent,
            session.profile.expertise_level
        );
    }

    /// Records the wallet in use and returns the previous one.
    pub async fn bind_wallet(&self, session_id: &str, address: Option<String>) -> Option<String> {
        let mut guard = self.sessions.write().await;
        let session = guard
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        std::mem::replace(&mut session.wallet_address, address)
    }

    #[cfg(test)]
    pub async fn recent_messages(&self, session_id: &str, limit: usize) -> Vec<ChatMessage> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|session| session.recent_messages(limit))
            .unwrap_or_default()
    }

    pub async fn profile(&self, session_id: &str) -> UserProfile {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|session| session.profile.clone())
            .unwrap_or_default()
    }
}
