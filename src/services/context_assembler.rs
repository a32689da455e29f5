// Builds the per-request assistant context: system prompt, recent history,
// suggested topics and a wallet snapshot.

use std::sync::Arc;

use chrono::DateTime;
use serde::Serialize;

use crate::constants::{
    CONTEXT_RECENT_MESSAGES, CONTEXT_SUGGESTION_CAP, CONTEXT_TRANSACTION_LIMIT,
    LOW_BALANCE_TIP_THRESHOLD,
};
use crate::models::{ChatMessage, ExpertiseLevel, TokenBalance, UserProfile, WalletTransaction};
use crate::services::price_oracle::PriceOracle;
use crate::services::session_store::SessionStore;
use crate::services::wallet_cache::WalletDataCache;
use crate::utils::shorten_address;

const GENERAL_TOPICS: &[&str] = &[
    "What can you help me with?",
    "Show my transaction history",
    "What are current gas fees?",
    "What's a good beginner token?",
    "How do I stake SOL?",
    "Explain Solana's consensus model",
];

const MEMORY_CAPABILITIES: &str = "\n\nI can remember your transaction history and answer questions about your past activities. You can ask things like:
- \"What were my transactions last week?\"
- \"How much did I spend on SOL last month?\"
- \"Show my failed transactions\"
- \"When was my last swap?\"";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletContext {
    pub address: String,
    pub sol_balance: f64,
    pub token_balances: Vec<TokenBalance>,
    pub recent_transactions: Vec<WalletTransaction>,
    pub memory_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AIContext {
    pub system_prompt: String,
    pub recent_messages: Vec<ChatMessage>,
    pub suggested_topics: Vec<String>,
    pub wallet_data: Option<WalletContext>,
}

fn interest_topic(interest: &str) -> Option<&'static str> {
    match interest {
        "defi" => Some("What are the best DeFi protocols on Solana?"),
        "nft" => Some("How do NFTs work on Solana?"),
        "meme coins" => Some("Tell me about trending meme coins"),
        "governance" => Some("How do DAOs work on Solana?"),
        "trading" => Some("What are the best DEXes on Solana?"),
        "security" => Some("How can I keep my wallet secure?"),
        _ => None,
    }
}

fn expertise_detail(level: ExpertiseLevel) -> &'static str {
    match level {
        ExpertiseLevel::Advanced => "I'll provide detailed technical information about DeFi protocols, tokenomics, and market analysis. I'll assume you understand concepts like liquidity pools, impermanent loss, and yield farming strategies. ",
        ExpertiseLevel::Intermediate => "I'll balance technical details with clear explanations, focusing on practical applications of blockchain technology and investment strategies. ",
        ExpertiseLevel::Beginner => "I'll explain crypto concepts in simple terms and provide guidance on basic operations, avoiding technical jargon when possible. ",
    }
}

/// System prompt for the LLM. `sol_price` is omitted from the wallet line
/// when the oracle had nothing to offer.
pub fn build_system_prompt(
    profile: &UserProfile,
    wallet: Option<&WalletContext>,
    sol_price: Option<f64>,
) -> String {
    let mut prompt =
        String::from("You are a Web3 AI assistant specializing in Solana blockchain. ");

    match wallet {
        Some(wallet) => {
            prompt.push_str(&format!(
                "The user's wallet ({}) is connected with {:.4} SOL",
                shorten_address(&wallet.address),
                wallet.sol_balance
            ));
            if let Some(price) = sol_price {
                prompt.push_str(&format!(" (≈${:.2})", wallet.sol_balance * price));
            }
            prompt.push_str(". ");

            if !wallet.token_balances.is_empty() {
                let holdings = wallet
                    .token_balances
                    .iter()
                    .map(|token| match token.usd_value {
                        Some(usd) if usd > 0.0 => {
                            format!("{} {} (≈${:.2})", token.balance, token.symbol, usd)
                        }
                        _ => format!("{} {}", token.balance, token.symbol),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                prompt.push_str(&format!("They also have {}. ", holdings));
            }
        }
        None => prompt.push_str(
            "The user hasn't connected their wallet yet. Guide them to connect their wallet to access full functionality. ",
        ),
    }

    prompt.push_str(&format!(
        "Based on your interactions, you appear to be a {} crypto user. ",
        profile.expertise_level
    ));
    if !profile.preferred_tokens.is_empty() {
        prompt.push_str(&format!(
            "You've shown interest in {}. ",
            profile.preferred_tokens.join(", ")
        ));
    }
    if !profile.interests.is_empty() {
        prompt.push_str(&format!(
            "Your interests include {}. ",
            profile.interests.join(", ")
        ));
    }
    prompt.push_str(expertise_detail(profile.expertise_level));
    prompt.push_str("When providing swap recommendations, ensure you check the user's actual token balances first. If the user doesn't have enough of a token, suggest alternatives based on their current holdings. Always convert crypto slang to clear instructions.");

    if let Some(wallet) = wallet.filter(|wallet| !wallet.recent_transactions.is_empty()) {
        prompt.push_str("\n\nRecent transactions: ");
        for (index, tx) in wallet.recent_transactions.iter().enumerate() {
            let date = DateTime::from_timestamp(tx.timestamp, 0)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            prompt.push_str(&format!("\n{}. {}: {}", index + 1, date, tx.summary()));
        }
        prompt.push('\n');
    }

    prompt.push_str(MEMORY_CAPABILITIES);
    prompt
}

/// Up to four follow-up topics: token first, then one interest, then
/// balance (when connected) and general fillers.
pub fn suggest_topics(profile: &UserProfile, wallet: Option<&WalletContext>) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();

    if let Some(preferred) = profile.preferred_tokens.first() {
        topics.push(format!("Tell me about {}", preferred));

        let sol_balance = wallet.map(|wallet| wallet.sol_balance).unwrap_or(0.0);
        if preferred == "SOL" {
            if sol_balance > LOW_BALANCE_TIP_THRESHOLD {
                topics.push("Swap 0.05 SOL to USDC".to_string());
            }
        } else {
            let held = wallet
                .and_then(|wallet| {
                    wallet
                        .token_balances
                        .iter()
                        .find(|token| &token.symbol == preferred)
                })
                .filter(|token| token.balance > 0.0);
            match held {
                Some(token) => topics.push(format!(
                    "Swap {:.2} {} to SOL",
                    token.balance * 0.1,
                    preferred
                )),
                None => topics.push(format!("Swap 1 SOL to {}", preferred)),
            }
        }
    }

    for interest in &profile.interests {
        if let Some(topic) = interest_topic(interest) {
            topics.push(topic.to_string());
        }
        if topics.len() >= 3 {
            break;
        }
    }

    if topics.len() < CONTEXT_SUGGESTION_CAP {
        if wallet.is_some() && !topics.iter().any(|topic| topic == "Check my balance") {
            topics.push("Check my balance".to_string());
        }
        for topic in GENERAL_TOPICS {
            if topics.len() >= CONTEXT_SUGGESTION_CAP {
                break;
            }
            topics.push(topic.to_string());
        }
    }

    topics.truncate(CONTEXT_SUGGESTION_CAP);
    topics
}

pub struct ContextAssembler {
    sessions: Arc<SessionStore>,
    wallets: Arc<WalletDataCache>,
    prices: Arc<dyn PriceOracle>,
}

impl ContextAssembler {
    pub fn new(
        sessions: Arc<SessionStore>,
        wallets: Arc<WalletDataCache>,
        prices: Arc<dyn PriceOracle>,
    ) -> Self {
        Self {
            sessions,
            wallets,
            prices,
        }
    }

    /// Assembles the context for `session_id` from the session, the wallet
    /// cache and the price oracle. Provider failures only thin the result.
    pub async fn generate_context(&self, session_id: &str) -> AIContext {
        let session = self.sessions.get_or_create(session_id).await;
        let address = session
            .wallet_address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty());

        let wallet = match address {
            Some(address) => Some(self.wallet_context(address).await),
            None => None,
        };

        let sol_price = match wallet {
            Some(_) => match self.prices.quote("SOL").await {
                Ok(quote) => Some(quote.price),
                Err(e) => {
                    tracing::debug!("SOL price unavailable for context: {}", e);
                    None
                }
            },
            None => None,
        };

        AIContext {
            system_prompt: build_system_prompt(&session.profile, wallet.as_ref(), sol_price),
            recent_messages: session.recent_messages(CONTEXT_RECENT_MESSAGES),
            suggested_topics: suggest_topics(&session.profile, wallet.as_ref()),
            wallet_data: wallet,
        }
    }

    async fn wallet_context(&self, address: &str) -> WalletContext {
        let (balances, transactions) = tokio::join!(
            self.wallets.get(address),
            self.wallets
                .recent_transactions(address, CONTEXT_TRANSACTION_LIMIT)
        );
        let recent_transactions = transactions.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch transactions for AI context: {}", e);
            Vec::new()
        });

        WalletContext {
            address: address.to_string(),
            sol_balance: balances.sol_balance,
            token_balances: balances.token_balances,
            recent_transactions,
            memory_enabled: true,
        }
    }
}
