//! Local intent matching.
//!
//! Free text is checked against a fixed table of regex rules, one group per
//! operation. Operations are tried in declared order (swap, balance, price,
//! history, tokenInfo, marketTrends, help) and patterns in declared order
//! within each group; the first hit wins and its handler builds the reply.
//! Text that matches nothing gets a canned conversational answer.
//!
//! Patterns use named groups: `amount`, `from`, `to` for swaps and `token`
//! for price and token info. A swap pattern without an `amount` group is a
//! "swap all" request.

use std::sync::Arc;

use chrono::DateTime;
use rand::seq::IndexedRandom;
use regex::{Captures, Regex};

use crate::constants::{
    HISTORY_REPLY_LIMIT, LOW_BALANCE_TIP_THRESHOLD, MATCHER_SUGGESTION_CAP,
    SOLANA_EXPLORER_ADDRESS_URL, SOL_FEE_RESERVE,
};
use crate::error::{AppError, Result};
use crate::models::{
    supported_symbols, token_info, Intent, IntentResult, MatchContext, SwapIntent,
};
use crate::services::price_oracle::{estimate_swap, PriceOracle, PriceTrend};
use crate::services::wallet_cache::WalletDataCache;
use crate::utils::{format_price, shorten_address};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Swap,
    Balance,
    Price,
    History,
    TokenInfo,
    MarketTrends,
    Help,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Swap => "swap",
            Operation::Balance => "balance",
            Operation::Price => "price",
            Operation::History => "history",
            Operation::TokenInfo => "tokenInfo",
            Operation::MarketTrends => "marketTrends",
            Operation::Help => "help",
        }
    }
}

const OPERATION_RULES: &[(Operation, &[&str])] = &[
    (
        Operation::Swap,
        &[
            r"swap\s+(?P<amount>\d+\.?\d*)\s+(?P<from>\w+)\s+(?:to|for)\s+(?P<to>\w+)",
            r"convert\s+(?P<amount>\d+\.?\d*)\s+(?P<from>\w+)\s+(?:to|into)\s+(?P<to>\w+)",
            r"exchange\s+(?P<amount>\d+\.?\d*)\s+(?P<from>\w+)\s+(?:to|for)\s+(?P<to>\w+)",
            r"trade\s+(?P<amount>\d+\.?\d*)\s+(?P<from>\w+)\s+(?:to|for)\s+(?P<to>\w+)",
            r"change\s+(?P<amount>\d+\.?\d*)\s+(?P<from>\w+)\s+(?:to|into|for)\s+(?P<to>\w+)",
            r"(?P<amount>\d+\.?\d*)\s+(?P<from>\w+)\s+(?:to|into|for)\s+(?P<to>\w+)",
            r"swap\s+(?:all\s+my|all|everything)\s+(?P<from>\w+)\s+(?:to|for)\s+(?P<to>\w+)",
            r"convert\s+(?:all\s+my|all|everything)\s+(?P<from>\w+)\s+(?:to|into)\s+(?P<to>\w+)",
            r"exchange\s+(?:all\s+my|all|everything)\s+(?P<from>\w+)\s+(?:to|for)\s+(?P<to>\w+)",
            r"trade\s+(?:all\s+my|all|everything)\s+(?P<from>\w+)\s+(?:to|for)\s+(?P<to>\w+)",
        ],
    ),
    (
        Operation::Balance,
        &[
            r"(?:check|show|what(?:'|i)?s\s+(?:my|the))\s+balance",
            r"how\s+much\s+(?:\w+\s+)?(?:do\s+i\s+have|is\s+in\s+my\s+wallet)",
            r"balance\s+(?:of|for)\s+my\s+(?:wallet|account)",
            r"my\s+balance",
            r"wallet\s+balance",
        ],
    ),
    (
        Operation::Price,
        &[
            r"(?:what(?:'|i)?s\s+(?:the|current))?\s*price\s+(?:of|for)\s+(?P<token>\w+)",
            r"how\s+much\s+(?:is|does)\s+(?P<token>\w+)\s+cost",
            r"(?P<token>\w+)\s+price",
        ],
    ),
    (
        Operation::History,
        &[
            r"(?:show|view|get|check)\s+(?:my\s+)?(?:transaction|tx)\s+history",
            r"(?:what|show)\s+(?:are|were)\s+my\s+(?:recent|last|previous)\s+transactions",
            r"(?:my|wallet)\s+(?:transaction|tx)\s+history",
            r"(?:recent|last|previous)\s+transactions",
            r"what\s+(?:did|have)\s+i\s+(?:do|done|transact)",
        ],
    ),
    (
        Operation::TokenInfo,
        &[
            r"tell\s+me\s+about\s+(?:the\s+)?(?:token\s+)?(?P<token>\w+)",
            r"(?:tell|what|info|information)\s+(?:me|about|is)\s+(?:the\s+)?(?:token\s+)?(?P<token>\w+)",
            r"what\s+is\s+(?P<token>\w+)(?:\s+token)?",
            r"explain\s+(?P<token>\w+)(?:\s+token)?",
            r"(?P<token>\w+)\s+info(?:rmation)?",
            r"info\s+on\s+(?P<token>\w+)",
        ],
    ),
    (
        Operation::MarketTrends,
        &[
            r"(?:what|how)(?:'s| is| are)\s+(?:the\s+)?(?:market|markets)(?:\s+doing)?",
            r"market\s+(?:trend|trends|overview|update|sentiment)",
            r"(?:what|which)\s+(?:token|tokens|coin|coins)(?:\s+are|\s+is)?\s+(?:trending|hot|popular)",
            r"what\s+should\s+i\s+(?:buy|invest|trade)",
            r"(?:crypto|token|coin)\s+recommendations",
        ],
    ),
    (
        Operation::Help,
        &[
            r"(?:help|assist|guide|tutorial|how\s+to\s+use)",
            r"what\s+can\s+you\s+do",
            r"(?:list|show)\s+(?:commands|features|abilities)",
            r"help\s+me",
            r"(?:what|which)\s+tokens\s+(?:do\s+you\s+)?support",
        ],
    ),
];

// Words a loose `token` capture can pick up that never name a token.
const FILLER_WORDS: &[&str] = &["about", "yourself", "you", "me", "it", "this", "that", "the"];

fn is_filler(captures: &Captures<'_>) -> bool {
    captures
        .name("token")
        .map(|token| {
            FILLER_WORDS
                .iter()
                .any(|word| token.as_str().eq_ignore_ascii_case(word))
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversation {
    Greeting,
    Farewell,
    Thanks,
    Identity,
    Capabilities,
    Joke,
}

const CONVERSATION_RULES: &[(Conversation, &[&str])] = &[
    (
        Conversation::Greeting,
        &[r"^(?:hi|hello|hey|howdy|greetings|good\s+(?:morning|afternoon|evening)|what'?s\s+up)"],
    ),
    (
        Conversation::Farewell,
        &[r"^(?:bye|goodbye|see\s+you|farewell|later|have\s+a\s+(?:good|nice|great)\s+(?:day|night|evening))"],
    ),
    (
        Conversation::Thanks,
        &[r"^(?:thanks|thank\s+you|thx|ty|appreciate\s+(?:it|you))"],
    ),
    (
        Conversation::Identity,
        &[r"(?:who|what)\s+are\s+you", r"tell\s+(?:me\s+)?about\s+yourself"],
    ),
    (
        Conversation::Capabilities,
        &[
            r"what\s+can\s+you\s+do",
            r"help\s+me\s+with",
            r"how\s+does\s+this\s+(?:work|app\s+work)",
        ],
    ),
    (
        Conversation::Joke,
        &[r"tell\s+(?:me\s+)?a\s+(?:joke|crypto\s+joke)"],
    ),
];

const GREETINGS: &[&str] = &[
    "Hello! How can I help with your Web3 journey today?",
    "Hi there! I'm your AI assistant for Web3 and crypto. What can I do for you?",
    "Hey! Ready to explore the blockchain world together?",
];

const THANKS_REPLIES: &[&str] = &[
    "You're welcome! Happy to assist with your crypto needs.",
    "Anytime! Let me know if you need anything else related to blockchain.",
    "Glad I could help! Feel free to ask more about Web3.",
];

const IDENTITY_REPLIES: &[&str] = &[
    "I'm an AI assistant specialized in Web3 and cryptocurrency. While I can chat about general topics, I'm most knowledgeable about blockchain technology, Solana, and token swaps.",
    "I'm your Web3 AI Wallet assistant. I can help with token swaps, provide crypto information, and chat about various topics, though my expertise is in blockchain.",
];

const CAPABILITY_REPLIES: &[&str] = &[
    "I can help you swap tokens on Solana, check token prices and balances, provide information about cryptocurrencies, and chat about various topics. Try asking me to 'Swap 1 SOL to USDC' or 'Tell me about NFTs'.",
];

const CRYPTO_JOKES: &[&str] = &[
    "Why don't programmers like nature? It has too many bugs and no debugging tools!",
    "Why did the blockchain go to therapy? It had too many trust issues!",
    "How many Bitcoin miners does it take to change a lightbulb? 21 million, but only one gets the reward!",
    "Why did the crypto investor go to the dentist? Because of the tooth decay... just like their portfolio in a bear market!",
    "What do you call a cryptocurrency investor who finally breaks even? A miracle!",
];

const FAREWELL_REPLY: &str =
    "Goodbye! Feel free to return whenever you have Web3 questions or want to make transactions.";

const GENERAL_REPLY: &str = "I'm here to help with Web3 and blockchain topics primarily! You can ask me to swap tokens, check prices, or learn about crypto concepts. I can also chat about other topics, but my expertise is in the blockchain space.";

pub const HANDLER_ERROR_REPLY: &str =
    "Sorry, I encountered an error understanding your request. Please try again with a simpler query.";

const LOW_BALANCE_TIP: &str =
    "Tip: Your SOL balance is low. You'll need SOL to pay for transaction fees when swapping tokens.";

fn pick(replies: &[&str]) -> String {
    replies
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(GENERAL_REPLY)
        .to_string()
}

fn compile_rules<T: Copy>(rules: &[(T, &[&str])]) -> Result<Vec<(T, Vec<Regex>)>> {
    rules
        .iter()
        .map(|(kind, patterns)| {
            let compiled = patterns
                .iter()
                .map(|pattern| {
                    Regex::new(&format!("(?i){}", pattern)).map_err(|e| {
                        AppError::Internal(format!("Invalid intent pattern {}: {}", pattern, e))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((*kind, compiled))
        })
        .collect()
}

fn unknown_token_reply(raw: &str) -> IntentResult {
    IntentResult::without_intent(format!(
        "I don't recognize \"{}\" as a supported token. Currently I support: {}",
        raw,
        supported_symbols()
    ))
}

/// Next-step suggestions for a matched operation, at most three. Token
/// placeholders come from the session's most recently mentioned tokens.
fn suggestions_for(operation: Operation, intent: Option<&Intent>, ctx: &MatchContext) -> Vec<String> {
    let mut suggestions = Vec::new();
    match operation {
        Operation::Balance => {
            suggestions.push("Swap 1 SOL to USDC".to_string());
            suggestions.push("Show my transaction history".to_string());
        }
        Operation::TokenInfo => {
            if let Some(Intent::TokenInfo { token }) = intent {
                if token != "SOL" {
                    suggestions.push(format!("Swap 10 {} to SOL", token));
                } else {
                    let favorite = ctx
                        .preferred_tokens
                        .iter()
                        .find(|symbol| symbol.as_str() != "SOL")
                        .map(String::as_str)
                        .unwrap_or("USDC");
                    suggestions.push(format!("Swap 1 SOL to {}", favorite));
                }
                suggestions.push("What are the market trends?".to_string());
            }
        }
        Operation::MarketTrends => {
            let recent = ctx
                .preferred_tokens
                .first()
                .map(String::as_str)
                .unwrap_or("JUP");
            suggestions.push(format!("Tell me about {}", recent));
            suggestions.push("Check my balance".to_string());
        }
        Operation::History => {
            suggestions.push("Check my balance".to_string());
            suggestions.push("What are the market trends?".to_string());
        }
        Operation::Swap => {
            suggestions.push("Check my balance".to_string());
            suggestions.push("Show my transaction history".to_string());
        }
        Operation::Price | Operation::Help => {}
    }

    if suggestions.is_empty() {
        suggestions.push("What tokens do you support?".to_string());
        suggestions.push("Check my balance".to_string());
        suggestions.push("What are the market trends?".to_string());
    }
    suggestions.truncate(MATCHER_SUGGESTION_CAP);
    suggestions
}

fn connected_address(ctx: &MatchContext) -> Option<&str> {
    if !ctx.wallet_connected {
        return None;
    }
    ctx.wallet_address.as_deref().filter(|address| !address.is_empty())
}

pub struct IntentMatcher {
    operations: Vec<(Operation, Vec<Regex>)>,
    conversations: Vec<(Conversation, Vec<Regex>)>,
    prices: Arc<dyn PriceOracle>,
    wallets: Arc<WalletDataCache>,
}

impl IntentMatcher {
    pub fn new(prices: Arc<dyn PriceOracle>, wallets: Arc<WalletDataCache>) -> Result<Self> {
        Ok(Self {
            operations: compile_rules(OPERATION_RULES)?,
            conversations: compile_rules(CONVERSATION_RULES)?,
            prices,
            wallets,
        })
    }

    /// First matching operation and its captures, if any.
    pub fn match_operation<'t>(&self, text: &'t str) -> Option<(Operation, Captures<'t>)> {
        self.operations.iter().find_map(|(operation, patterns)| {
            patterns
                .iter()
                .filter_map(|pattern| pattern.captures(text))
                .find(|captures| !is_filler(captures))
                .map(|captures| (*operation, captures))
        })
    }

    /// Parses `text` into a reply and, for recognised operations, an intent.
    pub async fn parse(&self, text: &str, ctx: &MatchContext) -> IntentResult {
        tracing::debug!(
            "Matching intent (connected={}, wallet={:?}, balance={})",
            ctx.wallet_connected,
            ctx.wallet_address.as_deref().map(shorten_address),
            ctx.balance
        );

        let Some((operation, captures)) = self.match_operation(text) else {
            return self.converse(text);
        };
        tracing::debug!("Matched operation {}", operation.as_str());

        match self.handle(operation, &captures, ctx).await {
            Ok(mut result) => {
                if ctx.wallet_connected && ctx.balance < LOW_BALANCE_TIP_THRESHOLD {
                    result.message = format!("{}\n\n{}", result.message, LOW_BALANCE_TIP);
                }
                result.suggestions = suggestions_for(operation, result.intent.as_ref(), ctx);
                result
            }
            Err(e) => {
                tracing::error!("Error processing intent {}: {}", operation.as_str(), e);
                IntentResult {
                    message: HANDLER_ERROR_REPLY.to_string(),
                    intent: None,
                    suggestions: vec!["Check my balance".to_string(), "Help".to_string()],
                }
            }
        }
    }

    /// Canned reply for text that matched no operation.
    pub fn converse(&self, text: &str) -> IntentResult {
        let kind = self.conversations.iter().find_map(|(kind, patterns)| {
            patterns
                .iter()
                .any(|pattern| pattern.is_match(text))
                .then_some(*kind)
        });

        let message = match kind {
            Some(Conversation::Greeting) => pick(GREETINGS),
            Some(Conversation::Farewell) => FAREWELL_REPLY.to_string(),
            Some(Conversation::Thanks) => pick(THANKS_REPLIES),
            Some(Conversation::Identity) => pick(IDENTITY_REPLIES),
            Some(Conversation::Capabilities) => pick(CAPABILITY_REPLIES),
            Some(Conversation::Joke) => pick(CRYPTO_JOKES),
            None => GENERAL_REPLY.to_string(),
        };
        IntentResult::without_intent(message)
    }

    async fn handle(
        &self,
        operation: Operation,
        captures: &Captures<'_>,
        ctx: &MatchContext,
    ) -> Result<IntentResult> {
        match operation {
            Operation::Swap => self.handle_swap(captures, ctx).await,
            Operation::Balance => Ok(self.handle_balance(ctx).await),
            Operation::Price => self.handle_price(captures).await,
            Operation::History => Ok(self.handle_history(ctx).await),
            Operation::TokenInfo => Ok(self.handle_token_info(captures).await),
            Operation::MarketTrends => Ok(handle_market_trends(ctx)),
            Operation::Help => Ok(handle_help(ctx)),
        }
    }

    async fn handle_swap(&self, captures: &Captures<'_>, ctx: &MatchContext) -> Result<IntentResult> {
        let raw_from = captures.name("from").map(|m| m.as_str()).unwrap_or_default();
        let raw_to = captures.name("to").map(|m| m.as_str()).unwrap_or_default();
        let from = raw_from.to_ascii_uppercase();
        let to = raw_to.to_ascii_uppercase();

        if token_info(&from).is_none() {
            return Ok(unknown_token_reply(raw_from));
        }
        if token_info(&to).is_none() {
            return Ok(unknown_token_reply(raw_to));
        }

        let Some(amount) = captures.name("amount").map(|m| m.as_str().to_string()) else {
            return Ok(swap_all(&from, &to, ctx));
        };

        let amount_value: f64 = amount
            .parse()
            .map_err(|e| AppError::IntentProcessing(format!("Invalid amount {}: {}", amount, e)))?;

        if from == "SOL" && ctx.wallet_connected && amount_value > ctx.balance {
            return Ok(IntentResult::without_intent(format!(
                "I notice you want to swap {} SOL, but your current balance is only {:.4} SOL. Would you like to try a smaller amount?",
                amount, ctx.balance
            )));
        }

        match estimate_swap(self.prices.as_ref(), &from, &to, amount_value).await {
            Ok(estimate) => {
                let mut price_message = format!(
                    "Based on current rates, {} {} (≈${:.2}) should get you approximately {:.6} {}",
                    amount,
                    from,
                    amount_value * estimate.from_price_usd,
                    estimate.estimated_value,
                    to
                );
                match estimate.trend {
                    PriceTrend::Up => {
                        price_message.push_str(&format!(". {} has been trending upward recently.", to))
                    }
                    PriceTrend::Down => {
                        price_message.push_str(&format!(". {} has been trending downward recently.", to))
                    }
                    PriceTrend::Stable => {
                        price_message.push_str(&format!(". {} price has been stable recently.", to))
                    }
                }
                if estimate.price_impact > 0.0 {
                    price_message.push_str(&format!(
                        " Note: This swap may have a price impact of approximately {:.1}%.",
                        estimate.price_impact
                    ));
                }

                Ok(IntentResult::new(
                    format!(
                        "I'll help you swap {} {} to {}. {} I'll prepare this transaction for your approval.",
                        amount, from, to, price_message
                    ),
                    Some(Intent::Swap(SwapIntent {
                        amount,
                        from_token: from,
                        to_token: to,
                        estimated_value: Some(format!("{:.6}", estimate.estimated_value)),
                        percentage: None,
                    })),
                ))
            }
            Err(e) => {
                tracing::warn!("Error estimating swap value: {}", e);
                Ok(IntentResult::new(
                    format!(
                        "I'll help you swap {} {} to {}. I'll prepare this transaction for your approval.",
                        amount, from, to
                    ),
                    Some(Intent::Swap(SwapIntent {
                        amount,
                        from_token: from,
                        to_token: to,
                        estimated_value: None,
                        percentage: None,
                    })),
                ))
            }
        }
    }

    async fn handle_balance(&self, ctx: &MatchContext) -> IntentResult {
        let Some(address) = connected_address(ctx) else {
            return IntentResult::without_intent(
                "Please connect your wallet first to check your balance.",
            );
        };

        let price_info = match self.prices.quote("SOL").await {
            Ok(quote) => format!(" (≈${:.2})", ctx.balance * quote.price),
            Err(e) => {
                tracing::warn!("Error fetching SOL price: {}", e);
                String::new()
            }
        };

        IntentResult::new(
            format!(
                "Your current wallet balance is {:.4} SOL{} ({}). You can use this balance to swap tokens or perform other operations.",
                ctx.balance,
                price_info,
                shorten_address(address)
            ),
            Some(Intent::Balance {
                address: Some(address.to_string()),
            }),
        )
    }

    async fn handle_price(&self, captures: &Captures<'_>) -> Result<IntentResult> {
        let raw = captures.name("token").map(|m| m.as_str()).unwrap_or_default();
        let symbol = raw.to_ascii_uppercase();
        let Some(token) = token_info(&symbol) else {
            return Ok(IntentResult::without_intent(format!(
                "I don't have price information for {}. Currently I track: {}",
                raw,
                supported_symbols()
            )));
        };

        let price = self.prices.quote(&symbol).await?.price;
        let formatted = if symbol == "BONK" {
            format!("{:.8}", price)
        } else {
            format!("{:.2}", price)
        };

        Ok(IntentResult::new(
            format!(
                "The current price of {} ({}) is approximately ${} USD.",
                symbol, token.name, formatted
            ),
            Some(Intent::Price {
                token: symbol,
                price,
            }),
        ))
    }

    async fn handle_history(&self, ctx: &MatchContext) -> IntentResult {
        let Some(address) = connected_address(ctx) else {
            return IntentResult::without_intent(
                "Please connect your wallet first to view your transaction history.",
            );
        };

        let history = match self.wallets.recent_transactions(address, HISTORY_REPLY_LIMIT).await {
            Ok(history) => history,
            Err(e) => {
                tracing::error!("Error fetching wallet history: {}", e);
                return IntentResult::new(
                    "I encountered an error while trying to fetch your transaction history. Please try again later.",
                    Some(Intent::History {
                        success: false,
                        transactions: None,
                    }),
                );
            }
        };

        if history.is_empty() {
            return IntentResult::new(
                "I couldn't find any recent transactions for your wallet. This could be because your wallet is new or the transaction history is not available through the API.",
                Some(Intent::History {
                    success: false,
                    transactions: None,
                }),
            );
        }

        let recent: Vec<_> = history.into_iter().take(HISTORY_REPLY_LIMIT).collect();
        let formatted = recent
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                let description = if tx.description.is_empty() {
                    "Unknown transaction"
                } else {
                    tx.description.as_str()
                };
                let date = DateTime::from_timestamp(tx.timestamp, 0)
                    .map(|date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "unknown date".to_string());
                format!("{}. {} - {}", index + 1, description, date)
            })
            .collect::<Vec<_>>()
            .join("\n");

        IntentResult::new(
            format!(
                "Here are your most recent transactions:\n\n{}\n\nYou can see your full transaction history on Solana Explorer: {}/{}",
                formatted, SOLANA_EXPLORER_ADDRESS_URL, address
            ),
            Some(Intent::History {
                success: true,
                transactions: Some(recent),
            }),
        )
    }

    async fn handle_token_info(&self, captures: &Captures<'_>) -> IntentResult {
        let raw = captures.name("token").map(|m| m.as_str()).unwrap_or_default();
        let symbol = raw.to_ascii_uppercase();
        let Some(token) = token_info(&symbol) else {
            return IntentResult::without_intent(format!(
                "I don't have information about {}. Currently I have data on: {}",
                raw,
                supported_symbols()
            ));
        };

        let mut message = format!(
            "{} ({}): {}. It has {} decimals and is commonly used for {}.",
            token.symbol, token.name, token.description, token.decimals, token.use_cases
        );
        message.push_str(&format!(
            "\n\nCategory: {}, Launched: {}",
            token.category, token.year_launched
        ));
        if let Some(price_range) = token.price_range {
            message.push_str(&format!("\nPrice history: {}", price_range));
        }
        if let Some(sentiment) = token.market_sentiment {
            message.push_str(&format!("\nMarket sentiment: {}", sentiment));
        }

        match self.prices.quote(token.symbol).await {
            Ok(quote) => message.push_str(&format!(
                "\n\nCurrent price: ${}",
                format_price(token.symbol, quote.price)
            )),
            Err(e) => tracing::warn!("Error fetching token price: {}", e),
        }

        if !token.trend_indicators.is_empty() {
            message.push_str(&format!(
                "\n\nKey trend indicators: {}",
                token.trend_indicators.join(", ")
            ));
        }

        IntentResult::new(
            message,
            Some(Intent::TokenInfo {
                token: token.symbol.to_string(),
            }),
        )
    }
}

fn swap_all(from: &str, to: &str, ctx: &MatchContext) -> IntentResult {
    let amount = if !ctx.wallet_connected {
        "0".to_string()
    } else if from == "SOL" {
        format!("{:.4}", (ctx.balance - SOL_FEE_RESERVE).max(0.0))
    } else {
        ctx.token_balances
            .iter()
            .find(|token| token.symbol == from)
            .map(|token| token.balance.to_string())
            .unwrap_or_else(|| "0".to_string())
    };

    IntentResult::new(
        format!(
            "I'll help you swap all your {} ({}) to {}. I'll prepare this transaction for your approval.",
            from, amount, to
        ),
        Some(Intent::Swap(SwapIntent {
            amount,
            from_token: from.to_string(),
            to_token: to.to_string(),
            estimated_value: None,
            percentage: Some("100%".to_string()),
        })),
    )
}

fn handle_market_trends(ctx: &MatchContext) -> IntentResult {
    let personal = if ctx.wallet_connected {
        "Based on your wallet holdings, you might be interested in keeping an eye on SOL price movements."
    } else {
        "Connect your wallet for personalized market insights based on your holdings."
    };

    let message = format!(
        "\n## Current Market Trends\n\n\
         The crypto market is showing a bullish pattern in the last 24 hours with most major assets gaining value.\n\n\
         **Top gainers:**\n\
         SOL (+8.2%), JUP (+15.4%), WIF (+23.1%)\n\n\
         **Top losers:**\n\
         Some Token (-3.2%), Another Token (-2.1%)\n\n\
         **Solana ecosystem:**\n\
         The Solana ecosystem is outperforming the broader market with increased DeFi activity.\n\n\
         {}\n",
        personal
    );
    IntentResult::new(message, Some(Intent::MarketTrends))
}

fn handle_help(ctx: &MatchContext) -> IntentResult {
    let connection_status = match connected_address(ctx) {
        Some(address) => format!(
            "Your wallet ({}) is connected with {:.4} SOL.",
            shorten_address(address),
            ctx.balance
        ),
        None => "Please connect your wallet to access all features.".to_string(),
    };

    IntentResult::new(
        format!(
            "I'm your advanced Web3 AI assistant. {}\n\n\
             Here's what I can help you with:\n\n\
             1. **Token Swaps** - Example: \"Swap 1 SOL to USDC\"\n\
             2. **Balance Check** - Example: \"Check my balance\"\n\
             3. **Transaction History** - Example: \"Show my recent transactions\"\n\
             4. **Token Information** - Example: \"Tell me about SOL\"\n\
             5. **Market Trends** - Example: \"What are the market trends?\"\n\
             6. **Help** - Example: \"What can you do?\"\n\n\
             I support many tokens including SOL, USDC, BONK, USDT, JUP, JTO, RAY, PYTH, MEME, and WIF. \
             I can also provide real-time price estimates when performing swaps.",
            connection_status
        ),
        Some(Intent::Help),
    )
}
