// src/models/mod.rs
pub mod intent;
pub mod market;
pub mod session;
pub mod token;
pub mod wallet;

// Re-export commonly used types so other modules can use `crate::models::X`
pub use intent::{Intent, IntentResult, MatchContext, SwapIntent};
pub use market::MarketTrendsResponse;
pub use session::{ChatMessage, ChatRole, ExpertiseLevel, Session, UserProfile};
pub use token::{is_supported_token, supported_symbols, token_by_mint, token_info, TokenInfo};
pub use wallet::{
    TokenBalance, TransactionKind, WalletBalanceCacheEntry, WalletBalances, WalletTransaction,
};
