// All service modules
pub mod ai_service;
pub mod context_assembler;
pub mod intent_matcher;
pub mod market_data;
pub mod price_oracle;
pub mod session_store;
pub mod swap_estimator;
pub mod wallet_cache;

// Re-export for convenience
pub use ai_service::{AIService, AssistantReply, AssistantRequest};
pub use context_assembler::{AIContext, ContextAssembler, WalletContext};
pub use intent_matcher::IntentMatcher;
pub use market_data::MarketDataService;
pub use price_oracle::{CoinGeckoPriceOracle, PriceOracle};
pub use session_store::SessionStore;
pub use wallet_cache::{WalletDataCache, WalletDataProvider};
