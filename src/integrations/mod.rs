pub mod coingecko;
pub mod coinmarketcap;
pub mod llm;
pub mod openai;
pub mod solana_rpc;

pub use coingecko::CoinGeckoClient;
pub use coinmarketcap::CoinMarketCapClient;
pub use llm::LlmProvider;
pub use openai::OpenAiChatProvider;
pub use solana_rpc::SolanaRpcClient;
