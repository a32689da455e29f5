use serde::{Deserialize, Serialize};

// ==================== BALANCES ====================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub symbol: String,
    #[serde(default)]
    pub mint: Option<String>,
    pub balance: f64,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_value: Option<f64>,
}

/// SOL plus SPL token balances for one wallet. SOL itself is never listed in
/// `token_balances`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalances {
    pub sol_balance: f64,
    pub token_balances: Vec<TokenBalance>,
}

impl WalletBalances {
    pub fn token(&self, symbol: &str) -> Option<&TokenBalance> {
        self.token_balances
            .iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Balance of `symbol`, treating SOL as the native balance.
    pub fn balance_of(&self, symbol: &str) -> f64 {
        if symbol.eq_ignore_ascii_case("SOL") {
            return self.sol_balance;
        }
        self.token(symbol).map(|token| token.balance).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalanceCacheEntry {
    pub address: String,
    pub balances: WalletBalances,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

// ==================== TRANSACTIONS ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Swap,
    Transfer,
    Transaction,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Swap => "swap",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Transaction => "transaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub signature: String,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub tx_type: TransactionKind,
    pub amount: String,
    pub from_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_token: Option<String>,
    pub status: String,
    pub description: String,
}

impl WalletTransaction {
    /// One-line summary used in prompts and memory answers.
    pub fn summary(&self) -> String {
        match self.tx_type {
            TransactionKind::Swap => match self.to_token.as_deref() {
                Some(to_token) => format!(
                    "Swapped {} {} to {}",
                    self.amount, self.from_token, to_token
                ),
                None => format!("Swapped {} {}", self.amount, self.from_token),
            },
            TransactionKind::Transfer => {
                format!("Transferred {} {}", self.amount, self.from_token)
            }
            TransactionKind::Transaction => format!(
                "{} of {} {}",
                self.tx_type.as_str(),
                self.amount,
                self.from_token
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx(kind: TransactionKind) -> WalletTransaction {
        WalletTransaction {
            signature: "sig".to_string(),
            timestamp: 1_700_000_000,
            tx_type: kind,
            amount: "1.5000".to_string(),
            from_token: "SOL".to_string(),
            to_token: Some("USDC".to_string()),
            status: "confirmed".to_string(),
            description: "test".to_string(),
        }
    }

    #[test]
    fn summary_matches_transaction_kind() {
        assert_eq!(
            sample_tx(TransactionKind::Swap).summary(),
            "Swapped 1.5000 SOL to USDC"
        );
        assert_eq!(
            sample_tx(TransactionKind::Transfer).summary(),
            "Transferred 1.5000 SOL"
        );
        assert_eq!(
            sample_tx(TransactionKind::Transaction).summary(),
            "transaction of 1.5000 SOL"
        );
    }

    #[test]
    fn balance_of_reads_native_and_spl() {
        let balances = WalletBalances {
            sol_balance: 2.0,
            token_balances: vec![TokenBalance {
                symbol: "USDC".to_string(),
                mint: None,
                balance: 12.5,
                decimals: Some(6),
                usd_value: Some(12.5),
            }],
        };
        assert_eq!(balances.balance_of("sol"), 2.0);
        assert_eq!(balances.balance_of("USDC"), 12.5);
        assert_eq!(balances.balance_of("BONK"), 0.0);
    }

    #[test]
    fn wallet_balances_use_camel_case() {
        let json = serde_json::to_value(WalletBalances::default()).unwrap();
        assert!(json.get("solBalance").is_some());
        assert!(json.get("tokenBalances").is_some());
    }
}
