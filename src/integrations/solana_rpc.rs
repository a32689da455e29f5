use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::constants::{LAMPORTS_PER_SOL, RPC_TIMEOUT_SECS, SPL_TOKEN_PROGRAM_ID};
use crate::error::{AppError, Result};
use crate::models::{
    token_by_mint, TokenBalance, TransactionKind, WalletBalances, WalletTransaction,
};
use crate::services::price_oracle::PriceOracle;
use crate::services::wallet_cache::WalletDataProvider;
use crate::utils::shorten_address;

fn rpc_request(method: &str, params: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1
    })
}

/// Solana JSON-RPC client used as the wallet data provider.
pub struct SolanaRpcClient {
    rpc_url: String,
    client: reqwest::Client,
    prices: Option<Arc<dyn PriceOracle>>,
}

impl SolanaRpcClient {
    pub fn new(rpc_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RPC_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build RPC client: {}", e)))?;
        Ok(Self {
            rpc_url,
            client,
            prices: None,
        })
    }

    /// Attaches a price oracle so token balances carry USD values.
    pub fn with_price_oracle(mut self, prices: Arc<dyn PriceOracle>) -> Self {
        self.prices = Some(prices);
        self
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> Result<T> {
        self.call_optional(method, params)
            .await?
            .ok_or_else(|| AppError::BlockchainRPC(format!("{} returned no result", method)))
    }

    // Internal helper that sends one request; a null `result` is `Ok(None)`.
    async fn call_optional<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>> {
        let request = rpc_request(method, params);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?;

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?;
        body.into_result(method)
    }

    /// SOL balance of an address
    pub async fn get_balance(&self, address: &str) -> Result<f64> {
        let result: RpcContextValue<u64> = self
            .call(
                "getBalance",
                serde_json::json!([address, { "commitment": "confirmed" }]),
            )
            .await?;
        Ok(result.value as f64 / LAMPORTS_PER_SOL)
    }

    /// Non-empty SPL token accounts of an address
    pub async fn get_token_balances(&self, address: &str) -> Result<Vec<TokenBalance>> {
        let result: RpcContextValue<Vec<TokenAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                serde_json::json!([
                    address,
                    { "programId": SPL_TOKEN_PROGRAM_ID },
                    { "encoding": "jsonParsed" }
                ]),
            )
            .await?;

        let mut balances = Vec::new();
        for account in result.value {
            let info = account.account.data.parsed.info;
            let balance = info.token_amount.ui_amount.unwrap_or(0.0);
            if balance <= 0.0 {
                continue;
            }
            let symbol = token_by_mint(&info.mint)
                .map(|token| token.symbol.to_string())
                .unwrap_or_else(|| shorten_address(&info.mint));
            balances.push(TokenBalance {
                symbol,
                mint: Some(info.mint),
                balance,
                decimals: Some(info.token_amount.decimals),
                usd_value: None,
            });
        }
        Ok(balances)
    }

    // Internal helper that supports `attach_usd_values` operations.
    async fn attach_usd_values(&self, balances: &mut [TokenBalance]) {
        let Some(prices) = &self.prices else {
            return;
        };
        for token in balances.iter_mut() {
            if token_by_mint(token.mint.as_deref().unwrap_or_default()).is_none() {
                continue;
            }
            match prices.quote(&token.symbol).await {
                Ok(quote) => token.usd_value = Some(token.balance * quote.price),
                Err(e) => tracing::debug!("No USD price for {}: {}", token.symbol, e),
            }
        }
    }

    /// Latest signatures for an address, newest first
    pub async fn get_signatures(&self, address: &str, limit: usize) -> Result<Vec<SignatureInfo>> {
        self.call(
            "getSignaturesForAddress",
            serde_json::json!([address, { "limit": limit }]),
        )
        .await
    }

    /// Parsed transaction, `None` when the node no longer has it
    pub async fn get_transaction(&self, signature: &str) -> Result<Option<TransactionDetail>> {
        self.call_optional(
            "getTransaction",
            serde_json::json!([
                signature,
                { "encoding": "jsonParsed", "maxSupportedTransactionVersion": 0 }
            ]),
        )
        .await
    }
}

#[async_trait]
impl WalletDataProvider for SolanaRpcClient {
    async fn get_wallet_data(&self, address: &str) -> Result<WalletBalances> {
        let (sol_balance, token_balances) =
            tokio::try_join!(self.get_balance(address), self.get_token_balances(address))?;

        let mut token_balances = token_balances;
        self.attach_usd_values(&mut token_balances).await;

        tracing::debug!(
            "Fetched wallet data for {}: {:.4} SOL, {} tokens",
            shorten_address(address),
            sol_balance,
            token_balances.len()
        );
        Ok(WalletBalances {
            sol_balance,
            token_balances,
        })
    }

    async fn get_recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<WalletTransaction>> {
        let signatures = self.get_signatures(address, limit).await?;

        let lookups = signatures
            .iter()
            .filter(|sig| sig.err.is_none())
            .map(|sig| self.get_transaction(&sig.signature));
        let details = join_all(lookups).await;

        let mut transactions = Vec::new();
        for (sig, detail) in signatures
            .iter()
            .filter(|sig| sig.err.is_none())
            .zip(details)
        {
            match detail {
                Ok(Some(detail)) => {
                    if let Some(tx) = wallet_transaction_from(sig, &detail) {
                        transactions.push(tx);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Skipping transaction {}: {}", sig.signature, e);
                }
            }
        }
        Ok(transactions)
    }
}

// Internal helper that builds a `WalletTransaction` from an RPC transaction.
fn wallet_transaction_from(sig: &SignatureInfo, detail: &TransactionDetail) -> Option<WalletTransaction> {
    let meta = detail.meta.as_ref()?;
    if meta.err.is_some() {
        return None;
    }

    let logs = meta.log_messages.as_deref().unwrap_or_default();
    let tx_type = classify_logs(logs);

    let pre = meta.pre_balances.first().copied().unwrap_or(0) as f64;
    let post = meta.post_balances.first().copied().unwrap_or(0) as f64;
    let amount = format!("{:.4}", (post - pre).abs() / LAMPORTS_PER_SOL);

    let mut tx = WalletTransaction {
        signature: sig.signature.clone(),
        timestamp: detail.block_time.or(sig.block_time).unwrap_or(0),
        tx_type,
        amount,
        from_token: "SOL".to_string(),
        to_token: None,
        status: "confirmed".to_string(),
        description: String::new(),
    };
    tx.description = tx.summary();
    Some(tx)
}

fn classify_logs(logs: &[String]) -> TransactionKind {
    if logs.iter().any(|line| line.contains("Swap")) {
        TransactionKind::Swap
    } else if logs.iter().any(|line| line.contains("Transfer")) {
        TransactionKind::Transfer
    } else {
        TransactionKind::Transaction
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

impl<T> RpcResponse<T> {
    fn into_result(self, method: &str) -> Result<Option<T>> {
        if let Some(error) = self.error {
            return Err(AppError::BlockchainRPC(format!(
                "{} failed ({}): {}",
                method, error.code, error.message
            )));
        }
        Ok(self.result)
    }
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcContextValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct TokenAccount {
    account: TokenAccountData,
}

#[derive(Debug, Deserialize)]
struct TokenAccountData {
    data: ParsedAccountData,
}

#[derive(Debug, Deserialize)]
struct ParsedAccountData {
    parsed: ParsedTokenAccount,
}

#[derive(Debug, Deserialize)]
struct ParsedTokenAccount {
    info: TokenAccountInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenAccountInfo {
    mint: String,
    token_amount: TokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenAmount {
    ui_amount: Option<f64>,
    decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub block_time: Option<i64>,
    pub err: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub block_time: Option<i64>,
    pub meta: Option<TransactionMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub pre_balances: Vec<u64>,
    #[serde(default)]
    pub post_balances: Vec<u64>,
    pub log_messages: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_request_uses_jsonrpc_2() {
        let request = rpc_request("getBalance", serde_json::json!(["abc"]));
        assert_eq!(request["jsonrpc"], "2.0");
        assert_eq!(request["method"], "getBalance");
        assert_eq!(request["params"][0], "abc");
    }

    #[test]
    fn rpc_envelope_maps_error_and_null_result() {
        let missing: RpcResponse<TransactionDetail> =
            serde_json::from_value(serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": null }))
                .unwrap();
        assert!(missing.into_result("getTransaction").unwrap().is_none());

        let failed: RpcResponse<TransactionDetail> = serde_json::from_value(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid param" }
        }))
        .unwrap();
        let err = failed.into_result("getTransaction").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Blockchain RPC error: getTransaction failed (-32602): Invalid param"
        );
    }

    #[test]
    fn classify_logs_prefers_swap() {
        // Memastikan log yang berisi Swap diklasifikasikan sebagai swap
        let logs = vec![
            "Program log: Instruction: Transfer".to_string(),
            "Program log: Instruction: Swap".to_string(),
        ];
        assert_eq!(classify_logs(&logs), TransactionKind::Swap);
        assert_eq!(
            classify_logs(&["Program log: Instruction: Transfer".to_string()]),
            TransactionKind::Transfer
        );
        assert_eq!(classify_logs(&[]), TransactionKind::Transaction);
    }

    #[test]
    fn wallet_transaction_from_uses_fee_payer_delta() {
        let detail: TransactionDetail = serde_json::from_value(serde_json::json!({
            "blockTime": 1_700_000_000,
            "meta": {
                "err": null,
                "preBalances": [2_000_000_000u64, 0],
                "postBalances": [1_500_000_000u64, 500_000_000u64],
                "logMessages": ["Program log: Instruction: Transfer"]
            }
        }))
        .unwrap();
        let sig = SignatureInfo {
            signature: "5sig".to_string(),
            block_time: None,
            err: None,
        };

        let tx = wallet_transaction_from(&sig, &detail).unwrap();
        assert_eq!(tx.amount, "0.5000");
        assert_eq!(tx.tx_type, TransactionKind::Transfer);
        assert_eq!(tx.timestamp, 1_700_000_000);
        assert_eq!(tx.description, "Transferred 0.5000 SOL");
    }

    #[test]
    fn wallet_transaction_from_skips_failed() {
        let detail: TransactionDetail = serde_json::from_value(serde_json::json!({
            "blockTime": 1,
            "meta": { "err": { "InstructionError": [0, "Custom"] }, "preBalances": [], "postBalances": [] }
        }))
        .unwrap();
        let sig = SignatureInfo {
            signature: "x".to_string(),
            block_time: None,
            err: None,
        };
        assert!(wallet_transaction_from(&sig, &detail).is_none());
    }

    #[test]
    fn token_account_payload_deserializes() {
        let payload = serde_json::json!({
            "context": { "slot": 1 },
            "value": [{
                "pubkey": "acc",
                "account": {
                    "data": {
                        "parsed": {
                            "info": {
                                "mint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                                "tokenAmount": { "uiAmount": 12.5, "decimals": 6, "amount": "12500000" }
                            },
                            "type": "account"
                        },
                        "program": "spl-token"
                    }
                }
            }]
        });
        let parsed: RpcContextValue<Vec<TokenAccount>> = serde_json::from_value(payload).unwrap();
        let info = &parsed.value[0].account.data.parsed.info;
        assert_eq!(info.token_amount.ui_amount, Some(12.5));
        assert_eq!(info.token_amount.decimals, 6);
    }
}
