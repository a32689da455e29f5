// Pre-flight checks and quotes for swap requests coming from the UI.

use serde::Serialize;

use crate::constants::{SOLANA_NETWORK_FEE_SOL, SWAP_SLIPPAGE_RATE};
use crate::error::{AppError, Result};
use crate::models::{is_supported_token, SwapIntent, WalletBalances};
use crate::services::price_oracle::{estimate_swap, PriceOracle};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapEstimate {
    pub from_token: String,
    pub to_token: String,
    pub input_amount: f64,
    pub estimated_output: f64,
    pub rate: f64,
    pub price_impact: f64,
    pub minimum_received: f64,
    pub network_fee: f64,
}

// Internal helper that parses a positive swap amount.
fn parse_amount(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(AppError::BadRequest(format!(
            "Invalid swap amount: {}. Amount must be greater than zero.",
            raw
        ))),
    }
}

/// Checks tokens, amount and (when supplied) the wallet balance. Returns the
/// parsed amount; every rejection is a `BadRequest` carrying the reason.
pub fn validate_swap_request(intent: &SwapIntent, wallet: Option<&WalletBalances>) -> Result<f64> {
    let from = intent.from_token.to_ascii_uppercase();
    let to = intent.to_token.to_ascii_uppercase();

    for symbol in [&from, &to] {
        if !is_supported_token(symbol) {
            return Err(AppError::BadRequest(format!("Unsupported token: {}", symbol)));
        }
    }
    if from == to {
        return Err(AppError::BadRequest(format!(
            "Cannot swap {} to itself",
            from
        )));
    }

    let amount = parse_amount(&intent.amount)?;

    if let Some(wallet) = wallet {
        let available = wallet.balance_of(&from);
        if amount > available {
            return Err(AppError::BadRequest(format!(
                "Insufficient {} balance. You have {}, but the swap needs {}.",
                from, available, amount
            )));
        }
    }
    Ok(amount)
}

/// Quote for an already validated request.
pub async fn swap_estimate(prices: &dyn PriceOracle, intent: &SwapIntent) -> Result<SwapEstimate> {
    let from = intent.from_token.to_ascii_uppercase();
    let to = intent.to_token.to_ascii_uppercase();
    let amount = parse_amount(&intent.amount)?;

    let value = estimate_swap(prices, &from, &to, amount).await?;
    let estimated_output = value.estimated_value;

    Ok(SwapEstimate {
        from_token: from,
        to_token: to,
        input_amount: amount,
        estimated_output,
        rate: estimated_output / amount,
        price_impact: value.price_impact,
        minimum_received: estimated_output * (1.0 - SWAP_SLIPPAGE_RATE),
        network_fee: SOLANA_NETWORK_FEE_SOL,
    })
}
