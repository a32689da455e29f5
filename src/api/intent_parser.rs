use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_list, non_empty_str, truthy, AppState};
use crate::{
    constants::{DEFAULT_SESSION_ID, ROUTE_TRANSACTION_LIMIT},
    error::{AppError, Result},
    models::{ChatMessage, MatchContext, TokenBalance, WalletTransaction},
    services::{AssistantReply, AssistantRequest},
    utils::{run_with_timeout, shorten_address},
};

const PROMPT_REQUIRED: &str = "Invalid request. Prompt is required.";

/// Chat turn from the UI. Fields are loosely typed on purpose: the client
/// sends whatever it has and bad values degrade to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentParserRequest {
    pub prompt: Option<Value>,
    pub wallet_connected: Option<Value>,
    pub wallet_address: Option<Value>,
    pub balance: Option<Value>,
    pub token_balances: Option<Value>,
    pub recent_transactions: Option<Value>,
    pub session_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct IntentParserResponse {
    pub result: AssistantReply,
    pub status: String,
}

/// POST /api/intent-parser
pub async fn parse_intent(
    State(state): State<AppState>,
    payload: std::result::Result<Json<IntentParserRequest>, JsonRejection>,
) -> Result<Json<IntentParserResponse>> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let prompt = match req.prompt {
        Some(Value::String(prompt)) if !prompt.is_empty() => prompt,
        _ => return Err(AppError::BadRequest(PROMPT_REQUIRED.to_string())),
    };
    let session_id =
        non_empty_str(req.session_id.as_ref()).unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());
    let wallet_connected = truthy(req.wallet_connected.as_ref());
    let wallet_address = non_empty_str(req.wallet_address.as_ref());
    let balance = req
        .balance
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|balance| balance.is_finite())
        .unwrap_or(0.0);
    let mut token_balances: Vec<TokenBalance> = lenient_list(req.token_balances);
    let mut recent_transactions: Vec<WalletTransaction> = lenient_list(req.recent_transactions);

    tracing::info!(
        "API received: session={}, connected={}, wallet={:?}, balance={}, tokens={}, transactions={}",
        session_id,
        wallet_connected,
        wallet_address.as_deref().map(shorten_address),
        balance,
        token_balances.len(),
        recent_transactions.len()
    );

    let bound = if wallet_connected {
        wallet_address.clone()
    } else {
        None
    };
    let previous = state.sessions.bind_wallet(&session_id, bound.clone()).await;
    if let Some(previous) = previous.filter(|previous| Some(previous) != bound.as_ref()) {
        state.wallets.invalidate(&previous).await;
    }

    state
        .sessions
        .append_message(&session_id, ChatMessage::user(prompt.clone()))
        .await;

    let mut current_balance = balance;
    if let (true, Some(address)) = (wallet_connected, wallet_address.as_deref()) {
        let fetched = tokio::try_join!(
            state.wallets.refresh(address),
            state
                .wallets
                .recent_transactions(address, ROUTE_TRANSACTION_LIMIT)
        );
        match fetched {
            Ok((balances, transactions)) => {
                tracing::debug!(
                    "Fetched {} tokens and {} transactions",
                    balances.token_balances.len(),
                    transactions.len()
                );
                current_balance = balances.sol_balance;
                token_balances = balances.token_balances;
                recent_transactions = transactions;
            }
            Err(e) => {
                tracing::error!("Error fetching fresh wallet data: {}", e);
                tracing::info!("Using client-provided wallet data as fallback");
            }
        }
    }

    let request = AssistantRequest {
        session_id,
        prompt,
        wallet: MatchContext {
            wallet_connected,
            wallet_address,
            balance: current_balance,
            token_balances,
            preferred_tokens: Vec::new(),
        },
        recent_transactions,
    };

    state.ai.remember_transactions(&request).await;

    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let result = run_with_timeout(timeout, state.ai.respond(&request))
        .await
        .map_err(|e| {
            tracing::error!("Error in intent parser: {}", e);
            AppError::IntentProcessing(e.to_string())
        })?;

    Ok(Json(IntentParserResponse {
        result,
        status: "success".to_string(),
    }))
}
