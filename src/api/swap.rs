use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_list, non_empty_str, truthy, AppState};
use crate::{
    error::AppError,
    models::{SwapIntent, WalletBalances},
    services::swap_estimator::{swap_estimate, validate_swap_request, SwapEstimate},
};

const MISSING_PARAMETERS: &str = "Invalid swap request. Missing required parameters.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwapExecutionRequest {
    pub intent: Option<Value>,
    pub wallet_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SwapExecutionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<SwapEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Value>,
}

type SwapReply = (StatusCode, Json<SwapExecutionResponse>);

fn failure(status: StatusCode, message: impl Into<String>) -> SwapReply {
    (
        status,
        Json(SwapExecutionResponse {
            success: false,
            message: message.into(),
            estimate: None,
            intent: None,
        }),
    )
}

// Internal helper that reads the swap amount; zero and blank count as missing.
fn amount_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Number(number)) if truthy(value) => Some(number.to_string()),
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

// Internal helper that pulls the required swap fields out of the raw intent.
fn swap_intent_from(raw: &Value) -> Option<SwapIntent> {
    Some(SwapIntent {
        amount: amount_field(raw.get("amount"))?,
        from_token: non_empty_str(raw.get("fromToken"))?,
        to_token: non_empty_str(raw.get("toToken"))?,
        estimated_value: non_empty_str(raw.get("estimatedValue")),
        percentage: non_empty_str(raw.get("percentage")),
    })
}

// Internal helper that reads the client's wallet snapshot. Returns `None`
// when the snapshot does not carry a balance for `from_token`; the swap is
// then validated without a balance check.
fn wallet_balances_from(raw: Option<Value>, from_token: &str) -> Option<WalletBalances> {
    let Some(Value::Object(mut fields)) = raw else {
        return None;
    };
    let sol_balance = fields
        .get("solBalance")
        .or_else(|| fields.get("balance"))
        .and_then(Value::as_f64);
    let token_balances = fields.remove("tokenBalances");

    let covers_from = if from_token.eq_ignore_ascii_case("SOL") {
        sol_balance.is_some()
    } else {
        token_balances.is_some()
    };
    if !covers_from {
        return None;
    }
    Some(WalletBalances {
        sol_balance: sol_balance.unwrap_or(0.0),
        token_balances: lenient_list(token_balances),
    })
}

/// POST /api/swap-execution
pub async fn execute_swap(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SwapExecutionRequest>, JsonRejection>,
) -> SwapReply {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let Some(raw_intent) = req.intent else {
        return failure(StatusCode::BAD_REQUEST, MISSING_PARAMETERS);
    };
    let Some(intent) = swap_intent_from(&raw_intent) else {
        return failure(StatusCode::BAD_REQUEST, MISSING_PARAMETERS);
    };
    let wallet = wallet_balances_from(req.wallet_data, &intent.from_token);

    if let Err(e) = validate_swap_request(&intent, wallet.as_ref()) {
        return match e {
            AppError::BadRequest(reason) => failure(StatusCode::BAD_REQUEST, reason),
            other => failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing swap request: {}", other),
            ),
        };
    }

    match swap_estimate(state.prices.as_ref(), &intent).await {
        Ok(estimate) => (
            StatusCode::OK,
            Json(SwapExecutionResponse {
                success: true,
                message: "Swap request is valid and ready for execution".to_string(),
                estimate: Some(estimate),
                intent: Some(raw_intent),
            }),
        ),
        Err(e) => {
            tracing::error!("Error processing swap request: {}", e);
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing swap request: {}", e),
            )
        }
    }
}
