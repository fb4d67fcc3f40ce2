use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_mint, AppState, PositionBody, TradeBody};
use crate::domain::Decimal;
use crate::error::EngineError;
use crate::orchestration::Execution;

fn parse_amount(field: &str, input: &str) -> Result<Decimal, EngineError> {
    Decimal::from_str_canonical(input.trim())
        .map_err(|_| EngineError::InvalidAmount(format!("{} is not a valid decimal", field)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    pub mint: String,
    /// Base-asset amount to spend, as a decimal string.
    pub base_amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRequest {
    pub mint: String,
    /// Token amount to sell, as a decimal string.
    pub token_amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellAllRequest {
    pub mint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub trade: TradeBody,
    pub position: PositionBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_pnl_delta: Option<String>,
}

impl From<&Execution> for ExecutionResponse {
    fn from(execution: &Execution) -> Self {
        ExecutionResponse {
            trade: TradeBody::from(&execution.trade),
            position: PositionBody::from(&execution.position),
            realized_pnl_delta: execution
                .realized_delta
                .map(|d| d.to_canonical_string()),
        }
    }
}

pub async fn buy(
    State(state): State<AppState>,
    Json(req): Json<BuyRequest>,
) -> Result<Json<ExecutionResponse>, EngineError> {
    let mint = parse_mint(&req.mint)?;
    let base_amount = parse_amount("baseAmount", &req.base_amount)?;

    let execution = state.engine.buy(&mint, base_amount).await?;
    Ok(Json(ExecutionResponse::from(&execution)))
}

pub async fn sell(
    State(state): State<AppState>,
    Json(req): Json<SellRequest>,
) -> Result<Json<ExecutionResponse>, EngineError> {
    let mint = parse_mint(&req.mint)?;
    let token_amount = parse_amount("tokenAmount", &req.token_amount)?;

    let execution = state.engine.sell(&mint, token_amount).await?;
    Ok(Json(ExecutionResponse::from(&execution)))
}

pub async fn sell_all(
    State(state): State<AppState>,
    Json(req): Json<SellAllRequest>,
) -> Result<Json<ExecutionResponse>, EngineError> {
    let mint = parse_mint(&req.mint)?;

    let execution = state.engine.sell_all(&mint).await?;
    Ok(Json(ExecutionResponse::from(&execution)))
}
