use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_mint, AppState, TradeBody};
use crate::error::EngineError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesQuery {
    pub mint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesResponse {
    pub mint: String,
    pub trades: Vec<TradeBody>,
}

pub async fn get_trades(
    Query(params): Query<TradesQuery>,
    State(state): State<AppState>,
) -> Result<Json<TradesResponse>, EngineError> {
    let mint = parse_mint(&params.mint)?;

    let trades = state.engine.trades(&mint).await?;
    Ok(Json(TradesResponse {
        mint: mint.to_string(),
        trades: trades.iter().map(TradeBody::from).collect(),
    }))
}
