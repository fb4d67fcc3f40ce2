use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_mint, AppState};
use crate::error::EngineError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlQuery {
    pub mint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlResponse {
    pub mint: String,
    pub realized_pnl: String,
    pub unrealized_pnl: String,
    pub total_pnl: String,
    /// Null when the position is flat and no mark quote was taken.
    pub mark_price: Option<String>,
    pub computed_at_ms: i64,
}

pub async fn get_pnl(
    Query(params): Query<PnlQuery>,
    State(state): State<AppState>,
) -> Result<Json<PnlResponse>, EngineError> {
    let mint = parse_mint(&params.mint)?;

    let snapshot = state.engine.pnl(&mint).await?;
    Ok(Json(PnlResponse {
        mint: snapshot.mint.to_string(),
        realized_pnl: snapshot.realized_pnl.to_canonical_string(),
        unrealized_pnl: snapshot.unrealized_pnl.to_canonical_string(),
        total_pnl: snapshot.total_pnl.to_canonical_string(),
        mark_price: snapshot.mark_price.map(|p| p.to_canonical_string()),
        computed_at_ms: snapshot.computed_at.as_ms(),
    }))
}
