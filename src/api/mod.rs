pub mod health;
pub mod pnl;
pub mod trade;
pub mod trades;

use crate::db::Repository;
use crate::domain::Mint;
use crate::error::EngineError;
use crate::orchestration::TradeEngine;
use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TradeEngine>,
    pub repo: Arc<Repository>,
}

impl AppState {
    pub fn new(engine: Arc<TradeEngine>, repo: Arc<Repository>) -> Self {
        Self { engine, repo }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/buy", post(trade::buy))
        .route("/v1/sell", post(trade::sell))
        .route("/v1/sell-all", post(trade::sell_all))
        .route("/v1/pnl", get(pnl::get_pnl))
        .route("/v1/trades", get(trades::get_trades))
        .layer(cors)
        .with_state(state)
}

/// Parse and validate a mint address from request input.
pub(crate) fn parse_mint(input: &str) -> Result<Mint, EngineError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(
            "mint must not be empty".to_string(),
        ));
    }
    Ok(Mint::new(trimmed.to_string()))
}

/// Wire form of a persisted trade; decimal fields render as canonical strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeBody {
    pub seq: i64,
    pub mint: String,
    pub side: String,
    pub base_amount: String,
    pub token_amount: String,
    pub price: String,
    pub time_ms: i64,
}

impl From<&crate::domain::Trade> for TradeBody {
    fn from(trade: &crate::domain::Trade) -> Self {
        TradeBody {
            seq: trade.seq,
            mint: trade.mint.to_string(),
            side: trade.side.to_string(),
            base_amount: trade.base_amount.to_canonical_string(),
            token_amount: trade.token_amount.to_canonical_string(),
            price: trade.price.to_canonical_string(),
            time_ms: trade.time_ms.as_ms(),
        }
    }
}

/// Wire form of a position snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionBody {
    pub mint: String,
    pub open_qty: String,
    pub cost_basis: Option<String>,
    pub realized_pnl: String,
}

impl From<&crate::engine::Position> for PositionBody {
    fn from(position: &crate::engine::Position) -> Self {
        PositionBody {
            mint: position.mint.to_string(),
            open_qty: position.open_qty.to_canonical_string(),
            cost_basis: position.cost_basis.map(|b| b.to_canonical_string()),
            realized_pnl: position.realized_pnl.to_canonical_string(),
        }
    }
}
