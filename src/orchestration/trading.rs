//! Orchestrating trade engine: validation, pricing, accounting, persistence.

use crate::db::Repository;
use crate::domain::{Decimal, Mint, Side, TimeMs, Trade};
use crate::engine::{PnlSnapshot, Position};
use crate::error::EngineError;
use crate::quote::{QuoteError, QuoteSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::info;

/// Result of a successful buy or sell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// The persisted trade, with its ledger-assigned seq.
    pub trade: Trade,
    /// Position after the trade.
    pub position: Position,
    /// Realized-PnL delta; None for buys.
    pub realized_delta: Option<Decimal>,
}

/// Simulated spot-trade engine over one ledger and one quote source.
///
/// Calls on the same mint are serialized: mutations hold the mint's write
/// lock from the quote call through persistence, PnL queries hold the read
/// lock so they never observe a half-applied position. Calls on different
/// mints proceed fully in parallel.
pub struct TradeEngine {
    repo: Arc<Repository>,
    quotes: Arc<dyn QuoteSource>,
    locks: Mutex<HashMap<Mint, Arc<RwLock<()>>>>,
}

impl TradeEngine {
    pub fn new(repo: Arc<Repository>, quotes: Arc<dyn QuoteSource>) -> Self {
        Self {
            repo,
            quotes,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, mint: &Mint) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        locks
            .entry(mint.clone())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Simulate spending `base_amount` of the base asset on `mint` tokens.
    pub async fn buy(&self, mint: &Mint, base_amount: Decimal) -> Result<Execution, EngineError> {
        let base_amount = base_amount.quantize();
        if !base_amount.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "base amount must be positive, got {}",
                base_amount
            )));
        }

        let lock = self.lock_for(mint);
        let _guard = lock.write().await;

        let token_amount = self.quotes.quote(mint, Side::Buy, base_amount).await?;
        if !token_amount.is_positive() {
            return Err(EngineError::QuoteUnavailable(QuoteError::Parse(format!(
                "quote returned non-positive amount {}",
                token_amount
            ))));
        }

        let position = self
            .repo
            .get_position(mint)
            .await?
            .unwrap_or_else(|| Position::new(mint.clone()));
        let position = position.apply_buy(token_amount, base_amount)?;

        let trade = Trade::new(
            mint.clone(),
            Side::Buy,
            base_amount,
            token_amount,
            TimeMs::now(),
        );
        let seq = self.repo.record_execution(&trade, &position).await?;
        let trade = trade.with_seq(seq);

        info!(
            "Recorded buy seq={} mint={} base={} tokens={} price={}",
            seq, mint, base_amount, token_amount, trade.price
        );

        Ok(Execution {
            trade,
            position,
            realized_delta: None,
        })
    }

    /// Simulate selling `token_amount` of `mint` for the base asset.
    pub async fn sell(&self, mint: &Mint, token_amount: Decimal) -> Result<Execution, EngineError> {
        let token_amount = token_amount.quantize();
        if !token_amount.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "token amount must be positive, got {}",
                token_amount
            )));
        }

        let lock = self.lock_for(mint);
        let _guard = lock.write().await;

        let position = self.repo.get_position(mint).await?;
        let position = match position {
            Some(p) if p.open_qty >= token_amount => p,
            other => {
                return Err(EngineError::InsufficientPosition {
                    held: other.map(|p| p.open_qty).unwrap_or_else(Decimal::zero),
                    requested: token_amount,
                })
            }
        };

        self.sell_locked(mint, position, token_amount).await
    }

    /// Simulate selling the full open quantity of `mint`.
    ///
    /// The position is loaded and sold under one lock acquisition, so a
    /// concurrent mutation cannot slip between the read and the sell.
    pub async fn sell_all(&self, mint: &Mint) -> Result<Execution, EngineError> {
        let lock = self.lock_for(mint);
        let _guard = lock.write().await;

        let position = self.repo.get_position(mint).await?;
        let position = match position {
            Some(p) if !p.open_qty.is_zero() => p,
            other => {
                return Err(EngineError::InsufficientPosition {
                    held: other.map(|p| p.open_qty).unwrap_or_else(Decimal::zero),
                    requested: Decimal::zero(),
                })
            }
        };

        let token_amount = position.open_qty;
        self.sell_locked(mint, position, token_amount).await
    }

    /// Shared sell path; the caller holds the write lock and has verified
    /// `token_amount <= position.open_qty`.
    async fn sell_locked(
        &self,
        mint: &Mint,
        position: Position,
        token_amount: Decimal,
    ) -> Result<Execution, EngineError> {
        let base_amount = self.quotes.quote(mint, Side::Sell, token_amount).await?;
        if !base_amount.is_positive() {
            return Err(EngineError::QuoteUnavailable(QuoteError::Parse(format!(
                "quote returned non-positive amount {}",
                base_amount
            ))));
        }

        let (position, realized_delta) = position.apply_sell(token_amount, base_amount)?;

        let trade = Trade::new(
            mint.clone(),
            Side::Sell,
            base_amount,
            token_amount,
            TimeMs::now(),
        );
        let seq = self.repo.record_execution(&trade, &position).await?;
        let trade = trade.with_seq(seq);

        info!(
            "Recorded sell seq={} mint={} tokens={} base={} realized_delta={}",
            seq, mint, token_amount, base_amount, realized_delta
        );

        Ok(Execution {
            trade,
            position,
            realized_delta: Some(realized_delta),
        })
    }

    /// Compute the PnL snapshot for a mint.
    ///
    /// A never-traded or flat instrument yields an all-zero unrealized leg
    /// immediately, without contacting the quote source. With an open
    /// quantity, a failed mark quote is a hard error rather than a stale
    /// answer.
    pub async fn pnl(&self, mint: &Mint) -> Result<PnlSnapshot, EngineError> {
        let lock = self.lock_for(mint);
        let _guard = lock.read().await;

        let position = match self.repo.get_position(mint).await? {
            Some(p) => p,
            None => return Ok(PnlSnapshot::flat(mint.clone(), Decimal::zero(), TimeMs::now())),
        };

        if position.open_qty.is_zero() {
            return Ok(PnlSnapshot::flat(
                mint.clone(),
                position.realized_pnl,
                TimeMs::now(),
            ));
        }

        // Mark = base obtained for a nominal one-token sell.
        let mark_price = self.quotes.quote(mint, Side::Sell, Decimal::one()).await?;
        let unrealized = position.unrealized(mark_price);

        Ok(PnlSnapshot {
            mint: mint.clone(),
            realized_pnl: position.realized_pnl,
            unrealized_pnl: unrealized,
            total_pnl: position.realized_pnl + unrealized,
            mark_price: Some(mark_price),
            computed_at: TimeMs::now(),
        })
    }

    /// List the durable trade sequence for a mint.
    pub async fn trades(&self, mint: &Mint) -> Result<Vec<Trade>, EngineError> {
        Ok(self.repo.query_trades(mint).await?)
    }
}
