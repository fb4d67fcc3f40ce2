//! Weighted-average cost accounting over a trade sequence.

use crate::domain::{Decimal, Mint, Side, Trade};
use thiserror::Error;

/// Current accounting state for one instrument.
///
/// A Position is a materialized fold over the instrument's trade sequence:
/// replaying the trades from an empty position reproduces it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Instrument mint address.
    pub mint: Mint,
    /// Open token quantity, never negative.
    pub open_qty: Decimal,
    /// Weighted-average cost in base per token; None while flat.
    pub cost_basis: Option<Decimal>,
    /// Cumulative realized PnL in base-asset units, signed.
    pub realized_pnl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountingError {
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("insufficient position: held {held}, requested {requested}")]
    InsufficientPosition { held: Decimal, requested: Decimal },
}

impl Position {
    /// Fresh flat position for an instrument.
    pub fn new(mint: Mint) -> Self {
        Position {
            mint,
            open_qty: Decimal::zero(),
            cost_basis: None,
            realized_pnl: Decimal::zero(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.open_qty.is_zero()
    }

    /// Apply a buy of `token_amount` tokens costing `base_amount` base asset.
    ///
    /// The new cost basis is the quantity-weighted average of the old basis
    /// and the incoming price. Buys never produce realized PnL.
    pub fn apply_buy(
        &self,
        token_amount: Decimal,
        base_amount: Decimal,
    ) -> Result<Position, AccountingError> {
        if !token_amount.is_positive() || !base_amount.is_positive() {
            return Err(AccountingError::NonPositiveAmount);
        }

        let old_cost = match self.cost_basis {
            Some(basis) => self.open_qty * basis,
            None => Decimal::zero(),
        };
        let new_qty = self.open_qty + token_amount;
        let basis = (old_cost + base_amount)
            .checked_div(new_qty)
            .expect("new_qty is positive")
            .quantize();

        Ok(Position {
            mint: self.mint.clone(),
            open_qty: new_qty,
            cost_basis: Some(basis),
            realized_pnl: self.realized_pnl,
        })
    }

    /// Apply a sell of `token_amount` tokens yielding `base_amount` base asset.
    ///
    /// Returns the new position and the realized-PnL delta
    /// `token_amount * (execution_price - basis)`. The basis of the remaining
    /// quantity is unchanged (average-cost method); selling to flat resets it
    /// so the next buy starts a fresh average.
    pub fn apply_sell(
        &self,
        token_amount: Decimal,
        base_amount: Decimal,
    ) -> Result<(Position, Decimal), AccountingError> {
        if !token_amount.is_positive() || !base_amount.is_positive() {
            return Err(AccountingError::NonPositiveAmount);
        }
        if token_amount > self.open_qty {
            return Err(AccountingError::InsufficientPosition {
                held: self.open_qty,
                requested: token_amount,
            });
        }

        let basis = self.cost_basis.expect("nonzero quantity has a basis");
        let price = base_amount
            .checked_div(token_amount)
            .expect("token_amount is positive")
            .quantize();
        let realized_delta = (token_amount * (price - basis)).quantize();

        let new_qty = self.open_qty - token_amount;
        let position = Position {
            mint: self.mint.clone(),
            open_qty: new_qty,
            cost_basis: if new_qty.is_zero() { None } else { Some(basis) },
            realized_pnl: self.realized_pnl + realized_delta,
        };

        Ok((position, realized_delta))
    }

    /// Paper PnL of the open quantity at `mark_price`; zero when flat
    /// regardless of the mark.
    pub fn unrealized(&self, mark_price: Decimal) -> Decimal {
        match self.cost_basis {
            Some(basis) if !self.open_qty.is_zero() => {
                (self.open_qty * (mark_price - basis)).quantize()
            }
            _ => Decimal::zero(),
        }
    }
}

/// Rebuild a position by folding a trade sequence from empty state.
///
/// Trades must be in ledger sequence order; the fold is the same one the
/// engine applies live, so the result matches the stored position exactly.
pub fn replay(mint: &Mint, trades: &[Trade]) -> Result<Position, AccountingError> {
    let mut position = Position::new(mint.clone());
    for trade in trades {
        position = match trade.side {
            Side::Buy => position.apply_buy(trade.token_amount, trade.base_amount)?,
            Side::Sell => {
                position
                    .apply_sell(trade.token_amount, trade.base_amount)?
                    .0
            }
        };
    }
    Ok(position)
}
