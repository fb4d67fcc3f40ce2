//! Pure accounting engine for deterministic ledger logic.

use crate::domain::{Decimal, Mint, TimeMs};

pub mod accountant;

pub use accountant::{replay, AccountingError, Position};

/// Ephemeral result of a PnL query; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnlSnapshot {
    pub mint: Mint,
    pub realized_pnl: Decimal,
    /// open_qty * (mark - basis); zero while flat.
    pub unrealized_pnl: Decimal,
    pub total_pnl: Decimal,
    /// Mark price used for the unrealized leg; None when the position is flat
    /// and no quote was taken.
    pub mark_price: Option<Decimal>,
    pub computed_at: TimeMs,
}

impl PnlSnapshot {
    /// All-zero snapshot for an instrument that has never traded or is flat.
    pub fn flat(mint: Mint, realized_pnl: Decimal, computed_at: TimeMs) -> Self {
        PnlSnapshot {
            mint,
            realized_pnl,
            unrealized_pnl: Decimal::zero(),
            total_pnl: realized_pnl,
            mark_price: None,
            computed_at,
        }
    }
}
