//! Domain types for the simulated trade ledger.
//!
//! This module provides:
//! - Fixed-point numeric handling via the Decimal wrapper
//! - Domain primitives: TimeMs, Mint, Side
//! - The immutable Trade record

pub mod decimal;
pub mod primitives;
pub mod trade;

pub use decimal::Decimal;
pub use primitives::{Mint, Side, TimeMs};
pub use trade::Trade;
