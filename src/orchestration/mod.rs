//! Orchestration layer wiring the quote source, accountant, and ledger.

pub mod trading;

pub use trading::{Execution, TradeEngine};
