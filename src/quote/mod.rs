//! Quote source abstraction for pricing simulated swaps.

use crate::domain::{Decimal, Mint, Side};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod jupiter;
pub mod mock;

pub use jupiter::{JupiterQuoteSource, SOL_MINT};
pub use mock::MockQuoteSource;

/// Source of execution prices for one swap leg at the current moment.
///
/// The amount is the side being spent: for [`Side::Buy`] it is base asset in
/// and the returned value is tokens out; for [`Side::Sell`] it is tokens in
/// and the returned value is base asset out. Calls are bounded by a timeout;
/// any retry policy lives inside the implementation, never in the engine.
#[async_trait]
pub trait QuoteSource: Send + Sync + fmt::Debug {
    async fn quote(&self, mint: &Mint, side: Side, amount: Decimal)
        -> Result<Decimal, QuoteError>;
}

/// Error type for quote operations. Every variant surfaces to callers as
/// `QuoteUnavailable`; the detail is for logs.
#[derive(Debug, Clone, Error)]
pub enum QuoteError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("rate limited")]
    RateLimited,
}
