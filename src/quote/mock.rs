//! Mock quote source for testing without network calls.

use super::{QuoteError, QuoteSource};
use crate::domain::{Decimal, Mint, Side};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock quote source with scripted per-mint prices (base per token).
///
/// Counts every quote call so tests can assert an operation never reached
/// the price source.
#[derive(Debug, Default)]
pub struct MockQuoteSource {
    prices: Mutex<HashMap<Mint, Decimal>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a price for a mint (builder style).
    pub fn with_price(self, mint: &str, price: &str) -> Self {
        self.set_price(mint, price);
        self
    }

    /// Script or update a price for a mint.
    pub fn set_price(&self, mint: &str, price: &str) {
        self.prices.lock().unwrap().insert(
            Mint::new(mint.to_string()),
            Decimal::from_str_canonical(price).expect("mock price must parse"),
        );
    }

    /// Make every subsequent quote fail with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of quote calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for MockQuoteSource {
    async fn quote(
        &self,
        mint: &Mint,
        side: Side,
        amount: Decimal,
    ) -> Result<Decimal, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(QuoteError::Network("mock quote failure".to_string()));
        }

        let price = self
            .prices
            .lock()
            .unwrap()
            .get(mint)
            .copied()
            .ok_or_else(|| QuoteError::Parse(format!("no mock price for {}", mint)))?;

        let out = match side {
            // Base in, tokens out.
            Side::Buy => amount
                .checked_div(price)
                .ok_or_else(|| QuoteError::Parse("mock price is zero".to_string()))?,
            // Tokens in, base out.
            Side::Sell => amount * price,
        };

        Ok(out.quantize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[tokio::test]
    async fn test_mock_buy_converts_base_to_tokens() {
        let mock = MockQuoteSource::new().with_price("mint1", "2");
        let mint = Mint::new("mint1".to_string());

        let tokens = mock.quote(&mint, Side::Buy, d("10")).await.unwrap();
        assert_eq!(tokens, d("5"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_sell_converts_tokens_to_base() {
        let mock = MockQuoteSource::new().with_price("mint1", "2");
        let mint = Mint::new("mint1".to_string());

        let base = mock.quote(&mint, Side::Sell, d("5")).await.unwrap();
        assert_eq!(base, d("10"));
    }

    #[tokio::test]
    async fn test_mock_unknown_mint_fails() {
        let mock = MockQuoteSource::new();
        let mint = Mint::new("unknown".to_string());

        let err = mock.quote(&mint, Side::Buy, d("1")).await.unwrap_err();
        assert!(matches!(err, QuoteError::Parse(_)));
    }

    #[tokio::test]
    async fn test_mock_failing_mode() {
        let mock = MockQuoteSource::new().with_price("mint1", "2");
        mock.set_failing(true);
        let mint = Mint::new("mint1".to_string());

        let err = mock.quote(&mint, Side::Sell, d("1")).await.unwrap_err();
        assert!(matches!(err, QuoteError::Network(_)));
        assert_eq!(mock.calls(), 1);
    }
}
