//! Trade type representing one simulated execution.

use crate::domain::{Decimal, Mint, Side, TimeMs};
use serde::{Deserialize, Serialize};

/// An immutable record of one simulated swap against the base asset.
///
/// `base_amount` is always the SOL leg and `token_amount` the instrument leg,
/// whichever direction the swap ran. `seq` is assigned by the ledger when the
/// trade is persisted and is 0 until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Ledger sequence id, monotonically increasing across all instruments.
    pub seq: i64,
    /// Instrument mint address.
    pub mint: Mint,
    /// Trade side (Buy or Sell).
    pub side: Side,
    /// Base-asset amount exchanged.
    pub base_amount: Decimal,
    /// Token amount exchanged.
    pub token_amount: Decimal,
    /// Execution price in base per token, derived as base_amount / token_amount.
    pub price: Decimal,
    /// Execution time in milliseconds since Unix epoch.
    pub time_ms: TimeMs,
}

impl Trade {
    /// Create an unpersisted Trade; the execution price is derived from the
    /// two legs and rounded to the ledger scale.
    pub fn new(
        mint: Mint,
        side: Side,
        base_amount: Decimal,
        token_amount: Decimal,
        time_ms: TimeMs,
    ) -> Self {
        let price = base_amount
            .checked_div(token_amount)
            .map(|p| p.quantize())
            .unwrap_or_default();
        Trade {
            seq: 0,
            mint,
            side,
            base_amount,
            token_amount,
            price,
            time_ms,
        }
    }

    /// Attach the ledger-assigned sequence id.
    pub fn with_seq(mut self, seq: i64) -> Self {
        self.seq = seq;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_trade_derives_price() {
        let trade = Trade::new(
            Mint::new("mint1".to_string()),
            Side::Buy,
            d("10"),
            d("4"),
            TimeMs::new(1000),
        );
        assert_eq!(trade.price, d("2.5"));
        assert_eq!(trade.seq, 0);
    }

    #[test]
    fn test_trade_price_rounds_to_scale() {
        let trade = Trade::new(
            Mint::new("mint1".to_string()),
            Side::Buy,
            d("1"),
            d("3"),
            TimeMs::new(1000),
        );
        assert_eq!(trade.price, d("0.333333333"));
    }

    #[test]
    fn test_with_seq() {
        let trade = Trade::new(
            Mint::new("mint1".to_string()),
            Side::Sell,
            d("5"),
            d("2"),
            TimeMs::new(2000),
        )
        .with_seq(42);
        assert_eq!(trade.seq, 42);
    }

    #[test]
    fn test_trade_serialization_roundtrip() {
        let trade = Trade::new(
            Mint::new("mint1".to_string()),
            Side::Buy,
            d("10"),
            d("4"),
            TimeMs::new(1000),
        )
        .with_seq(7);
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, back);
    }
}
