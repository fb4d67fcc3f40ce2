//! Fixed-point decimal numeric type backed by rust_decimal.
//!
//! All amounts and prices that feed cost-basis or PnL arithmetic go through
//! this type; binary floating point is never used for accounting values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by ledger amounts (lamport scale).
pub const SCALE: u32 = 9;

const LAMPORTS_PER_UNIT: u64 = 1_000_000_000;

/// Fixed-point decimal for amounts, prices, and PnL.
///
/// Serializes to a JSON number (not a string) by default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Format as a canonical string: no exponent notation, no trailing zeros.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    /// Round to the ledger scale (9 fractional digits, banker's rounding).
    pub fn quantize(&self) -> Self {
        Decimal(self.0.round_dp(SCALE))
    }

    /// Convert a token/base amount to integer lamports, truncating sub-lamport
    /// precision. Returns None for negative amounts or values past u64 range.
    pub fn to_lamports(&self) -> Option<u64> {
        (self.0 * RustDecimal::from(LAMPORTS_PER_UNIT)).trunc().to_u64()
    }

    /// Build an amount from integer lamports.
    pub fn from_lamports(lamports: u64) -> Self {
        Decimal(RustDecimal::from_i128_with_scale(lamports as i128, SCALE))
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn one() -> Self {
        Decimal(RustDecimal::ONE)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Division that yields None instead of panicking on a zero divisor.
    pub fn checked_div(&self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_div(rhs.0).map(Decimal)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl std::ops::$trait for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Decimal) -> Decimal {
                Decimal(self.0 $op rhs.0)
            }
        }
    };
}

forward_binop!(Add, add, +);
forward_binop!(Sub, sub, -);
forward_binop!(Mul, mul, *);
forward_binop!(Div, div, /);

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let cases = vec![
            "123.456",
            "0.0001",
            "1000000",
            "-123.456",
            "0",
            "999999999.999999999",
        ];

        for s in cases {
            let decimal = Decimal::from_str_canonical(s).expect("parse failed");
            let formatted = decimal.to_canonical_string();
            let reparsed = Decimal::from_str_canonical(&formatted).expect("reparse failed");
            assert_eq!(decimal, reparsed, "roundtrip failed for {}", s);
        }
    }

    #[test]
    fn test_canonical_no_exponent() {
        let decimal = Decimal::from_str_canonical("123").expect("parse failed");
        let formatted = decimal.to_canonical_string();
        assert!(!formatted.contains('e'));
        assert_eq!(formatted, "123");
    }

    #[test]
    fn test_arithmetic() {
        let a = Decimal::from_str_canonical("10.5").unwrap();
        let b = Decimal::from_str_canonical("2.5").unwrap();

        assert_eq!((a + b).to_canonical_string(), "13");
        assert_eq!((a - b).to_canonical_string(), "8");
        assert_eq!((a * b).to_canonical_string(), "26.25");
        assert_eq!((a / b).to_canonical_string(), "4.2");
    }

    #[test]
    fn test_quantize_to_ledger_scale() {
        let fine = Decimal::from_str_canonical("1.00000000049").unwrap();
        assert_eq!(fine.quantize().to_canonical_string(), "1");

        let coarse = Decimal::from_str_canonical("2.5").unwrap();
        assert_eq!(coarse.quantize(), coarse);
    }

    #[test]
    fn test_lamport_conversion() {
        let amount = Decimal::from_str_canonical("1.5").unwrap();
        assert_eq!(amount.to_lamports(), Some(1_500_000_000));

        let back = Decimal::from_lamports(1_500_000_000);
        assert_eq!(back, amount);

        // Sub-lamport precision truncates.
        let tiny = Decimal::from_str_canonical("0.0000000009999").unwrap();
        assert_eq!(tiny.to_lamports(), Some(0));

        let negative = Decimal::from_str_canonical("-1").unwrap();
        assert_eq!(negative.to_lamports(), None);
    }

    #[test]
    fn test_checked_div_by_zero() {
        let a = Decimal::from_str_canonical("10").unwrap();
        assert_eq!(a.checked_div(Decimal::zero()), None);
        assert_eq!(
            a.checked_div(Decimal::from_str_canonical("4").unwrap()),
            Some(Decimal::from_str_canonical("2.5").unwrap())
        );
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Decimal::from_str_canonical("0.1").unwrap().is_positive());
        assert!(Decimal::from_str_canonical("-0.1").unwrap().is_negative());
        assert!(!Decimal::zero().is_positive());
        assert!(!Decimal::zero().is_negative());
    }

    #[test]
    fn test_json_serialization_as_number() {
        let decimal = Decimal::from_str_canonical("123.456").unwrap();
        let json = serde_json::to_value(decimal).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "123.456");
    }

    #[test]
    fn test_display() {
        let decimal = Decimal::from_str_canonical("99.99").unwrap();
        assert_eq!(decimal.to_string(), "99.99");
    }

    #[test]
    fn test_ordering() {
        let a = Decimal::from_str_canonical("10").unwrap();
        let b = Decimal::from_str_canonical("20").unwrap();
        assert!(a < b);
        assert!(b > a);
    }
}
