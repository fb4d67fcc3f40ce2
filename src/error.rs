use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::Decimal;
use crate::engine::AccountingError;
use crate::quote::QuoteError;

/// Failure taxonomy of the trade engine.
///
/// Every variant corresponds to zero observable state change: no trade
/// recorded, no position advanced.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Non-positive or malformed amount, rejected before any I/O.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// Sell exceeds the open quantity, rejected before querying a price.
    #[error("insufficient position: held {held}, requested {requested}")]
    InsufficientPosition { held: Decimal, requested: Decimal },
    /// The external price source failed or timed out.
    #[error("quote unavailable: {0}")]
    QuoteUnavailable(#[from] QuoteError),
    /// The ledger write failed after a price was obtained; the caller must
    /// retry the whole operation since the quote may have moved.
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl From<AccountingError> for EngineError {
    fn from(err: AccountingError) -> Self {
        match err {
            AccountingError::NonPositiveAmount => {
                EngineError::InvalidAmount("amount must be positive".to_string())
            }
            AccountingError::InsufficientPosition { held, requested } => {
                EngineError::InsufficientPosition { held, requested }
            }
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            EngineError::InsufficientPosition { .. } => StatusCode::CONFLICT,
            EngineError::QuoteUnavailable(_) => StatusCode::BAD_GATEWAY,
            EngineError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounting_error_mapping() {
        let err: EngineError = AccountingError::NonPositiveAmount.into();
        assert!(matches!(err, EngineError::InvalidAmount(_)));

        let err: EngineError = AccountingError::InsufficientPosition {
            held: Decimal::zero(),
            requested: Decimal::one(),
        }
        .into();
        assert!(matches!(err, EngineError::InsufficientPosition { .. }));
    }

    #[test]
    fn test_quote_error_mapping() {
        let err: EngineError = QuoteError::RateLimited.into();
        assert!(matches!(err, EngineError::QuoteUnavailable(_)));
    }

    #[test]
    fn test_response_status_codes() {
        let cases: Vec<(EngineError, StatusCode)> = vec![
            (
                EngineError::InvalidAmount("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                EngineError::InsufficientPosition {
                    held: Decimal::zero(),
                    requested: Decimal::one(),
                },
                StatusCode::CONFLICT,
            ),
            (
                EngineError::QuoteUnavailable(QuoteError::RateLimited),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
