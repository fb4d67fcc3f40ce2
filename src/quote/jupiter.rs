//! Jupiter v6 quote API client.

use super::{QuoteError, QuoteSource};
use crate::domain::{Decimal, Mint, Side};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Wrapped-SOL mint, the fixed base asset of every quoted pair.
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Quote source backed by the Jupiter v6 `/quote` endpoint.
#[derive(Debug, Clone)]
pub struct JupiterQuoteSource {
    client: Client,
    base_url: String,
    slippage_bps: u16,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterQuote {
    out_amount: String,
}

impl JupiterQuoteSource {
    /// Create a client against `base_url` (e.g. `https://quote-api.jup.ag/v6`).
    ///
    /// `timeout` bounds each request and also caps the retry budget for
    /// transient failures.
    pub fn new(base_url: String, timeout: Duration, slippage_bps: u16) -> Self {
        Self {
            client: Client::new(),
            base_url,
            slippage_bps,
            timeout,
        }
    }

    async fn get_quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount_lamports: u64,
    ) -> Result<JupiterQuote, QuoteError> {
        let url = format!("{}/quote", self.base_url);
        let params = [
            ("inputMint", input_mint.to_string()),
            ("outputMint", output_mint.to_string()),
            ("amount", amount_lamports.to_string()),
            ("slippageBps", self.slippage_bps.to_string()),
        ];
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.timeout),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .get(&url)
                .query(&params)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| backoff::Error::transient(QuoteError::Network(e.to_string())))?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(QuoteError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(QuoteError::Http {
                    status: status.as_u16(),
                    message: "server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(QuoteError::Http {
                    status: status.as_u16(),
                    message: "client error".to_string(),
                }));
            }

            response
                .json::<JupiterQuote>()
                .await
                .map_err(|e| backoff::Error::permanent(QuoteError::Parse(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl QuoteSource for JupiterQuoteSource {
    async fn quote(
        &self,
        mint: &Mint,
        side: Side,
        amount: Decimal,
    ) -> Result<Decimal, QuoteError> {
        let (input_mint, output_mint) = match side {
            Side::Buy => (SOL_MINT, mint.as_str()),
            Side::Sell => (mint.as_str(), SOL_MINT),
        };

        let amount_lamports = amount
            .to_lamports()
            .filter(|l| *l > 0)
            .ok_or_else(|| {
                QuoteError::Parse(format!("amount {} not representable in lamports", amount))
            })?;

        debug!(
            "Fetching quote: input={}, output={}, amount_lamports={}",
            input_mint, output_mint, amount_lamports
        );

        let quote = self
            .get_quote(input_mint, output_mint, amount_lamports)
            .await?;

        let out_lamports: u64 = quote
            .out_amount
            .parse()
            .map_err(|_| QuoteError::Parse(format!("invalid outAmount: {}", quote.out_amount)))?;

        Ok(Decimal::from_lamports(out_lamports))
    }
}
