//! Repository layer for ledger operations.

use crate::domain::{Decimal, Mint, Side, TimeMs, Trade};
use crate::engine::Position;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::str::FromStr;

/// Repository over the trade ledger and position snapshots.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Liveness probe for the readiness endpoint.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Append a trade and store the updated position as one atomic unit.
    ///
    /// Returns the ledger-assigned sequence id. Either both writes become
    /// visible together or neither does; a failed commit leaves the ledger
    /// at the pre-trade state.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn record_execution(
        &self,
        trade: &Trade,
        position: &Position,
    ) -> Result<i64, sqlx::Error> {
        let now_ms = TimeMs::now().as_ms();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO trades (mint, side, base_amount, token_amount, price, time_ms, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(trade.mint.as_str())
        .bind(trade.side.to_string())
        .bind(trade.base_amount.to_canonical_string())
        .bind(trade.token_amount.to_canonical_string())
        .bind(trade.price.to_canonical_string())
        .bind(trade.time_ms.as_ms())
        .bind(now_ms)
        .execute(&mut *tx)
        .await?;
        let seq = result.last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO positions (mint, open_qty, cost_basis, realized_pnl, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(mint) DO UPDATE SET
                open_qty = excluded.open_qty,
                cost_basis = excluded.cost_basis,
                realized_pnl = excluded.realized_pnl,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(position.mint.as_str())
        .bind(position.open_qty.to_canonical_string())
        .bind(position.cost_basis.map(|b| b.to_canonical_string()))
        .bind(position.realized_pnl.to_canonical_string())
        .bind(now_ms)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(seq)
    }

    /// Get the current position for a mint, if any.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_position(&self, mint: &Mint) -> Result<Option<Position>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT mint, open_qty, cost_basis, realized_pnl FROM positions WHERE mint = ?",
        )
        .bind(mint.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| {
            let open_qty: String = r.get("open_qty");
            let cost_basis: Option<String> = r.get("cost_basis");
            let realized_pnl: String = r.get("realized_pnl");

            Position {
                mint: Mint::new(r.get("mint")),
                open_qty: Decimal::from_str(&open_qty).unwrap_or_default(),
                cost_basis: cost_basis.and_then(|s| Decimal::from_str(&s).ok()),
                realized_pnl: Decimal::from_str(&realized_pnl).unwrap_or_default(),
            }
        }))
    }

    /// Query the trade sequence for a mint in ledger order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn query_trades(&self, mint: &Mint) -> Result<Vec<Trade>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT seq, mint, side, base_amount, token_amount, price, time_ms
            FROM trades
            WHERE mint = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(mint.as_str())
        .fetch_all(&self.pool)
        .await?;

        let trades = rows
            .iter()
            .map(|row| {
                let side_str: String = row.get("side");
                let side = match side_str.as_str() {
                    "sell" => Side::Sell,
                    _ => Side::Buy,
                };

                let base_amount: String = row.get("base_amount");
                let token_amount: String = row.get("token_amount");
                let price: String = row.get("price");

                Trade {
                    seq: row.get("seq"),
                    mint: Mint::new(row.get("mint")),
                    side,
                    base_amount: Decimal::from_str(&base_amount).unwrap_or_default(),
                    token_amount: Decimal::from_str(&token_amount).unwrap_or_default(),
                    price: Decimal::from_str(&price).unwrap_or_default(),
                    time_ms: TimeMs::new(row.get("time_ms")),
                }
            })
            .collect();

        Ok(trades)
    }

    /// Number of trades recorded for a mint.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_trades(&self, mint: &Mint) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trades WHERE mint = ?")
            .bind(mint.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
