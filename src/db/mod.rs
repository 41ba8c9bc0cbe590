//! SQLite persistence for the trade journal.
//!
//! Stores each saved plan as a flat row: the raw inputs, the computed
//! outputs, and the journal lifecycle columns. The engine itself never
//! touches this layer.

use anyhow::{bail, Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::models::{TradeRecord, TradeStatus};

/// Database connection pool for the journal.
pub struct Database {
    pool: SqlitePool,
}

/// Stored trade row as persisted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredTrade {
    pub id: String,
    pub symbol: String,
    pub direction: String,
    pub entry_price: f64,
    pub status: String,
    pub created_at: String,

    // Inputs
    pub balance_chf: f64,
    pub risk_pct: f64,
    pub stop_distance: f64,
    pub stop_unit: String,
    pub lot_step: f64,
    pub usdchf_rate: f64,
    pub tick_size: Option<f64>,
    pub contract_size: Option<f64>,

    // Outputs
    pub sl_price: f64,
    pub tp_price: f64,
    pub risk_distance_price: f64,
    pub reward_distance_price: f64,
    pub value_per_unit_1lot_chf: f64,
    pub stop_value_1lot_chf: f64,
    pub lots: f64,
    pub exposure_units: f64,
    pub risk_chf: f64,
    pub reward_chf: f64,
    pub reward_to_risk: f64,

    // Journal
    pub note: Option<String>,
    pub opened_at: Option<String>,
    pub closed_at: Option<String>,
    pub realized_pnl_chf: Option<f64>,
    pub realized_r_multiple: Option<f64>,
}

fn f64_of(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

impl Database {
    /// Create a new database connection.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run all database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trades (
                id TEXT PRIMARY KEY,
                symbol TEXT NOT NULL,
                direction TEXT NOT NULL,
                entry_price REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'PLANNED',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,

                balance_chf REAL NOT NULL,
                risk_pct REAL NOT NULL,
                stop_distance REAL NOT NULL,
                stop_unit TEXT NOT NULL,
                lot_step REAL NOT NULL,
                usdchf_rate REAL NOT NULL,
                tick_size REAL,
                contract_size REAL,

                sl_price REAL NOT NULL,
                tp_price REAL NOT NULL,
                risk_distance_price REAL NOT NULL,
                reward_distance_price REAL NOT NULL,
                value_per_unit_1lot_chf REAL NOT NULL,
                stop_value_1lot_chf REAL NOT NULL,
                lots REAL NOT NULL,
                exposure_units REAL NOT NULL,
                risk_chf REAL NOT NULL,
                reward_chf REAL NOT NULL,
                reward_to_risk REAL NOT NULL,

                note TEXT,
                opened_at TEXT,
                closed_at TEXT,
                realized_pnl_chf REAL,
                realized_r_multiple REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_trades_status ON trades(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_trades_symbol ON trades(symbol)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a newly planned trade.
    pub async fn save_trade(&self, record: &TradeRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO trades (
                id, symbol, direction, entry_price, status, created_at,
                balance_chf, risk_pct, stop_distance, stop_unit, lot_step,
                usdchf_rate, tick_size, contract_size,
                sl_price, tp_price, risk_distance_price, reward_distance_price,
                value_per_unit_1lot_chf, stop_value_1lot_chf, lots,
                exposure_units, risk_chf, reward_chf, reward_to_risk, note
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(record.symbol.as_str())
        .bind(record.direction.as_str())
        .bind(f64_of(record.entry_price))
        .bind(record.status.as_str())
        .bind(record.created_at.to_rfc3339())
        .bind(f64_of(record.inputs.balance_chf))
        .bind(f64_of(record.inputs.risk_pct))
        .bind(f64_of(record.inputs.stop_distance))
        .bind(&record.inputs.stop_unit)
        .bind(f64_of(record.inputs.lot_step))
        .bind(f64_of(record.inputs.usdchf_rate))
        .bind(record.inputs.tick_size.map(f64_of))
        .bind(record.inputs.contract_size.map(f64_of))
        .bind(f64_of(record.outputs.sl_price))
        .bind(f64_of(record.outputs.tp_price))
        .bind(f64_of(record.outputs.risk_distance_price))
        .bind(f64_of(record.outputs.reward_distance_price))
        .bind(f64_of(record.outputs.value_per_unit_per_lot_chf))
        .bind(f64_of(record.outputs.stop_value_per_lot_chf))
        .bind(f64_of(record.outputs.lots))
        .bind(f64_of(record.outputs.exposure_units))
        .bind(f64_of(record.outputs.risk_chf))
        .bind(f64_of(record.outputs.reward_chf))
        .bind(f64_of(record.outputs.reward_to_risk))
        .bind(record.journal.note.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All trades, newest first.
    pub async fn list_trades(&self) -> Result<Vec<StoredTrade>> {
        sqlx::query_as::<_, StoredTrade>("SELECT * FROM trades ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch trades")
    }

    /// Look up a single trade by id.
    pub async fn get_trade(&self, id: &str) -> Result<Option<StoredTrade>> {
        sqlx::query_as::<_, StoredTrade>("SELECT * FROM trades WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch trade")
    }

    /// Transition PLANNED -> OPEN, stamping `opened_at`.
    pub async fn open_trade(&self, id: &str) -> Result<()> {
        self.require_status(id, TradeStatus::Planned).await?;

        sqlx::query(
            "UPDATE trades SET status = 'OPEN', opened_at = datetime('now') WHERE id = ?",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Transition OPEN -> CLOSED with the realized result.
    pub async fn close_trade(
        &self,
        id: &str,
        realized_pnl_chf: f64,
        realized_r_multiple: Option<f64>,
    ) -> Result<()> {
        self.require_status(id, TradeStatus::Open).await?;

        sqlx::query(
            r#"
            UPDATE trades SET
                status = 'CLOSED',
                closed_at = datetime('now'),
                realized_pnl_chf = ?,
                realized_r_multiple = ?
            WHERE id = ?
            "#,
        )
        .bind(realized_pnl_chf)
        .bind(realized_r_multiple)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Transition PLANNED -> CANCELLED.
    pub async fn cancel_trade(&self, id: &str) -> Result<()> {
        self.require_status(id, TradeStatus::Planned).await?;

        sqlx::query("UPDATE trades SET status = 'CANCELLED' WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn require_status(&self, id: &str, expected: TradeStatus) -> Result<()> {
        let trade = self
            .get_trade(id)
            .await?
            .with_context(|| format!("No trade with id {id}"))?;

        if trade.status != expected.as_str() {
            bail!(
                "Trade {id} is {}, expected {}",
                trade.status,
                expected.as_str()
            );
        }

        Ok(())
    }

    /// Get the connection pool (for advanced queries).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
