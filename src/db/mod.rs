//! SQLite persistence for the trade journal.
//!
//! The store owns two things: the immutable trade records and the singleton
//! account configuration row. The engine never touches this layer; commands
//! read a fresh snapshot here and fold it through the engine.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::models::{AccountConfig, Trade, TradeDirection};

/// Database connection pool for trades and account configuration.
pub struct Database {
    pool: SqlitePool,
}

/// Raw trade row. Monetary columns are REAL; conversion back to `Decimal`
/// happens in [`StoredTrade::into_trade`].
#[derive(Debug, Clone, sqlx::FromRow)]
struct StoredTrade {
    pub id: String,
    pub created_at: String,
    pub instrument: String,
    pub direction: String,
    pub lot_size: f64,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub pips: f64,
    pub profit: f64,
}

impl StoredTrade {
    fn into_trade(self) -> Result<Trade> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .with_context(|| format!("Invalid timestamp on trade {}", self.id))?
            .with_timezone(&Utc);

        Ok(Trade {
            id: self.id,
            created_at,
            instrument: self.instrument,
            direction: TradeDirection::from_str(&self.direction),
            lot_size: Decimal::from_f64(self.lot_size).unwrap_or(Decimal::ZERO),
            entry_price: self.entry_price.and_then(Decimal::from_f64),
            exit_price: self.exit_price.and_then(Decimal::from_f64),
            pips: Decimal::from_f64(self.pips).unwrap_or(Decimal::ZERO),
            profit: Decimal::from_f64(self.profit).unwrap_or(Decimal::ZERO),
        })
    }
}

/// Raw account configuration row.
#[derive(Debug, Clone, sqlx::FromRow)]
struct StoredAccount {
    pub starting_capital: f64,
    pub daily_risk_limit_percent: f64,
    pub compounding_percent: f64,
}

impl StoredAccount {
    fn into_config(self) -> AccountConfig {
        let defaults = AccountConfig::default();
        AccountConfig {
            starting_capital: Decimal::from_f64(self.starting_capital)
                .unwrap_or(defaults.starting_capital),
            daily_risk_limit_percent: Decimal::from_f64(self.daily_risk_limit_percent)
                .unwrap_or(defaults.daily_risk_limit_percent),
            compounding_percent: Decimal::from_f64(self.compounding_percent)
                .unwrap_or(defaults.compounding_percent),
        }
    }
}

impl Database {
    /// Create a new database connection and run migrations.
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
                created_at TEXT NOT NULL,
                instrument TEXT NOT NULL,
                direction TEXT NOT NULL,
                lot_size REAL NOT NULL,
                entry_price REAL,
                exit_price REAL,
                pips REAL NOT NULL DEFAULT 0,
                profit REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account_config (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                starting_capital REAL NOT NULL DEFAULT 1000,
                daily_risk_limit_percent REAL NOT NULL DEFAULT 5,
                compounding_percent REAL NOT NULL DEFAULT 50,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== Trades ====================

    /// Insert a new trade record.
    pub async fn insert_trade(&self, trade: &Trade) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO trades (id, created_at, instrument, direction, lot_size,
                                entry_price, exit_price, pips, profit)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&trade.id)
        .bind(trade.created_at.to_rfc3339())
        .bind(&trade.instrument)
        .bind(trade.direction.as_str())
        .bind(trade.lot_size.to_f64().unwrap_or(0.0))
        .bind(trade.entry_price.and_then(|p| p.to_f64()))
        .bind(trade.exit_price.and_then(|p| p.to_f64()))
        .bind(trade.pips.to_f64().unwrap_or(0.0))
        .bind(trade.profit.to_f64().unwrap_or(0.0))
        .execute(&self.pool)
        .await
        .context("Failed to insert trade")?;

        Ok(())
    }

    /// Delete a trade by id. Returns false if no such trade existed.
    pub async fn delete_trade(&self, trade_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trades WHERE id = ?")
            .bind(trade_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch the full trade history, oldest first.
    pub async fn get_trades(&self) -> Result<Vec<Trade>> {
        let rows: Vec<StoredTrade> =
            sqlx::query_as("SELECT * FROM trades ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await
                .context("Failed to load trades")?;

        rows.into_iter().map(StoredTrade::into_trade).collect()
    }

    // ==================== Account Configuration ====================

    /// Load the account configuration, falling back to defaults when the
    /// row has never been written.
    pub async fn get_account(&self) -> Result<AccountConfig> {
        let row: Option<StoredAccount> = sqlx::query_as(
            "SELECT starting_capital, daily_risk_limit_percent, compounding_percent \
             FROM account_config WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoredAccount::into_config).unwrap_or_default())
    }

    /// Save the account configuration.
    pub async fn save_account(&self, config: &AccountConfig) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO account_config (id, starting_capital, daily_risk_limit_percent,
                                        compounding_percent, updated_at)
            VALUES (1, ?, ?, ?, datetime('now'))
            ON CONFLICT(id) DO UPDATE SET
                starting_capital = excluded.starting_capital,
                daily_risk_limit_percent = excluded.daily_risk_limit_percent,
                compounding_percent = excluded.compounding_percent,
                updated_at = datetime('now')
            "#,
        )
        .bind(config.starting_capital.to_f64().unwrap_or(0.0))
        .bind(config.daily_risk_limit_percent.to_f64().unwrap_or(0.0))
        .bind(config.compounding_percent.to_f64().unwrap_or(0.0))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
