//! Trade model representing individual journal entries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::Long => "LONG",
            TradeDirection::Short => "SHORT",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "SHORT" | "SELL" => Self::Short,
            _ => Self::Long,
        }
    }
}

/// A single logged trade. Immutable once created; the only mutation the
/// journal supports is whole-record deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier
    pub id: String,

    /// When the trade was logged, used for day-bucketing
    pub created_at: DateTime<Utc>,

    /// Instrument symbol (e.g., "EURUSD", "XAUUSD", "NAS100")
    pub instrument: String,

    /// Trade direction
    pub direction: TradeDirection,

    /// Position size in lots
    pub lot_size: Decimal,

    /// Entry price, if recorded
    pub entry_price: Option<Decimal>,

    /// Exit price, if recorded
    pub exit_price: Option<Decimal>,

    /// Signed pip count, precomputed at entry time from the prices.
    /// Informational only: ledger math never reads it, and it can
    /// disagree with `profit` (spreads and fees are not modeled here).
    #[serde(default)]
    pub pips: Decimal,

    /// Realized dollar P&L. Authoritative for all ledger math.
    pub profit: Decimal,
}

impl Trade {
    /// Create a new trade with a fresh id and timestamp.
    pub fn new(
        instrument: String,
        direction: TradeDirection,
        lot_size: Decimal,
        entry_price: Option<Decimal>,
        exit_price: Option<Decimal>,
        pips: Decimal,
        profit: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            instrument,
            direction,
            lot_size,
            entry_price,
            exit_price,
            pips,
            profit,
        }
    }

    /// Whether this trade closed in profit.
    pub fn is_win(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    /// Calendar day the trade falls on, for trading-day statistics.
    pub fn trade_day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_round_trip() {
        assert_eq!(TradeDirection::from_str("LONG"), TradeDirection::Long);
        assert_eq!(TradeDirection::from_str("short"), TradeDirection::Short);
        assert_eq!(TradeDirection::Long.as_str(), "LONG");
        assert_eq!(TradeDirection::Short.as_str(), "SHORT");
    }

    #[test]
    fn test_is_win() {
        let mut trade = Trade::new(
            "EURUSD".to_string(),
            TradeDirection::Long,
            dec!(0.1),
            Some(dec!(1.0850)),
            Some(dec!(1.0870)),
            dec!(20.0),
            dec!(35.50),
        );
        assert!(trade.is_win());

        trade.profit = dec!(-12);
        assert!(!trade.is_win());

        trade.profit = Decimal::ZERO;
        assert!(!trade.is_win());
    }
}
