//! Compounding ledger and journal-wide trade statistics.
//!
//! The ledger splits realized profit between "available" trading capital and
//! "saved" capital on every winning trade. Savings, once allocated, are never
//! clawed back by later losses. Everything here is recomputed from scratch on
//! every read, as a fold over the immutable trade snapshot.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::models::{AccountConfig, Trade};

/// Split of account value between trading exposure and savings.
///
/// Invariant: `available + saved == starting_capital + realized_profit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerState {
    /// Capital currently exposed to trading
    pub available: Decimal,

    /// Capital set aside by the compounding rule, no longer at risk
    pub saved: Decimal,

    /// Sum of profit over all trades
    pub realized_profit: Decimal,
}

impl LedgerState {
    /// Total account value.
    pub fn total(&self) -> Decimal {
        self.available + self.saved
    }
}

/// Fold the full trade history into a ledger split.
///
/// Order-independent: every trade adds its profit to `available`, and each
/// *winning* trade diverts `compounding_percent` of its profit into `saved`.
/// Losses draw down `available` in full and never touch `saved`. Full
/// precision is retained; rounding happens only at the presentation boundary.
pub fn compute_ledger(
    trades: &[Trade],
    starting_capital: Decimal,
    compounding_percent: Decimal,
) -> LedgerState {
    let rate = compounding_percent / dec!(100);

    let mut available = starting_capital;
    let mut saved = Decimal::ZERO;
    let mut realized = Decimal::ZERO;

    for trade in trades {
        realized += trade.profit;
        available += trade.profit;

        if trade.profit > Decimal::ZERO {
            let diverted = trade.profit * rate;
            available -= diverted;
            saved += diverted;
        }
    }

    LedgerState {
        available,
        saved,
        realized_profit: realized,
    }
}

/// Aggregate journal statistics consumed by the health scorer, the growth
/// projector, and the status display.
#[derive(Debug, Clone, Serialize)]
pub struct TradeStats {
    /// Total number of logged trades
    pub total_trades: u32,

    /// Trades that closed in profit
    pub winning_trades: u32,

    /// Trades that closed flat or at a loss
    pub losing_trades: u32,

    /// Win rate in percent (0 when there are no trades)
    pub win_rate: f64,

    /// Sum of profit over all trades
    pub total_profit: Decimal,

    /// Average profit on winning trades
    pub avg_win: Decimal,

    /// Average loss on losing trades (absolute value)
    pub avg_loss: Decimal,

    /// Gross profit / gross loss
    pub profit_factor: f64,

    /// Count of distinct calendar days with at least one trade
    pub unique_trading_days: u32,

    /// Total profit / unique trading days (0 with no trading days)
    pub avg_daily_profit: Decimal,

    /// Standard deviation of per-day P&L totals
    pub daily_volatility: f64,

    /// Realized P&L for trades logged today
    pub today_pl: Decimal,

    /// Today's realized loss as a percentage of the daily risk allowance.
    /// A profitable day utilizes 0%.
    pub risk_used_percent: f64,

    /// Realized return on starting capital, in percent
    pub roi_percent: f64,
}

/// Calculator for journal statistics.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute statistics over the full trade snapshot.
    ///
    /// `today` is passed in rather than read from a clock so callers (and
    /// tests) control the day boundary.
    pub fn calculate(trades: &[Trade], config: &AccountConfig, today: NaiveDate) -> TradeStats {
        let total_trades = trades.len() as u32;

        let (wins, losses): (Vec<&Trade>, Vec<&Trade>) =
            trades.iter().partition(|t| t.is_win());

        let win_rate = if total_trades > 0 {
            wins.len() as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let total_profit: Decimal = trades.iter().map(|t| t.profit).sum();

        let avg_win = if !wins.is_empty() {
            wins.iter().map(|t| t.profit).sum::<Decimal>() / Decimal::from(wins.len() as u32)
        } else {
            Decimal::ZERO
        };

        let avg_loss = if !losses.is_empty() {
            losses.iter().map(|t| t.profit.abs()).sum::<Decimal>()
                / Decimal::from(losses.len() as u32)
        } else {
            Decimal::ZERO
        };

        let gross_profit: Decimal = wins.iter().map(|t| t.profit).sum();
        let gross_loss: Decimal = losses.iter().map(|t| t.profit.abs()).sum();
        let profit_factor = if gross_loss > Decimal::ZERO {
            gross_profit.to_f64().unwrap_or(0.0) / gross_loss.to_f64().unwrap_or(1.0)
        } else {
            0.0
        };

        // Day-bucketed P&L drives the daily aggregates
        let mut day_totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for trade in trades {
            *day_totals.entry(trade.trade_day()).or_insert(Decimal::ZERO) += trade.profit;
        }

        let unique_trading_days = day_totals.len() as u32;
        let avg_daily_profit = if unique_trading_days > 0 {
            total_profit / Decimal::from(unique_trading_days)
        } else {
            Decimal::ZERO
        };

        let daily_volatility = if day_totals.len() >= 2 {
            let series: Vec<f64> = day_totals
                .values()
                .filter_map(|p| p.to_f64())
                .collect();
            series.std_dev()
        } else {
            0.0
        };

        let today_pl = day_totals.get(&today).copied().unwrap_or(Decimal::ZERO);

        let daily_limit = config.daily_risk_limit();
        let risk_used_percent = if daily_limit > Decimal::ZERO {
            let loss_today = (-today_pl).max(Decimal::ZERO);
            (loss_today / daily_limit * dec!(100)).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };

        let roi_percent = if config.starting_capital > Decimal::ZERO {
            (total_profit / config.starting_capital * dec!(100))
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        };

        TradeStats {
            total_trades,
            winning_trades: wins.len() as u32,
            losing_trades: losses.len() as u32,
            win_rate,
            total_profit,
            avg_win,
            avg_loss,
            profit_factor,
            unique_trading_days,
            avg_daily_profit,
            daily_volatility,
            today_pl,
            risk_used_percent,
            roi_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeDirection;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn trade_on(day: u32, profit: Decimal) -> Trade {
        let mut trade = Trade::new(
            "EURUSD".to_string(),
            TradeDirection::Long,
            dec!(0.1),
            None,
            None,
            Decimal::ZERO,
            profit,
        );
        trade.created_at = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        trade
    }

    #[test]
    fn test_compounding_splits_winning_profit() {
        // Starting 1000, compounding 50%: +100 -> available 1050, saved 50
        let trades = vec![trade_on(1, dec!(100))];
        let ledger = compute_ledger(&trades, dec!(1000), dec!(50));

        assert_eq!(ledger.available, dec!(1050));
        assert_eq!(ledger.saved, dec!(50));
        assert_eq!(ledger.total(), dec!(1100));
    }

    #[test]
    fn test_losses_never_touch_saved() {
        let trades = vec![trade_on(1, dec!(100)), trade_on(2, dec!(-30))];
        let ledger = compute_ledger(&trades, dec!(1000), dec!(50));

        assert_eq!(ledger.available, dec!(1020));
        assert_eq!(ledger.saved, dec!(50));
        assert_eq!(ledger.realized_profit, dec!(70));
    }

    #[test]
    fn test_partition_invariant() {
        // available + saved == starting capital + total profit, for any rate
        let trades = vec![
            trade_on(1, dec!(37.21)),
            trade_on(1, dec!(-18.40)),
            trade_on(3, dec!(250)),
            trade_on(5, dec!(-0.01)),
            trade_on(9, dec!(12.345)),
        ];
        let total: Decimal = trades.iter().map(|t| t.profit).sum();

        for rate in [dec!(0), dec!(12.5), dec!(50), dec!(100)] {
            let ledger = compute_ledger(&trades, dec!(1000), rate);
            assert_eq!(ledger.available + ledger.saved, dec!(1000) + total);
        }
    }

    #[test]
    fn test_saved_monotonic_in_winning_trades() {
        let mut trades = vec![trade_on(1, dec!(40))];
        let before = compute_ledger(&trades, dec!(1000), dec!(30)).saved;

        trades.push(trade_on(2, dec!(-500)));
        let after_loss = compute_ledger(&trades, dec!(1000), dec!(30)).saved;
        assert_eq!(before, after_loss);

        trades.push(trade_on(3, dec!(10)));
        let after_win = compute_ledger(&trades, dec!(1000), dec!(30)).saved;
        assert!(after_win > after_loss);
    }

    #[test]
    fn test_ledger_order_independent() {
        let mut trades = vec![
            trade_on(1, dec!(100)),
            trade_on(2, dec!(-30)),
            trade_on(3, dec!(55.5)),
        ];
        let forward = compute_ledger(&trades, dec!(1000), dec!(50));
        trades.reverse();
        let reversed = compute_ledger(&trades, dec!(1000), dec!(50));

        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_zero_compounding_keeps_everything_available() {
        let trades = vec![trade_on(1, dec!(100)), trade_on(2, dec!(60))];
        let ledger = compute_ledger(&trades, dec!(500), dec!(0));

        assert_eq!(ledger.available, dec!(660));
        assert_eq!(ledger.saved, Decimal::ZERO);
    }

    #[test]
    fn test_stats_empty_journal() {
        let config = AccountConfig::default();
        let stats = StatsCalculator::calculate(&[], &config, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.unique_trading_days, 0);
        assert_eq!(stats.avg_daily_profit, Decimal::ZERO);
        assert_eq!(stats.risk_used_percent, 0.0);
    }

    #[test]
    fn test_stats_day_bucketing() {
        let config = AccountConfig::default();
        let trades = vec![
            trade_on(1, dec!(100)),
            trade_on(1, dec!(-20)),
            trade_on(2, dec!(50)),
            trade_on(4, dec!(-10)),
        ];
        let stats = StatsCalculator::calculate(
            &trades,
            &config,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        );

        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.winning_trades, 2);
        assert_eq!(stats.unique_trading_days, 3);
        assert_eq!(stats.avg_daily_profit, dec!(40));
        assert_eq!(stats.today_pl, dec!(-10));
        assert!((stats.win_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_risk_utilization_from_todays_loss() {
        // Default config: $50/day allowance. A $25 losing day uses 50%.
        let config = AccountConfig::default();
        let trades = vec![trade_on(4, dec!(-25))];
        let stats = StatsCalculator::calculate(
            &trades,
            &config,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        );
        assert!((stats.risk_used_percent - 50.0).abs() < 1e-9);

        // A profitable day utilizes nothing
        let trades = vec![trade_on(4, dec!(80))];
        let stats = StatsCalculator::calculate(
            &trades,
            &config,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        );
        assert_eq!(stats.risk_used_percent, 0.0);
    }

    #[test]
    fn test_profit_factor_and_averages() {
        let config = AccountConfig::default();
        let trades = vec![
            trade_on(1, dec!(100)),
            trade_on(2, dec!(200)),
            trade_on(3, dec!(-150)),
        ];
        let stats = StatsCalculator::calculate(
            &trades,
            &config,
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        );

        assert_eq!(stats.avg_win, dec!(150));
        assert_eq!(stats.avg_loss, dec!(150));
        assert!((stats.profit_factor - 2.0).abs() < 1e-9);
        assert!((stats.roi_percent - 15.0).abs() < 1e-9);
    }
}
