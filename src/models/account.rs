//! Account configuration: capital, daily risk allowance, compounding rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Per-user account configuration.
///
/// The engine treats this as an immutable parameter object passed into every
/// calculation; it never validates ranges, it clamps or passes values through
/// arithmetically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Baseline capital before any trade profit
    pub starting_capital: Decimal,

    /// Maximum daily loss allowance as a percentage of starting capital
    pub daily_risk_limit_percent: Decimal,

    /// Fraction of each profitable trade's profit diverted into savings (0-100)
    pub compounding_percent: Decimal,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            starting_capital: dec!(1000),
            daily_risk_limit_percent: dec!(5),  // $50/day on default capital
            compounding_percent: dec!(50),      // Save half of every win
        }
    }
}

impl AccountConfig {
    /// Maximum daily loss in dollars.
    pub fn daily_risk_limit(&self) -> Decimal {
        self.starting_capital * self.daily_risk_limit_percent / dec!(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AccountConfig::default();
        assert_eq!(config.starting_capital, dec!(1000));
        assert_eq!(config.daily_risk_limit(), dec!(50));
    }

    #[test]
    fn test_daily_risk_limit_scales_with_capital() {
        let config = AccountConfig {
            starting_capital: dec!(25000),
            daily_risk_limit_percent: dec!(2),
            ..Default::default()
        };
        assert_eq!(config.daily_risk_limit(), dec!(500));
    }
}
