//! Multi-horizon growth projection.
//!
//! Simulates future account value week by week under compounding and
//! position-scaling assumptions. The simulation is bounded and conservative:
//! it caps assumed daily profit at half the daily risk allowance, discounts by
//! win rate, limits position scaling, and applies a fixed volatility haircut
//! every 8th week. It is fully deterministic: identical inputs produce
//! identical snapshots, with no clock and no randomness anywhere.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::ledger::LedgerState;

/// Weeks per calendar month used by the chart checkpoints (52 / 12).
const WEEKS_PER_MONTH: f64 = 4.33;

/// A fixed future point, in trading days, at which a snapshot is reported.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Horizon {
    pub label: &'static str,
    pub trading_days: u32,
}

/// Projector tuning knobs.
///
/// The fallbacks are product-judgment constants, not derived figures; they are
/// named here so call sites can override them instead of patching literals.
#[derive(Debug, Clone)]
pub struct ProjectorConfig {
    /// Assumed daily profit when the journal has no profitable history
    pub fallback_daily_profit: Decimal,

    /// Optimistic win rate assumed when no trade history exists.
    /// Used only for projections, never for the displayed actual win rate.
    pub default_win_rate: f64,

    /// Horizons to report
    pub horizons: Vec<Horizon>,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            fallback_daily_profit: dec!(50),
            default_win_rate: 75.0,
            horizons: vec![
                Horizon { label: "1 Month", trading_days: 22 },
                Horizon { label: "6 Months", trading_days: 132 },
                Horizon { label: "1 Year", trading_days: 250 },
                Horizon { label: "5 Years", trading_days: 1250 },
            ],
        }
    }
}

/// Inputs to a projection run, taken from the current ledger and stats.
#[derive(Debug, Clone)]
pub struct ProjectionInputs {
    /// Current ledger split to project forward from
    pub ledger: LedgerState,

    /// Historical average daily profit
    pub avg_daily_profit: Decimal,

    /// Actual win rate in percent; `None` when there is no trade history
    pub win_rate_percent: Option<f64>,

    /// Maximum daily loss in dollars
    pub daily_risk_limit: Decimal,

    /// Fraction of weekly profit diverted into savings (0-100)
    pub compounding_percent: Decimal,
}

/// Projected account state at one horizon.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionSnapshot {
    pub label: &'static str,
    pub trading_days: u32,
    pub available: Decimal,
    pub saved: Decimal,
    pub total_value: Decimal,
    pub total_profit_generated: Decimal,

    /// Total value gained over the starting snapshot (0 if starting total <= 0)
    pub growth: Decimal,

    /// Total value relative to the starting total (0 if starting total <= 0)
    pub multiplier: f64,
}

/// One point of the monthly growth-chart series.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthPoint {
    pub month: u32,
    pub available: Decimal,
    pub saved: Decimal,
    pub total_value: Decimal,
}

/// Running state of a simulation.
#[derive(Debug, Clone, Copy)]
struct SimState {
    available: Decimal,
    saved: Decimal,
    profit_generated: Decimal,
}

impl SimState {
    fn start_from(ledger: &LedgerState) -> Self {
        Self {
            available: ledger.available,
            saved: ledger.saved,
            profit_generated: Decimal::ZERO,
        }
    }

    fn total(&self) -> Decimal {
        self.available + self.saved
    }
}

/// Growth projector.
pub struct Projector {
    config: ProjectorConfig,
}

impl Projector {
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    /// Project the account across all configured horizons.
    pub fn project(&self, inputs: &ProjectionInputs) -> Vec<ProjectionSnapshot> {
        let weekly_baseline = self.weekly_baseline(inputs);
        let rate = inputs.compounding_percent / dec!(100);
        let initial_total = inputs.ledger.total();

        self.config
            .horizons
            .iter()
            .map(|horizon| {
                // Whole trading weeks, 5 trading days each
                let weeks = horizon.trading_days.div_ceil(5);

                let mut state = SimState::start_from(&inputs.ledger);
                for week in 1..=weeks {
                    step_week(&mut state, week, weekly_baseline, rate);
                }

                let total_value = state.total();
                let (growth, multiplier) = if initial_total > Decimal::ZERO {
                    (
                        total_value - initial_total,
                        (total_value / initial_total).to_f64().unwrap_or(0.0),
                    )
                } else {
                    (Decimal::ZERO, 0.0)
                };

                ProjectionSnapshot {
                    label: horizon.label,
                    trading_days: horizon.trading_days,
                    available: state.available,
                    saved: state.saved,
                    total_value,
                    total_profit_generated: state.profit_generated,
                    growth,
                    multiplier,
                }
            })
            .collect()
    }

    /// Monthly checkpoints for the growth chart, months 1 through 12.
    ///
    /// Uses the same weekly step as [`Projector::project`], sampled at
    /// fractional month boundaries, so the two views agree at overlapping
    /// points.
    pub fn monthly_checkpoints(&self, inputs: &ProjectionInputs) -> Vec<GrowthPoint> {
        let weekly_baseline = self.weekly_baseline(inputs);
        let rate = inputs.compounding_percent / dec!(100);

        (1..=12)
            .map(|month| {
                let weeks = (month as f64 * WEEKS_PER_MONTH).round() as u32;

                let mut state = SimState::start_from(&inputs.ledger);
                for week in 1..=weeks {
                    step_week(&mut state, week, weekly_baseline, rate);
                }

                GrowthPoint {
                    month,
                    available: state.available,
                    saved: state.saved,
                    total_value: state.total(),
                }
            })
            .collect()
    }

    /// Conservative weekly profit baseline.
    fn weekly_baseline(&self, inputs: &ProjectionInputs) -> Decimal {
        // Project from the fallback constant rather than from zero history
        let base = if inputs.avg_daily_profit > Decimal::ZERO {
            inputs.avg_daily_profit
        } else {
            self.config.fallback_daily_profit
        };

        // Never assume more than half the user's own daily risk ceiling
        let conservative_daily = base.min(inputs.daily_risk_limit * dec!(0.5));

        // Discount by skill, floored at 0.7 so a cold streak doesn't zero it out
        let win_rate = inputs
            .win_rate_percent
            .unwrap_or(self.config.default_win_rate);
        let skill = (win_rate / 100.0).max(0.7);
        let adjusted_daily =
            conservative_daily * Decimal::try_from(skill).unwrap_or(dec!(0.7));

        adjusted_daily * dec!(5)
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(ProjectorConfig::default())
    }
}

/// Advance the simulation by one week. Shared by the horizon and
/// monthly-checkpoint runs so the two series stay mutually consistent.
fn step_week(state: &mut SimState, week: u32, weekly_baseline: Decimal, compounding_rate: Decimal) {
    // Position scaling: one lot per 10k of available capital, capped at 1.0,
    // expressed relative to a 0.1-lot baseline and floored at 0.5x
    let lot_size = (state.available / dec!(10000)).min(Decimal::ONE);
    let position_multiplier = (lot_size / dec!(0.1)).max(dec!(0.5));

    // Multiplier capped at 3x to bound compounding runaway
    let week_profit = weekly_baseline * position_multiplier.min(dec!(3));

    state.available += week_profit;
    state.profit_generated += week_profit;

    if week_profit > Decimal::ZERO {
        let diverted = week_profit * compounding_rate;
        state.available -= diverted;
        state.saved += diverted;
    }

    // Fixed volatility haircut every 8th week, not a random draw
    if week % 8 == 0 {
        let drawdown = week_profit * dec!(0.2);
        state.available -= drawdown;
        state.profit_generated -= drawdown;
    }
}
