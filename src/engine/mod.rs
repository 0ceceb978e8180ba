//! The calculation engine: pip normalization, compounding ledger, health
//! scoring, and growth projection.
//!
//! Every function here is a pure, synchronous fold over an immutable input
//! snapshot with no I/O, no shared state, and no clocks. The store hands the engine
//! a fresh snapshot on every read and the engine recomputes from scratch.

mod health;
mod ledger;
mod pips;
mod projector;

pub use health::{health_score, HealthBucket, HealthScore};
pub use ledger::{compute_ledger, LedgerState, StatsCalculator, TradeStats};
pub use pips::{pip_count, pip_size};
pub use projector::{
    GrowthPoint, Horizon, ProjectionInputs, ProjectionSnapshot, Projector, ProjectorConfig,
};
