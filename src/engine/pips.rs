//! Pip normalization: converts raw price movement into a unit-less
//! performance measure comparable across instrument classes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::TradeDirection;

/// Pip size for an instrument symbol.
///
/// Unrecognized symbols fall back to the standard four-decimal forex pip
/// rather than erroring; custom symbols are allowed in the journal.
pub fn pip_size(instrument: &str) -> Decimal {
    match instrument {
        // JPY-quoted pairs are two-decimal
        "USDJPY" | "EURJPY" | "GBPJPY" | "AUDJPY" | "NZDJPY" | "CADJPY" | "CHFJPY" => dec!(0.01),

        // Index CFDs
        "US30" | "NAS100" | "SPX500" | "GER40" | "UK100" | "JPN225" | "AUS200" => dec!(0.1),

        // Metals
        "XAUUSD" => dec!(0.1),
        "XAGUSD" => dec!(0.01),

        // Energies
        "USOIL" | "UKOIL" | "NATGAS" => dec!(0.01),

        // Soft commodities
        "COFFEE" | "COCOA" | "SUGAR" | "COTTON" => dec!(0.01),

        // Crypto pairs
        "BTCUSD" => dec!(1.0),
        "ETHUSD" => dec!(0.1),

        // Standard forex majors/minors, and the fallback for anything unknown
        _ => dec!(0.0001),
    }
}

/// Signed pip count for a trade, rounded to one decimal place.
///
/// SHORT positions profit when price falls, so their movement sign is
/// inverted. Returns zero when either price is missing or non-positive:
/// pips are a diagnostic field, never required for ledger correctness.
pub fn pip_count(
    instrument: &str,
    direction: TradeDirection,
    entry_price: Option<Decimal>,
    exit_price: Option<Decimal>,
) -> Decimal {
    let (Some(entry), Some(exit)) = (entry_price, exit_price) else {
        return Decimal::ZERO;
    };
    if entry <= Decimal::ZERO || exit <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let movement = match direction {
        TradeDirection::Long => exit - entry,
        TradeDirection::Short => entry - exit,
    };

    (movement / pip_size(instrument)).round_dp(1)
}
