//! # models::instrument
//!
//! Static pip-value table for the instruments the calculator knows about.
//!
//! The table is fixed at compile time.  Any symbol not listed falls back to
//! [`DEFAULT_PIP_VALUE`], which is the pip of a standard four-decimal pair.

/// Pip value used for any symbol missing from [`PIP_VALUES`].
pub const DEFAULT_PIP_VALUE: f64 = 0.0001;

/// Symbol of the one instrument that also gets a margin check.
pub const GOLD_SYMBOL: &str = "XAUUSD";

/// Ounces per standard gold lot.
pub const GOLD_CONTRACT_SIZE: f64 = 100.0;

/// Value of one pip for one lot, keyed by upper-case symbol.
pub const PIP_VALUES: [(&str, f64); 8] = [
    ("EURUSD", 0.0001),
    ("USDJPY", 0.01),
    ("GBPUSD", 0.0001),
    ("USDCHF", 0.0001),
    ("AUDUSD", 0.0001),
    ("USDCAD", 0.0001),
    ("NZDUSD", 0.0001),
    ("XAUUSD", 0.01),
];

/// Resolve the pip value for `symbol`, ignoring case.
///
/// Never fails: unknown symbols get [`DEFAULT_PIP_VALUE`].
pub fn pip_value(symbol: &str) -> f64 {
    let upper = symbol.to_uppercase();
    PIP_VALUES
        .iter()
        .find(|(known, _)| *known == upper)
        .map(|&(_, value)| value)
        .unwrap_or(DEFAULT_PIP_VALUE)
}

/// `true` when `symbol` names gold, ignoring case.
#[inline]
pub fn is_gold(symbol: &str) -> bool {
    symbol.to_uppercase() == GOLD_SYMBOL
}

// ─── Tests ────────────────────────────────────────────────────────────────────
