//! # models::quote
//!
//! [`Quote`] is the single outcome a successful session prints.  Its
//! `Display` impl is the user-facing text, one or two lines, without the
//! trailing newline.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Quote {
    /// Any non-gold symbol: lot size only.
    LotSize { symbol: String, lot_size: f64 },

    /// Gold with enough balance to cover the margin.
    WithMargin {
        symbol: String,
        lot_size: f64,
        margin: f64,
    },

    /// Gold where the margin exceeds the account balance.
    InsufficientBalance {
        symbol: String,
        lot_size: f64,
        margin: f64,
    },
}

impl Quote {
    /// Classify a gold quote against the account balance.
    ///
    /// Only a margin strictly greater than the balance is insufficient.
    pub fn for_margin(symbol: &str, lot_size: f64, margin: f64, balance: f64) -> Self {
        let symbol = symbol.to_string();
        if margin > balance {
            Quote::InsufficientBalance { symbol, lot_size, margin }
        } else {
            Quote::WithMargin { symbol, lot_size, margin }
        }
    }

    pub fn lot_size(&self) -> f64 {
        match self {
            Quote::LotSize { lot_size, .. }
            | Quote::WithMargin { lot_size, .. }
            | Quote::InsufficientBalance { lot_size, .. } => *lot_size,
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quote::LotSize { symbol, lot_size } => {
                write!(f, "Your calculated lot size for {symbol} is: {lot_size:.2}")
            }
            Quote::WithMargin { symbol, lot_size, margin } => {
                writeln!(f, "Your calculated lot size for {symbol} is: {lot_size:.2}")?;
                write!(f, "Required margin: ${margin:.2}")
            }
            Quote::InsufficientBalance { symbol, lot_size, margin } => write!(
                f,
                "Insufficient balance to trade {lot_size:.2} lots of {symbol}. \
                 Required margin: ${margin:.2}"
            ),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
