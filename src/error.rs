//! # error
//!
//! Centralised calculator error type.
//!
//! Every step of a session returns `Result<_, CalcError>`.  The `Display`
//! impl is the exact line printed to the user, so the driver never has to
//! format an error itself.

use std::fmt::Write;

use thiserror::Error;

pub const BALANCE_NOT_POSITIVE: &str = "Account balance must be positive.";
pub const RISK_OUT_OF_RANGE: &str = "Risk per trade must be between 0 and 1.";
pub const STOP_LOSS_NOT_POSITIVE: &str = "Stop loss pips must be positive.";
pub const PRICE_NOT_POSITIVE: &str = "Current price must be positive.";
pub const LEVERAGE_NOT_POSITIVE: &str = "Leverage must be positive.";

pub const DIVISION_BY_ZERO: &str = "float division by zero";
pub const END_OF_INPUT: &str = "EOF when reading a line";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    /// Text supplied where a number was expected.  Holds the raw input.
    #[error("Input error: could not convert string to float: {}", quote_input(.0))]
    Parse(String),

    /// Input bytes that are not valid UTF-8.  Reported like a parse failure.
    #[error("Input error: {0}")]
    Decode(String),

    /// A number outside the range its field accepts.
    #[error("Input error: {0}")]
    Validation(&'static str),

    /// Catch-all: division by zero, end of input, I/O failure.
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::InvalidData => CalcError::Decode(err.to_string()),
            _ => CalcError::Unexpected(err.to_string()),
        }
    }
}

/// Quote raw input for an error line: single quotes unless the text holds a
/// `'` and no `"`, with backslashes and control characters escaped.
fn quote_input(raw: &str) -> String {
    let delim = if raw.contains('\'') && !raw.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(raw.len() + 2);
    out.push(delim);
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = c as u32;
                // Writing to a String cannot fail.
                let _ = match code {
                    0..=0xff => write!(out, "\\x{code:02x}"),
                    0x100..=0xffff => write!(out, "\\u{code:04x}"),
                    _ => write!(out, "\\U{code:08x}"),
                };
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

// ─── Tests ────────────────────────────────────────────────────────────────────
